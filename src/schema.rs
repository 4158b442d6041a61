//! JSON Schema document types
//!
//! A typed subset of JSON Schema Draft-07 covering every keyword the
//! generators emit. Keywords not modelled here (`pattern`, `minLength`,
//! vendor extensions, ...) survive round trips through [`JsonSchema::extensions`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::Result;

/// Draft-07 meta-schema URI, stamped by the exporter when configured
pub const DRAFT_07: &str = "http://json-schema.org/draft-07/schema#";

/// Prefix of every local definition reference
pub const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Primitive JSON Schema instance types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimpleType {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
    Null,
}

/// The `type` keyword: one type or a list of types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InstanceType {
    Single(SimpleType),
    Multiple(Vec<SimpleType>),
}

impl From<SimpleType> for InstanceType {
    fn from(ty: SimpleType) -> Self {
        InstanceType::Single(ty)
    }
}

/// `additionalProperties` accepts a boolean or a schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaOrBool {
    Bool(bool),
    Schema(Box<JsonSchema>),
}

/// The `items` keyword: one schema for every element, or one per position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaItems {
    Tuple(Vec<JsonSchema>),
    Single(Box<JsonSchema>),
}

impl From<JsonSchema> for SchemaItems {
    fn from(schema: JsonSchema) -> Self {
        SchemaItems::Single(Box::new(schema))
    }
}

/// A JSON Schema document or fragment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonSchema {
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub meta_schema: Option<String>,

    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<InstanceType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, JsonSchema>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<SchemaOrBool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<SchemaItems>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_items: Option<bool>,

    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Number>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub any_of: Option<Vec<JsonSchema>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<JsonSchema>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definitions: Option<IndexMap<String, JsonSchema>>,

    /// Any keyword without a dedicated field
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl JsonSchema {
    /// Schema with only a `type`
    pub fn of_type(ty: SimpleType) -> Self {
        Self {
            instance_type: Some(ty.into()),
            ..Default::default()
        }
    }

    /// `{"$ref": "#/definitions/<title>"}`
    pub fn definition_ref(title: &str) -> Self {
        Self {
            reference: Some(format!("{}{}", DEFINITIONS_PREFIX, title)),
            ..Default::default()
        }
    }

    /// `{"type": "array", "items": <items>}`
    pub fn array_of(items: JsonSchema) -> Self {
        Self {
            instance_type: Some(SimpleType::Array.into()),
            items: Some(items.into()),
            ..Default::default()
        }
    }

    /// `{"type": "string", "format": <format>}`
    pub fn formatted_string(format: &str) -> Self {
        Self {
            instance_type: Some(SimpleType::String.into()),
            format: Some(format.to_string()),
            ..Default::default()
        }
    }

    /// True for the empty document `{}`
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Whether `type` is exactly the given simple type
    pub fn is_type(&self, ty: SimpleType) -> bool {
        matches!(self.instance_type, Some(InstanceType::Single(t)) if t == ty)
    }

    /// Title referenced by a local `$ref`, if this is one
    pub fn referenced_title(&self) -> Option<&str> {
        self.reference.as_deref()?.strip_prefix(DEFINITIONS_PREFIX)
    }

    /// Element schema when `items` is a single schema
    pub fn item_schema(&self) -> Option<&JsonSchema> {
        match self.items.as_ref()? {
            SchemaItems::Single(schema) => Some(schema),
            SchemaItems::Tuple(_) => None,
        }
    }

    /// Look up a property schema by name
    pub fn property(&self, name: &str) -> Option<&JsonSchema> {
        self.properties.as_ref()?.get(name)
    }

    /// Look up a root definition by title
    pub fn definition(&self, title: &str) -> Option<&JsonSchema> {
        self.definitions.as_ref()?.get(title)
    }

    /// Overlay raw keywords onto this schema; raw values win.
    pub fn merge_raw(&mut self, raw: &Map<String, Value>) -> Result<()> {
        if raw.is_empty() {
            return Ok(());
        }
        let mut merged = match serde_json::to_value(&*self)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        for (key, value) in raw {
            merged.insert(key.clone(), value.clone());
        }
        *self = serde_json::from_value(Value::Object(merged))?;
        Ok(())
    }

    /// Convert into a plain JSON value
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}
