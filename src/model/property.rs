//! Property descriptors

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::{Result, SchemaError};

/// Declared type of a property
///
/// Arrays carry their element type separately in
/// [`PropertyDefinition::item_type`], mirroring the `type` / `itemType` pair of
/// model definition files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PropertyType {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Date,
    Buffer,
    Binary,
    Any,
    Array,
    /// Reference to another model, resolved by name at generation time
    Model(String),
}

impl PropertyType {
    fn from_keyword(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "string" => Some(Self::String),
            "number" => Some(Self::Number),
            "integer" => Some(Self::Integer),
            "boolean" => Some(Self::Boolean),
            "object" => Some(Self::Object),
            "date" => Some(Self::Date),
            "buffer" => Some(Self::Buffer),
            "binary" => Some(Self::Binary),
            "any" => Some(Self::Any),
            "array" => Some(Self::Array),
            _ => None,
        }
    }

    /// Parse a primitive type keyword (case-insensitive).
    ///
    /// Anything else is an unsupported type; model references are built with
    /// [`PropertyType::model`].
    pub fn parse(name: &str) -> Result<Self> {
        Self::from_keyword(name).ok_or_else(|| SchemaError::UnsupportedType(name.to_string()))
    }

    /// Reference to the model registered under `name`
    pub fn model(name: impl Into<String>) -> Self {
        Self::Model(name.into())
    }

    /// The keyword (or model name) this type is written as
    pub fn name(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Date => "date",
            Self::Buffer => "buffer",
            Self::Binary => "binary",
            Self::Any => "any",
            Self::Array => "array",
            Self::Model(name) => name,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array)
    }

    /// Referenced model name, if this is a model reference
    pub fn as_model(&self) -> Option<&str> {
        match self {
            Self::Model(name) => Some(name),
            _ => None,
        }
    }
}

/// Non-keywords read from files are model references.
impl From<String> for PropertyType {
    fn from(s: String) -> Self {
        Self::from_keyword(&s).unwrap_or(Self::Model(s))
    }
}

impl From<PropertyType> for String {
    fn from(ty: PropertyType) -> Self {
        match ty {
            PropertyType::Model(name) => name,
            other => other.name().to_string(),
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A single property of a model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDefinition {
    #[serde(rename = "type")]
    pub property_type: PropertyType,

    /// Element type when `property_type` is `Array`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<PropertyType>,

    #[serde(default)]
    pub required: bool,

    /// Part of the primary key
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub id: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Raw JSON Schema keywords merged over the generated fragment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_schema: Option<Map<String, Value>>,
}

impl PropertyDefinition {
    pub fn new(property_type: PropertyType) -> Self {
        Self {
            property_type,
            item_type: None,
            required: false,
            id: false,
            description: None,
            json_schema: None,
        }
    }

    pub fn string() -> Self {
        Self::new(PropertyType::String)
    }

    pub fn number() -> Self {
        Self::new(PropertyType::Number)
    }

    pub fn boolean() -> Self {
        Self::new(PropertyType::Boolean)
    }

    pub fn date() -> Self {
        Self::new(PropertyType::Date)
    }

    /// Property holding a single instance of another model
    pub fn model(name: impl Into<String>) -> Self {
        Self::new(PropertyType::model(name))
    }

    /// Array property with the given element type
    pub fn array(item_type: PropertyType) -> Self {
        Self {
            item_type: Some(item_type),
            ..Self::new(PropertyType::Array)
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Mark as (part of) the primary key
    pub fn id(mut self) -> Self {
        self.id = true;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach raw JSON Schema keywords; non-object values are ignored.
    pub fn json_schema(mut self, raw: Value) -> Self {
        if let Value::Object(map) = raw {
            self.json_schema = Some(map);
        }
        self
    }

    /// Model this property points at, directly or through its array items
    pub fn referenced_model(&self) -> Option<&str> {
        if self.property_type.is_array() {
            self.item_type.as_ref()?.as_model()
        } else {
            self.property_type.as_model()
        }
    }
}
