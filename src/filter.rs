//! Query Filter Schemas
//!
//! Schemas for the generic filter object accepted by repository queries:
//! `where`, `fields`, `order`, pagination and `include`. They depend on the
//! model only through its property names, relation names and `strict`
//! setting.
//!
//! The `where` schema stays a permissive object. Predicate shapes are not
//! validated.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::model::ModelDefinition;
use crate::schema::{JsonSchema, SchemaOrBool, SimpleType};

/// Name of the stand-in model used for scope filters
const SCOPE_MODEL: &str = "EmptyModel";

/// Options shared by the filter schema builders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSchemaOptions {
    /// Attach `<Model>.Filter`-style titles
    #[serde(default = "default_true")]
    pub set_title: bool,

    /// Top-level filter properties to leave out (`where`, `include`, ...)
    #[serde(default)]
    pub exclude: Vec<String>,
}

fn default_true() -> bool {
    true
}

impl Default for FilterSchemaOptions {
    fn default() -> Self {
        Self {
            set_title: true,
            exclude: Vec::new(),
        }
    }
}

impl FilterSchemaOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_title(mut self, set_title: bool) -> Self {
        self.set_title = set_title;
        self
    }

    pub fn exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = names.into_iter().map(Into::into).collect();
        self
    }

    fn title(&self, model: &ModelDefinition, suffix: &str) -> Option<String> {
        self.set_title.then(|| format!("{}.{}", model.name, suffix))
    }

    fn is_excluded(&self, name: &str) -> bool {
        self.exclude.iter().any(|e| e == name)
    }
}

fn integer(minimum: u64) -> JsonSchema {
    JsonSchema {
        minimum: Some(minimum.into()),
        ..JsonSchema::of_type(SimpleType::Integer)
    }
}

fn string_enum(values: &[String]) -> JsonSchema {
    JsonSchema {
        enum_values: Some(values.iter().map(|v| Value::String(v.clone())).collect()),
        ..JsonSchema::of_type(SimpleType::String)
    }
}

/// Schema for the `where` clause: any object
pub fn get_where_json_schema_for(model: &ModelDefinition, options: &FilterSchemaOptions) -> JsonSchema {
    JsonSchema {
        title: options.title(model, "WhereFilter"),
        additional_properties: Some(SchemaOrBool::Bool(true)),
        ..JsonSchema::of_type(SimpleType::Object)
    }
}

/// Schema for the `fields` clause: `{name: bool}` or `["name", ...]`
pub fn get_fields_json_schema_for(model: &ModelDefinition, options: &FilterSchemaOptions) -> JsonSchema {
    let names: Vec<String> = model.properties.keys().cloned().collect();
    let open = model.settings.allows_additional_properties();

    let as_object = JsonSchema {
        properties: Some(
            names
                .iter()
                .map(|name| (name.clone(), JsonSchema::of_type(SimpleType::Boolean)))
                .collect(),
        ),
        additional_properties: Some(SchemaOrBool::Bool(open)),
        ..JsonSchema::of_type(SimpleType::Object)
    };

    let mut item = JsonSchema::of_type(SimpleType::String);
    if !open && !names.is_empty() {
        item.enum_values = Some(names.iter().map(|n| Value::String(n.clone())).collect());
    }
    item.examples = Some(names.iter().map(|n| Value::String(n.clone())).collect());

    let as_array = JsonSchema {
        unique_items: Some(true),
        ..JsonSchema::array_of(item)
    };

    JsonSchema {
        title: options.title(model, "Fields"),
        one_of: Some(vec![as_object, as_array]),
        ..Default::default()
    }
}

/// Filter schema for the `scope` of an included relation.
///
/// Scopes are filters over a model that is not tracked here, so this is the
/// filter of an open, relation-less model whose `include` accepts any list of
/// objects.
pub fn get_scope_filter_json_schema_for(model: &ModelDefinition, options: &FilterSchemaOptions) -> JsonSchema {
    let scope_model = ModelDefinition::new(SCOPE_MODEL).strict(false);
    let inner_options = FilterSchemaOptions {
        set_title: false,
        ..options.clone()
    };

    let mut schema = get_filter_json_schema_for(&scope_model, &inner_options);
    if !options.is_excluded("include") {
        let any_objects = JsonSchema::array_of(JsonSchema {
            properties: Some(IndexMap::new()),
            additional_properties: Some(SchemaOrBool::Bool(true)),
            ..JsonSchema::of_type(SimpleType::Object)
        });
        schema
            .properties
            .get_or_insert_with(IndexMap::new)
            .insert("include".to_string(), any_objects);
    }

    schema.title = options.title(model, "ScopeFilter");
    schema
}

fn include_json_schema_for(model: &ModelDefinition, options: &FilterSchemaOptions) -> JsonSchema {
    let relations: Vec<String> = model.relations.keys().cloned().collect();

    let mut properties = IndexMap::new();
    properties.insert("relation".to_string(), string_enum(&relations));
    properties.insert("scope".to_string(), get_scope_filter_json_schema_for(model, options));

    let as_object = JsonSchema {
        title: options.title(model, "IncludeFilter.Items"),
        properties: Some(properties),
        ..JsonSchema::of_type(SimpleType::Object)
    };

    JsonSchema {
        title: options.title(model, "IncludeFilter"),
        ..JsonSchema::array_of(JsonSchema {
            any_of: Some(vec![as_object, string_enum(&relations)]),
            ..Default::default()
        })
    }
}

/// Schema for the complete filter object
pub fn get_filter_json_schema_for(model: &ModelDefinition, options: &FilterSchemaOptions) -> JsonSchema {
    let mut properties: IndexMap<String, JsonSchema> = IndexMap::new();
    properties.insert("offset".to_string(), integer(0));
    properties.insert(
        "limit".to_string(),
        JsonSchema {
            examples: Some(vec![json!(100)]),
            ..integer(1)
        },
    );
    properties.insert("skip".to_string(), integer(0));
    properties.insert(
        "order".to_string(),
        JsonSchema {
            one_of: Some(vec![
                JsonSchema::of_type(SimpleType::String),
                JsonSchema::array_of(JsonSchema::of_type(SimpleType::String)),
            ]),
            ..Default::default()
        },
    );
    properties.insert("where".to_string(), get_where_json_schema_for(model, options));
    properties.insert("fields".to_string(), get_fields_json_schema_for(model, options));
    if !model.relations.is_empty() {
        properties.insert("include".to_string(), include_json_schema_for(model, options));
    }

    properties.retain(|name, _| !options.is_excluded(name));

    JsonSchema {
        title: options.title(model, "Filter"),
        properties: Some(properties),
        additional_properties: Some(SchemaOrBool::Bool(false)),
        ..Default::default()
    }
}
