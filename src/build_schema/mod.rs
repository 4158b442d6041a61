//! Model-to-Schema Synthesis
//!
//! Walks model definitions depth first and emits one JSON Schema document per
//! call. Nested models (property types, relation targets) are built once per
//! pass and collected in a flat `definitions` map at the document root.
//!
//! Cycle handling: a model's title is marked visited before any of its
//! properties are converted. Reaching the same title again (self reference,
//! mutual reference, relation back-pointer) only emits a `$ref`, so every
//! model is expanded at most once per pass.

pub mod convert;
pub mod options;

pub use convert::property_to_json_schema;
pub use options::{JsonSchemaOptions, Partial};

use indexmap::IndexMap;
use std::collections::HashSet;
use tracing::debug;

use crate::error::{Result, SchemaError};
use crate::model::ModelDefinition;
use crate::registry::ModelProvider;
use crate::schema::{JsonSchema, SchemaOrBool, SimpleType};

/// Title of the schema generated for `model` under `options`
pub fn schema_title(model: &ModelDefinition, options: &JsonSchemaOptions) -> String {
    match &options.title {
        Some(title) => title.clone(),
        None => format!("{}{}", model.display_title(), options.title_suffix()),
    }
}

/// One generation pass: the visited set plus the schemas finished so far
pub struct SchemaBuilder<'a, P: ModelProvider + ?Sized> {
    provider: &'a P,
    /// Titles entered in this pass, finished or still in progress
    visited: HashSet<String>,
    /// Finished schemas by title, dependencies first
    definitions: IndexMap<String, JsonSchema>,
}

impl<'a, P: ModelProvider + ?Sized> SchemaBuilder<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self {
            provider,
            visited: HashSet::new(),
            definitions: IndexMap::new(),
        }
    }

    /// Build the schema of the model registered as `model_name`.
    ///
    /// Unknown models produce the empty schema `{}`.
    pub fn build(self, model_name: &str, options: &JsonSchemaOptions) -> Result<JsonSchema> {
        match self.provider.model_definition(model_name) {
            Some(model) => self.build_definition(&model, options),
            None => {
                debug!(model = model_name, "no model definition, returning empty schema");
                Ok(JsonSchema::default())
            }
        }
    }

    /// Build the schema of a definition that need not be registered itself;
    /// models it references are still looked up in the provider.
    pub fn build_definition(mut self, model: &ModelDefinition, options: &JsonSchemaOptions) -> Result<JsonSchema> {
        let title = self.visit(model, options)?;
        let mut root = self.definitions.shift_remove(&title).unwrap_or_default();
        if !self.definitions.is_empty() {
            root.definitions = Some(self.definitions);
        }
        Ok(root)
    }

    fn resolve(&self, name: &str) -> Result<std::sync::Arc<ModelDefinition>> {
        self.provider
            .model_definition(name)
            .ok_or_else(|| SchemaError::UnsupportedType(name.to_string()))
    }

    /// Expand `model` unless its title was already entered; returns the title.
    fn visit(&mut self, model: &ModelDefinition, options: &JsonSchemaOptions) -> Result<String> {
        let title = schema_title(model, options);
        if !self.visited.insert(title.clone()) {
            debug!(title = %title, "schema already visited in this pass");
            return Ok(title);
        }

        debug!(model = %model.name, title = %title, ?options, "creating schema for model");
        if options.partial.is_on() && !options.optional.is_empty() {
            debug!(model = %model.name, "overriding \"partial\" option with \"optional\" option");
        }
        let partial = options.effective_partial().is_on();

        let mut result = JsonSchema {
            title: Some(title.clone()),
            instance_type: Some(SimpleType::Object.into()),
            description: model.description.clone(),
            ..Default::default()
        };
        let mut properties: IndexMap<String, JsonSchema> = IndexMap::new();
        let mut required: Vec<String> = Vec::new();

        for (name, property) in &model.properties {
            if options.is_excluded(name) {
                debug!(property = %name, "property is excluded");
                continue;
            }

            let mut fragment = property_to_json_schema(self.provider, &format!("{}.{}", model.name, name), property)?;

            if property.required && !(partial || options.is_optional(name)) {
                required.push(name.clone());
            }

            if let Some(target_name) = property.referenced_model() {
                let target = self.resolve(target_name)?;
                let nested_title = self.visit(&target, &options.for_property())?;
                let target_ref = JsonSchema::definition_ref(&nested_title);

                if !fragment.is_type(SimpleType::Array) {
                    fragment = target_ref;
                } else if fragment.item_schema().is_some() {
                    fragment.items = Some(target_ref.into());
                }
            }

            properties.insert(name.clone(), fragment);
        }

        result.additional_properties = Some(SchemaOrBool::Bool(model.settings.allows_additional_properties()));

        if options.include_relations {
            for relation in model.relations.values() {
                let targets_many = relation.targets_many.ok_or_else(|| SchemaError::MissingNavigationalAttribute {
                    model: model.name.clone(),
                    relation: relation.name.clone(),
                })?;

                let target = self.resolve(relation.target.name())?;
                let target_title = self.visit(&target, &options.for_relation())?;
                let target_ref = JsonSchema::definition_ref(&target_title);

                let navigational = if targets_many {
                    JsonSchema::array_of(target_ref)
                } else {
                    target_ref
                };
                properties.entry(relation.name.clone()).or_insert(navigational);
            }
        }

        if !properties.is_empty() {
            result.properties = Some(properties);
        }
        if !required.is_empty() {
            result.required = Some(required);
        }

        if let Some(raw) = &model.json_schema {
            result.merge_raw(raw)?;
        }

        self.definitions.insert(title.clone(), result);
        Ok(title)
    }
}

/// Build the JSON Schema for a registered model (uncached).
pub fn model_to_json_schema<P: ModelProvider + ?Sized>(
    provider: &P,
    model_name: &str,
    options: &JsonSchemaOptions,
) -> Result<JsonSchema> {
    SchemaBuilder::new(provider).build(model_name, options)
}
