//! Schema Cache
//!
//! Memoises generated schemas per model name and option set. A hit hands back
//! the very same `Arc`, so callers can compare results by pointer.
//!
//! Entries are never refreshed on their own; call [`JsonSchemaCache::invalidate`]
//! after changing a model definition.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::build_schema::{model_to_json_schema, JsonSchemaOptions};
use crate::error::Result;
use crate::registry::ModelProvider;
use crate::schema::JsonSchema;

/// Generated schemas keyed by model name, then by option cache key
#[derive(Debug, Default)]
pub struct JsonSchemaCache {
    entries: HashMap<String, HashMap<String, Arc<JsonSchema>>>,
}

impl JsonSchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schema of `model` under `options`, generated on first request
    pub fn get_json_schema<P: ModelProvider + ?Sized>(
        &mut self,
        provider: &P,
        model: &str,
        options: &JsonSchemaOptions,
    ) -> Result<Arc<JsonSchema>> {
        let key = options.cache_key();

        if let Some(schema) = self.entries.get(model).and_then(|by_key| by_key.get(&key)) {
            debug!(model, key = %key, "schema cache hit");
            return Ok(Arc::clone(schema));
        }

        debug!(model, key = %key, "schema cache miss");
        let schema = Arc::new(model_to_json_schema(provider, model, options)?);
        self.entries
            .entry(model.to_string())
            .or_default()
            .insert(key, Arc::clone(&schema));
        Ok(schema)
    }

    /// The model schema wrapped as `{"$ref": ..., "definitions": {...}}`.
    ///
    /// The referenced document itself is stored under its title next to the
    /// nested definitions. Documents without a title (unknown models) are
    /// returned as they are.
    pub fn get_json_schema_ref<P: ModelProvider + ?Sized>(
        &mut self,
        provider: &P,
        model: &str,
        options: &JsonSchemaOptions,
    ) -> Result<JsonSchema> {
        let schema = self.get_json_schema(provider, model, options)?;
        Ok(to_schema_ref(&schema))
    }

    /// Drop every cached schema of `model`
    pub fn invalidate(&mut self, model: &str) {
        if self.entries.remove(model).is_some() {
            debug!(model, "schema cache invalidated");
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached documents across all models
    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Wrap a generated document into a `$ref` to itself
pub fn to_schema_ref(schema: &JsonSchema) -> JsonSchema {
    let Some(title) = schema.title.clone() else {
        return schema.clone();
    };

    let mut document = schema.clone();
    let mut definitions = document.definitions.take().unwrap_or_default();
    definitions.insert(title.clone(), document);

    JsonSchema {
        definitions: Some(definitions),
        ..JsonSchema::definition_ref(&title)
    }
}
