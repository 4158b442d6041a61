//! Model Registry
//!
//! Holds model definitions by name and serves them to the schema generators
//! through [`ModelProvider`].

use indexmap::IndexMap;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{Result, SchemaError};
use crate::model::{resolve_relation, ModelDefinition, RelationDefinition, ResolvedRelation};
use crate::names::is_valid_identifier;

/// Source of model definitions
pub trait ModelProvider {
    /// Definition registered under `name`, if any
    fn model_definition(&self, name: &str) -> Option<Arc<ModelDefinition>>;
}

impl<P: ModelProvider + ?Sized> ModelProvider for &P {
    fn model_definition(&self, name: &str) -> Option<Arc<ModelDefinition>> {
        (**self).model_definition(name)
    }
}

/// Name match returned by [`ModelRegistry::search`]
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub name: String,
    pub score: i64,
}

/// Registered model definitions, in registration order
#[derive(Debug, Default, Clone)]
pub struct ModelRegistry {
    models: IndexMap<String, Arc<ModelDefinition>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model, replacing any previous definition with the same name
    pub fn register(&mut self, mut model: ModelDefinition) -> Result<Arc<ModelDefinition>> {
        if !is_valid_identifier(&model.name) {
            return Err(SchemaError::InvalidModelName(model.name));
        }
        model.normalize();

        debug!(
            model = %model.name,
            properties = model.properties.len(),
            relations = model.relations.len(),
            "registering model"
        );

        let model = Arc::new(model);
        self.models.insert(model.name.clone(), Arc::clone(&model));
        Ok(model)
    }

    /// Attach a relation to an already registered model
    pub fn add_relation(&mut self, model: &str, relation: RelationDefinition) -> Result<()> {
        let entry = self
            .models
            .get_mut(model)
            .ok_or_else(|| SchemaError::ModelNotFound(model.to_string()))?;
        Arc::make_mut(entry).add_relation(relation);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<ModelDefinition>> {
        self.models.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Model names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    pub fn models(&self) -> impl Iterator<Item = &Arc<ModelDefinition>> {
        self.models.values()
    }

    /// Resolve every relation of every model, failing on the first bad one
    pub fn validate_relations(&self) -> Result<Vec<ResolvedRelation>> {
        let mut resolved = Vec::new();
        for model in self.models.values() {
            for relation in model.relations.values() {
                resolved.push(resolve_relation(self, relation)?);
            }
        }
        Ok(resolved)
    }

    /// Fuzzy search model names, best match first
    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchResult> {
        use fuzzy_matcher::skim::SkimMatcherV2;
        use fuzzy_matcher::FuzzyMatcher;

        let matcher = SkimMatcherV2::default();
        let mut results: Vec<SearchResult> = self
            .models
            .values()
            .filter_map(|model| {
                let score = matcher
                    .fuzzy_match(&model.name, query)
                    .or_else(|| model.title.as_deref().and_then(|t| matcher.fuzzy_match(t, query)))?;
                Some(SearchResult { name: model.name.clone(), score })
            })
            .collect();

        results.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.name.cmp(&b.name)));
        results.truncate(limit);
        results
    }

    /// Load every `*.json` model definition file below `dir`.
    ///
    /// A file holds either one model object or an array of them.
    pub fn load_from_directory(&mut self, dir: &Path) -> Result<usize> {
        if !dir.is_dir() {
            return Err(SchemaError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("model directory {} does not exist", dir.display()),
            )));
        }

        let mut loaded = 0;

        for entry in WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || path.extension().map(|e| e != "json").unwrap_or(true) {
                continue;
            }

            let content = fs::read_to_string(path)?;
            let json: Value = serde_json::from_str(&content).map_err(|e| {
                SchemaError::InvalidFormat(format!("{}: {}", path.display(), e))
            })?;

            let definitions: Vec<ModelDefinition> = match json {
                Value::Array(_) => serde_json::from_value(json)?,
                other => vec![serde_json::from_value(other)?],
            };

            for model in definitions {
                self.register(model)?;
                loaded += 1;
            }
        }

        info!(count = loaded, dir = %dir.display(), "loaded model definitions");
        Ok(loaded)
    }
}

impl ModelProvider for ModelRegistry {
    fn model_definition(&self, name: &str) -> Option<Arc<ModelDefinition>> {
        self.models.get(name).cloned()
    }
}
