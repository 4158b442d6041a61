//! Model Descriptors
//!
//! Explicit, builder-style model metadata: a model is a name, an ordered set
//! of properties, settings and relations. Definitions are plain data and can
//! also be read from model definition files:
//!
//! ```json
//! {
//!   "name": "Product",
//!   "properties": {
//!     "id": {"type": "number", "id": true, "required": true},
//!     "name": {"type": "string", "required": true},
//!     "category": {"type": "Category"}
//!   },
//!   "settings": {"strict": false},
//!   "relations": {
//!     "category": {"type": "belongsTo", "target": "Category", "keyFrom": "categoryId"}
//!   }
//! }
//! ```

pub mod property;
pub mod relation;

pub use property::{PropertyDefinition, PropertyType};
pub use relation::{
    resolve_relation, ModelRef, Polymorphic, RelationDefinition, RelationType, ResolvedRelation,
    ResolvedThrough, ThroughDefinition,
};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Model-level settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSettings {
    /// `Some(false)` allows properties beyond the declared ones
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,

    /// Settings this crate does not interpret (`hiddenProperties`, connector options, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ModelSettings {
    /// Whether undeclared properties are accepted
    pub fn allows_additional_properties(&self) -> bool {
        self.strict == Some(false)
    }
}

/// Metadata describing one model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDefinition {
    pub name: String,

    /// Overrides `name` in generated schema titles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub properties: IndexMap<String, PropertyDefinition>,

    #[serde(default)]
    pub settings: ModelSettings,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub relations: IndexMap<String, RelationDefinition>,

    /// Raw JSON Schema keywords merged over the generated model schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_schema: Option<Map<String, Value>>,
}

impl ModelDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: None,
            description: None,
            properties: IndexMap::new(),
            settings: ModelSettings::default(),
            relations: IndexMap::new(),
            json_schema: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add (or replace) a property; declaration order is preserved.
    pub fn property(mut self, name: impl Into<String>, definition: PropertyDefinition) -> Self {
        self.properties.insert(name.into(), definition);
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.settings.strict = Some(strict);
        self
    }

    /// Attach a relation; its source becomes this model.
    pub fn relation(mut self, relation: RelationDefinition) -> Self {
        self.add_relation(relation);
        self
    }

    /// Attach raw JSON Schema keywords; non-object values are ignored.
    pub fn json_schema(mut self, raw: Value) -> Self {
        if let Value::Object(map) = raw {
            self.json_schema = Some(map);
        }
        self
    }

    /// Attach a relation after construction
    pub fn add_relation(&mut self, mut relation: RelationDefinition) {
        relation.source = self.name.clone();
        self.relations.insert(relation.name.clone(), relation);
    }

    /// Name used in schema titles
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }

    /// Properties flagged as id, in declaration order
    pub fn id_properties(&self) -> Vec<&str> {
        self.properties
            .iter()
            .filter(|(_, p)| p.id)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// First id property
    pub fn primary_key(&self) -> Option<&str> {
        self.id_properties().into_iter().next()
    }

    /// Fill relation names and sources from the map this model was read from
    pub(crate) fn normalize(&mut self) {
        for (name, relation) in self.relations.iter_mut() {
            if relation.name.is_empty() {
                relation.name = name.clone();
            }
            relation.source = self.name.clone();
        }
    }
}
