//! Relation descriptors and key inference
//!
//! Relations point at their target by model name. The name is resolved
//! through a [`ModelProvider`] only when a schema or key set is actually
//! needed, so two models may reference each other regardless of the order in
//! which they are registered.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use super::ModelDefinition;
use crate::error::{Result, SchemaError};
use crate::names::{discriminator_for, foreign_key_for, foreign_keys_for};
use crate::registry::ModelProvider;

/// Kind of relation between two models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationType {
    BelongsTo,
    HasOne,
    HasMany,
    HasManyThrough,
    ReferencesMany,
}

impl RelationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationType::BelongsTo => "belongsTo",
            RelationType::HasOne => "hasOne",
            RelationType::HasMany => "hasMany",
            RelationType::HasManyThrough => "hasManyThrough",
            RelationType::ReferencesMany => "referencesMany",
        }
    }

    /// Whether the navigational property holds a list
    pub fn targets_many(&self) -> bool {
        matches!(
            self,
            RelationType::HasMany | RelationType::HasManyThrough | RelationType::ReferencesMany
        )
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lazily resolved reference to a model
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelRef(String);

impl ModelRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// Look the model up in `provider`
    pub fn resolve<P: ModelProvider + ?Sized>(&self, provider: &P) -> Result<Arc<ModelDefinition>> {
        provider
            .model_definition(&self.0)
            .ok_or_else(|| SchemaError::ModelNotFound(self.0.clone()))
    }
}

impl From<&str> for ModelRef {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Join model of a hasManyThrough relation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThroughDefinition {
    pub model: ModelRef,
    /// Key on the through model pointing at the source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_from: Option<String>,
    /// Key on the through model pointing at the target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_to: Option<String>,
}

/// Polymorphic target marker: `true` or an explicit discriminator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Polymorphic {
    Enabled(bool),
    Discriminator { discriminator: String },
}

/// A relation declared on a source model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationDefinition {
    /// Navigational property name; filled from the map key on registration
    #[serde(default)]
    pub name: String,

    #[serde(rename = "type")]
    pub relation_type: RelationType,

    /// Source model name; filled on registration
    #[serde(default)]
    pub source: String,

    pub target: ModelRef,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targets_many: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_from: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_to: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub through: Option<ThroughDefinition>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polymorphic: Option<Polymorphic>,
}

impl RelationDefinition {
    /// Relation of the given kind with `targets_many` set accordingly
    pub fn new(
        relation_type: RelationType,
        name: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            relation_type,
            source: source.into(),
            target: ModelRef::new(target),
            targets_many: Some(relation_type.targets_many()),
            key_from: None,
            key_to: None,
            through: None,
            polymorphic: None,
        }
    }

    pub fn belongs_to(name: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(RelationType::BelongsTo, name, source, target)
    }

    pub fn has_one(name: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(RelationType::HasOne, name, source, target)
    }

    pub fn has_many(name: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(RelationType::HasMany, name, source, target)
    }

    pub fn has_many_through(
        name: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        through: impl Into<String>,
    ) -> Self {
        let mut relation = Self::new(RelationType::HasManyThrough, name, source, target);
        relation.through = Some(ThroughDefinition {
            model: ModelRef::new(through),
            key_from: None,
            key_to: None,
        });
        relation
    }

    pub fn references_many(name: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(RelationType::ReferencesMany, name, source, target)
    }

    pub fn key_from(mut self, key: impl Into<String>) -> Self {
        self.key_from = Some(key.into());
        self
    }

    pub fn key_to(mut self, key: impl Into<String>) -> Self {
        self.key_to = Some(key.into());
        self
    }

    pub fn polymorphic(mut self, discriminator: Option<&str>) -> Self {
        self.polymorphic = Some(match discriminator {
            Some(d) => Polymorphic::Discriminator { discriminator: d.to_string() },
            None => Polymorphic::Enabled(true),
        });
        self
    }

    fn invalid(&self, reason: impl Into<String>) -> SchemaError {
        SchemaError::InvalidRelationDefinition {
            model: self.source.clone(),
            relation: self.name.clone(),
            relation_type: self.relation_type.to_string(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Key Resolution
// =============================================================================

/// Join keys of a resolved hasManyThrough relation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedThrough {
    pub model: String,
    pub key_from: String,
    pub key_to: String,
}

/// Relation with every key made explicit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRelation {
    pub name: String,
    pub relation_type: RelationType,
    pub source: String,
    pub target: String,
    pub targets_many: bool,
    pub key_from: String,
    pub key_to: String,
    pub through: Option<ResolvedThrough>,
    /// Discriminator property for polymorphic targets
    pub discriminator: Option<String>,
}

fn primary_key(relation: &RelationDefinition, model: &ModelDefinition) -> Result<String> {
    model
        .primary_key()
        .map(str::to_string)
        .ok_or_else(|| relation.invalid(format!("{} does not have any primary key (id property)", model.name)))
}

fn require_property(relation: &RelationDefinition, model: &ModelDefinition, key: &str) -> Result<()> {
    if model.properties.contains_key(key) {
        Ok(())
    } else {
        Err(relation.invalid(format!("{} is missing definition of foreign key {}", model.name, key)))
    }
}

/// Fill in conventional keys and check they exist on the models involved.
pub fn resolve_relation<P: ModelProvider + ?Sized>(
    provider: &P,
    relation: &RelationDefinition,
) -> Result<ResolvedRelation> {
    let source = ModelRef::new(relation.source.as_str()).resolve(provider)?;
    let target = relation.target.resolve(provider)?;
    let targets_many = relation.targets_many.unwrap_or_else(|| relation.relation_type.targets_many());

    let discriminator = match &relation.polymorphic {
        None | Some(Polymorphic::Enabled(false)) => None,
        Some(Polymorphic::Enabled(true)) => Some(discriminator_for(&target.name)),
        Some(Polymorphic::Discriminator { discriminator }) => Some(discriminator.clone()),
    };
    if discriminator.is_some() && matches!(relation.relation_type, RelationType::HasManyThrough | RelationType::ReferencesMany) {
        return Err(relation.invalid("polymorphic targets are not supported"));
    }

    let (key_from, key_to, through) = match relation.relation_type {
        RelationType::BelongsTo => {
            let key_from = relation.key_from.clone().unwrap_or_else(|| foreign_key_for(&target.name));
            require_property(relation, &source, &key_from)?;
            let key_to = match &relation.key_to {
                Some(key) => key.clone(),
                None => primary_key(relation, &target)?,
            };
            (key_from, key_to, None)
        }
        RelationType::HasOne | RelationType::HasMany => {
            let key_to = relation.key_to.clone().unwrap_or_else(|| foreign_key_for(&source.name));
            require_property(relation, &target, &key_to)?;
            let key_from = match &relation.key_from {
                Some(key) => key.clone(),
                None => primary_key(relation, &source)?,
            };
            (key_from, key_to, None)
        }
        RelationType::HasManyThrough => {
            let through_def = relation
                .through
                .as_ref()
                .ok_or_else(|| relation.invalid("through model is not defined"))?;
            let through_model = through_def.model.resolve(provider)?;

            let through_from = through_def.key_from.clone().unwrap_or_else(|| foreign_key_for(&source.name));
            let through_to = through_def.key_to.clone().unwrap_or_else(|| foreign_key_for(&target.name));
            require_property(relation, &through_model, &through_from)?;
            require_property(relation, &through_model, &through_to)?;

            let key_from = match &relation.key_from {
                Some(key) => key.clone(),
                None => primary_key(relation, &source)?,
            };
            let key_to = match &relation.key_to {
                Some(key) => key.clone(),
                None => primary_key(relation, &target)?,
            };
            let through = ResolvedThrough {
                model: through_model.name.clone(),
                key_from: through_from,
                key_to: through_to,
            };
            (key_from, key_to, Some(through))
        }
        RelationType::ReferencesMany => {
            let key_from = relation.key_from.clone().unwrap_or_else(|| foreign_keys_for(&target.name));
            require_property(relation, &source, &key_from)?;
            let key_to = match &relation.key_to {
                Some(key) => key.clone(),
                None => primary_key(relation, &target)?,
            };
            (key_from, key_to, None)
        }
    };

    Ok(ResolvedRelation {
        name: relation.name.clone(),
        relation_type: relation.relation_type,
        source: source.name.clone(),
        target: target.name.clone(),
        targets_many,
        key_from,
        key_to,
        through,
        discriminator,
    })
}
