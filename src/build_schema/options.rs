//! Schema option sets
//!
//! Options shape a generated schema and, through [`JsonSchemaOptions::title_suffix`]
//! and [`JsonSchemaOptions::cache_key`], give every distinct shape its own
//! title and cache slot.

use serde::{Deserialize, Serialize};

/// How far `partial` reaches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Partial {
    /// Required properties stay required
    #[default]
    Off,
    /// No property of the top-level model is required
    Shallow,
    /// Nested model properties are partial as well
    Deep,
}

impl Partial {
    pub fn is_on(&self) -> bool {
        !matches!(self, Partial::Off)
    }
}

fn joined_names(names: &[String]) -> String {
    let mut sorted: Vec<&str> = names.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    sorted.dedup();
    sorted.join("-")
}

/// Option set controlling the shape of a model schema
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonSchemaOptions {
    /// Explicit title, replacing the computed one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default)]
    pub partial: Partial,

    /// Properties left out of the schema
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,

    /// Properties made optional; a non-empty list overrides `partial`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub optional: Vec<String>,

    /// Add navigational properties for relations
    #[serde(default)]
    pub include_relations: bool,
}

impl JsonSchemaOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn partial(mut self) -> Self {
        self.partial = Partial::Shallow;
        self
    }

    pub fn deep_partial(mut self) -> Self {
        self.partial = Partial::Deep;
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

    pub fn optional<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.optional = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn include_relations(mut self) -> Self {
        self.include_relations = true;
        self
    }

    /// `partial` after the `optional` override
    pub fn effective_partial(&self) -> Partial {
        if self.optional.is_empty() {
            self.partial
        } else {
            Partial::Off
        }
    }

    pub fn is_excluded(&self, property: &str) -> bool {
        self.exclude.iter().any(|p| p == property)
    }

    pub fn is_optional(&self, property: &str) -> bool {
        self.optional.iter().any(|p| p == property)
    }

    /// Suffix appended to the model title: optional/partial marker, then
    /// exclusions, then relations. Name lists are sorted and deduplicated.
    pub fn title_suffix(&self) -> String {
        let mut suffix = String::new();
        if !self.optional.is_empty() {
            suffix.push_str(&format!("Optional_{}_", joined_names(&self.optional)));
        } else {
            match self.partial {
                Partial::Off => {}
                Partial::Shallow => suffix.push_str("Partial"),
                Partial::Deep => suffix.push_str("DeepPartial"),
            }
        }
        if !self.exclude.is_empty() {
            suffix.push_str(&format!("Excluding_{}_", joined_names(&self.exclude)));
        }
        if self.include_relations {
            suffix.push_str("WithRelations");
        }
        suffix
    }

    /// Cache key for this option set; the default set maps to `modelOnly`.
    pub fn cache_key(&self) -> String {
        if *self == Self::default() {
            return "modelOnly".to_string();
        }
        format!(
            "model{}{}",
            self.title.as_deref().unwrap_or(""),
            self.title_suffix()
        )
    }

    /// Options for a model reached through a property: only a deep `partial`
    /// carries over.
    pub(crate) fn for_property(&self) -> Self {
        Self {
            partial: match self.effective_partial() {
                Partial::Deep => Partial::Deep,
                _ => Partial::Off,
            },
            ..Self::default()
        }
    }

    /// Options for a relation target: everything but the identity-bearing
    /// `title` and the source-specific property lists.
    pub(crate) fn for_relation(&self) -> Self {
        Self {
            partial: self.effective_partial(),
            include_relations: self.include_relations,
            ..Self::default()
        }
    }
}
