//! Configuration management for the schema generator tools
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (schemagen.toml)
//! - Environment variables (SCHEMAGEN__*)
//!
//! ## Example config file (schemagen.toml):
//! ```toml
//! [models]
//! path = "./models"
//!
//! [output]
//! format = "pretty"
//! include_schema_uri = true
//!
//! [defaults]
//! include_relations = false
//! set_title = true
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::filter::FilterSchemaOptions;

/// Main configuration for the generator binaries
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Where model definition files live
    #[serde(default)]
    pub models: ModelsConfig,

    /// How documents are written
    #[serde(default)]
    pub output: OutputConfig,

    /// Option defaults applied when the command line is silent
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Model source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsConfig {
    /// Directory scanned for `*.json` model definitions
    #[serde(default = "default_models_path")]
    pub path: PathBuf,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    /// Stamp `$schema` on exported documents
    #[serde(default)]
    pub include_schema_uri: bool,
}

/// Output format for JSON
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Compact,
}

/// Generation defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default)]
    pub include_relations: bool,

    /// Titles on filter schemas
    #[serde(default = "default_true")]
    pub set_title: bool,
}

fn default_models_path() -> PathBuf {
    PathBuf::from("models")
}

fn default_true() -> bool {
    true
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            path: default_models_path(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Pretty,
            include_schema_uri: false,
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            include_relations: false,
            set_title: true,
        }
    }
}

impl OutputFormat {
    /// Render a JSON value in this format
    pub fn render<T: Serialize>(&self, value: &T) -> serde_json::Result<String> {
        match self {
            OutputFormat::Pretty => serde_json::to_string_pretty(value),
            OutputFormat::Compact => serde_json::to_string(value),
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, adding a required file on top of the defaults
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = ["schemagen.toml", ".schemagen.toml", "config/schemagen.toml"];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "familiar", "schemagen") {
            let xdg_config = config_dir.config_dir().join("schemagen.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // SCHEMAGEN__OUTPUT__FORMAT=compact
        builder = builder.add_source(
            Environment::with_prefix("SCHEMAGEN")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Model directory (resolves relative paths)
    pub fn models_path(&self) -> PathBuf {
        if self.models.path.is_absolute() {
            self.models.path.clone()
        } else {
            std::env::current_dir()
                .unwrap_or_default()
                .join(&self.models.path)
        }
    }

    /// Filter options seeded from `[defaults]`
    pub fn filter_options(&self) -> FilterSchemaOptions {
        FilterSchemaOptions::new().set_title(self.defaults.set_title)
    }
}
