//! Repository JSON Schema
//!
//! Derives JSON Schema (Draft-07) documents from repository model
//! definitions: model schemas with nested models hoisted into `definitions`,
//! relation navigational properties, and the schemas of query filters.
//!
//! ## Features
//!
//! - **Model Schemas**: One document per model and option set, with
//!   `partial`, `exclude`, `optional` and `includeRelations` variants
//! - **Cycle Safe**: Self and mutual references resolve to `$ref`s
//! - **Caching**: Per-model, per-option-set results shared as `Arc`s
//! - **Filter Schemas**: `where`, `fields`, `include`, scope and full filter
//! - **Validation**: Compile generated documents and validate instances
//!
//! ## Example
//!
//! ```
//! use repository_json_schema::{
//!     JsonSchemaCache, JsonSchemaOptions, ModelDefinition, ModelRegistry, PropertyDefinition,
//! };
//!
//! let mut registry = ModelRegistry::new();
//! registry
//!     .register(
//!         ModelDefinition::new("Product")
//!             .property("id", PropertyDefinition::number().id().required())
//!             .property("name", PropertyDefinition::string().required()),
//!     )
//!     .unwrap();
//!
//! let mut cache = JsonSchemaCache::new();
//! let options = JsonSchemaOptions::new().exclude(["id"]);
//! let schema = cache.get_json_schema(&registry, "Product", &options).unwrap();
//! assert_eq!(schema.title.as_deref(), Some("ProductExcluding_id_"));
//! ```

pub mod build_schema;
pub mod cache;
pub mod config;
pub mod error;
pub mod filter;
pub mod graph;
pub mod model;
pub mod names;
pub mod registry;
pub mod schema;
pub mod validate;

pub use build_schema::{model_to_json_schema, property_to_json_schema, JsonSchemaOptions, Partial, SchemaBuilder};
pub use cache::JsonSchemaCache;
pub use error::{Result, SchemaError};
pub use filter::{
    get_fields_json_schema_for, get_filter_json_schema_for, get_scope_filter_json_schema_for,
    get_where_json_schema_for, FilterSchemaOptions,
};
pub use graph::ModelGraph;
pub use model::{ModelDefinition, PropertyDefinition, PropertyType, RelationDefinition, RelationType};
pub use registry::{ModelProvider, ModelRegistry};
pub use schema::JsonSchema;
pub use validate::CompiledSchema;
