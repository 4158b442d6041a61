//! Instance validation against generated schemas (Draft-07)

use jsonschema::{Draft, JSONSchema};
use serde_json::Value;

use crate::error::{Result, SchemaError};
use crate::schema::JsonSchema;

/// A generated schema compiled for validation
pub struct CompiledSchema {
    compiled: JSONSchema,
}

impl CompiledSchema {
    /// Compile `schema`; every `$ref` must resolve against its own `definitions`.
    ///
    /// A model document never lists itself in `definitions`, so a self or
    /// mutually referencing model only validates nested instances once it is
    /// wrapped with [`crate::cache::to_schema_ref`].
    pub fn compile(schema: &JsonSchema) -> Result<Self> {
        let document = schema.to_value()?;
        let compiled = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&document)
            .map_err(|e| SchemaError::InvalidFormat(e.to_string()))?;
        Ok(Self { compiled })
    }

    pub fn is_valid(&self, instance: &Value) -> bool {
        self.compiled.is_valid(instance)
    }

    /// Validate `instance`, collecting every error message
    pub fn validate(&self, instance: &Value) -> Result<()> {
        if let Err(errors) = self.compiled.validate(instance) {
            let messages: Vec<String> = errors
                .map(|e| format!("{}: {}", e.instance_path, e))
                .collect();
            return Err(SchemaError::ValidationFailed(messages));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_schema::{model_to_json_schema, JsonSchemaOptions};
    use crate::cache::to_schema_ref;
    use crate::model::{ModelDefinition, PropertyDefinition, PropertyType};
    use crate::registry::ModelRegistry;
    use serde_json::json;

    fn registry() -> ModelRegistry {
        let mut registry = ModelRegistry::new();
        registry
            .register(
                ModelDefinition::new("Node")
                    .property("name", PropertyDefinition::string().required())
                    .property("children", PropertyDefinition::array(PropertyType::model("Node"))),
            )
            .unwrap();
        registry
    }

    fn compiled_node() -> CompiledSchema {
        let schema = model_to_json_schema(&registry(), "Node", &JsonSchemaOptions::default()).unwrap();
        CompiledSchema::compile(&to_schema_ref(&schema)).unwrap()
    }

    #[test]
    fn test_valid_instance() {
        let compiled = compiled_node();

        let instance = json!({"name": "root", "children": [{"name": "leaf"}]});
        assert!(compiled.is_valid(&instance));
        assert!(compiled.validate(&instance).is_ok());
    }

    #[test]
    fn test_invalid_instance_reports_all_errors() {
        let compiled = compiled_node();

        let err = compiled.validate(&json!({"extra": 1})).unwrap_err();
        match err {
            SchemaError::ValidationFailed(messages) => assert_eq!(messages.len(), 2),
            other => panic!("Expected ValidationFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_self_reference_is_checked() {
        let compiled = compiled_node();

        let deep = json!({"name": "root", "children": [{"name": "a", "children": [{"name": "b"}]}]});
        assert!(compiled.is_valid(&deep));

        let nameless_grandchild = json!({"name": "root", "children": [{"name": "a", "children": [{}]}]});
        assert!(!compiled.is_valid(&nameless_grandchild));
    }
}
