//! Property-to-schema conversion

use crate::error::{Result, SchemaError};
use crate::model::{PropertyDefinition, PropertyType};
use crate::registry::ModelProvider;
use crate::schema::{JsonSchema, SimpleType};

/// Fragment for a single (non-array) type
fn type_to_json_schema<P: ModelProvider + ?Sized>(provider: &P, ty: &PropertyType) -> Result<JsonSchema> {
    let schema = match ty {
        PropertyType::String => JsonSchema::of_type(SimpleType::String),
        PropertyType::Number => JsonSchema::of_type(SimpleType::Number),
        PropertyType::Integer => JsonSchema::of_type(SimpleType::Integer),
        PropertyType::Boolean => JsonSchema::of_type(SimpleType::Boolean),
        PropertyType::Object => JsonSchema::of_type(SimpleType::Object),
        PropertyType::Array => JsonSchema::of_type(SimpleType::Array),
        PropertyType::Date => JsonSchema::formatted_string("date-time"),
        PropertyType::Buffer => JsonSchema::formatted_string("buffer"),
        PropertyType::Binary => JsonSchema::formatted_string("binary"),
        PropertyType::Any => JsonSchema::default(),
        PropertyType::Model(name) => {
            let model = provider
                .model_definition(name)
                .ok_or_else(|| SchemaError::UnsupportedType(name.clone()))?;
            JsonSchema::definition_ref(model.display_title())
        }
    };
    Ok(schema)
}

/// Convert one property definition into a schema fragment.
///
/// `name` only labels errors. Model references become `$ref`s to the
/// referenced model's plain title; the model synthesizer rewrites them when
/// options change that title.
pub fn property_to_json_schema<P: ModelProvider + ?Sized>(
    provider: &P,
    name: &str,
    property: &PropertyDefinition,
) -> Result<JsonSchema> {
    let mut schema = if property.property_type.is_array() {
        match &property.item_type {
            Some(item) if item.is_array() && property.json_schema.is_none() => {
                return Err(SchemaError::AmbiguousNestedArray(name.to_string()));
            }
            Some(item) => JsonSchema::array_of(type_to_json_schema(provider, item)?),
            None => JsonSchema::of_type(SimpleType::Array),
        }
    } else {
        type_to_json_schema(provider, &property.property_type)?
    };

    if let Some(description) = &property.description {
        schema.description = Some(description.clone());
    }
    if let Some(raw) = &property.json_schema {
        schema.merge_raw(raw)?;
    }

    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelDefinition;
    use crate::registry::ModelRegistry;
    use serde_json::json;

    fn convert(property: PropertyDefinition) -> Result<serde_json::Value> {
        let mut registry = ModelRegistry::new();
        registry.register(ModelDefinition::new("Address")).unwrap();
        registry.register(ModelDefinition::new("Customer").title("Client")).unwrap();
        let schema = property_to_json_schema(&registry, "prop", &property)?;
        Ok(serde_json::to_value(schema).unwrap())
    }

    #[test]
    fn test_primitives() {
        assert_eq!(convert(PropertyDefinition::string()).unwrap(), json!({"type": "string"}));
        assert_eq!(convert(PropertyDefinition::number()).unwrap(), json!({"type": "number"}));
        assert_eq!(convert(PropertyDefinition::boolean()).unwrap(), json!({"type": "boolean"}));
        assert_eq!(
            convert(PropertyDefinition::new(PropertyType::Object)).unwrap(),
            json!({"type": "object"})
        );
    }

    #[test]
    fn test_date_and_binary_formats() {
        assert_eq!(
            convert(PropertyDefinition::date()).unwrap(),
            json!({"type": "string", "format": "date-time"})
        );
        assert_eq!(
            convert(PropertyDefinition::new(PropertyType::Buffer)).unwrap(),
            json!({"type": "string", "format": "buffer"})
        );
        assert_eq!(
            convert(PropertyDefinition::new(PropertyType::Binary)).unwrap(),
            json!({"type": "string", "format": "binary"})
        );
    }

    #[test]
    fn test_any_is_empty_fragment() {
        assert_eq!(convert(PropertyDefinition::new(PropertyType::Any)).unwrap(), json!({}));
    }

    #[test]
    fn test_arrays() {
        assert_eq!(
            convert(PropertyDefinition::array(PropertyType::Number)).unwrap(),
            json!({"type": "array", "items": {"type": "number"}})
        );
        assert_eq!(
            convert(PropertyDefinition::new(PropertyType::Array)).unwrap(),
            json!({"type": "array"})
        );
    }

    #[test]
    fn test_model_reference_uses_title() {
        assert_eq!(
            convert(PropertyDefinition::model("Address")).unwrap(),
            json!({"$ref": "#/definitions/Address"})
        );
        assert_eq!(
            convert(PropertyDefinition::array(PropertyType::model("Customer"))).unwrap(),
            json!({"type": "array", "items": {"$ref": "#/definitions/Client"}})
        );
    }

    #[test]
    fn test_unknown_model_is_unsupported() {
        let err = convert(PropertyDefinition::model("Nope")).unwrap_err();
        assert!(matches!(err, SchemaError::UnsupportedType(name) if name == "Nope"));
    }

    #[test]
    fn test_nested_array_requires_override() {
        let nested = PropertyDefinition::array(PropertyType::Array);
        assert!(matches!(
            convert(nested.clone()),
            Err(SchemaError::AmbiguousNestedArray(name)) if name == "prop"
        ));

        let with_override = nested.json_schema(json!({
            "items": {"type": "array", "items": {"type": "number"}}
        }));
        assert_eq!(
            convert(with_override).unwrap(),
            json!({"type": "array", "items": {"type": "array", "items": {"type": "number"}}})
        );
    }

    #[test]
    fn test_tuple_items_override() {
        let pair = PropertyDefinition::array(PropertyType::Number).json_schema(json!({
            "items": [{"type": "number"}, {"type": "number"}],
            "minItems": 2
        }));
        assert_eq!(
            convert(pair).unwrap(),
            json!({
                "type": "array",
                "items": [{"type": "number"}, {"type": "number"}],
                "minItems": 2
            })
        );
    }

    #[test]
    fn test_description_and_augmentation_merge_last() {
        let property = PropertyDefinition::string()
            .description("Customer email")
            .json_schema(json!({"format": "email", "minLength": 5, "type": "string"}));
        assert_eq!(
            convert(property).unwrap(),
            json!({
                "type": "string",
                "description": "Customer email",
                "format": "email",
                "minLength": 5
            })
        );
    }
}
