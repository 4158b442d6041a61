//! Golden Tests for Generated Schemas
//!
//! Model definitions are read from `tests/fixtures` and the generated
//! documents are compared against expected JSON or validated with the
//! `jsonschema` crate.

use std::sync::Arc;

use repository_json_schema::{
    get_filter_json_schema_for, model_to_json_schema, CompiledSchema, FilterSchemaOptions, JsonSchema,
    JsonSchemaCache, JsonSchemaOptions, ModelDefinition, ModelGraph, ModelRegistry, PropertyDefinition,
    PropertyType, SchemaError,
};
use serde_json::{json, Value};

fn registry_from(fixture: &str) -> ModelRegistry {
    let value: Value = serde_json::from_str(fixture).unwrap();
    let models: Vec<ModelDefinition> = match value {
        Value::Array(_) => serde_json::from_value(value).unwrap(),
        other => vec![serde_json::from_value(other).unwrap()],
    };

    let mut registry = ModelRegistry::new();
    for model in models {
        registry.register(model).unwrap();
    }
    registry
}

fn expected(fixture: &str) -> Value {
    serde_json::from_str(fixture).unwrap()
}

fn to_json(schema: &JsonSchema) -> Value {
    serde_json::to_value(schema).unwrap()
}

// =============================================================================
// Model Schemas
// =============================================================================

#[test]
fn test_product_default_options() {
    let registry = registry_from(include_str!("fixtures/product.json"));
    let mut cache = JsonSchemaCache::new();

    let schema = cache
        .get_json_schema(&registry, "Product", &JsonSchemaOptions::default())
        .unwrap();
    assert_eq!(to_json(&schema), expected(include_str!("fixtures/product.expected.json")));
}

#[test]
fn test_product_excluding_id() {
    let mut registry = ModelRegistry::new();
    registry
        .register(
            ModelDefinition::new("Product")
                .property("id", PropertyDefinition::number().id().required())
                .property("name", PropertyDefinition::string()),
        )
        .unwrap();

    let options = JsonSchemaOptions::new().exclude(["id"]);
    let schema = model_to_json_schema(&registry, "Product", &options).unwrap();
    assert_eq!(
        to_json(&schema),
        json!({
            "title": "ProductExcluding_id_",
            "type": "object",
            "properties": {"name": {"type": "string"}},
            "additionalProperties": false
        })
    );
}

#[test]
fn test_excluded_property_never_required() {
    let registry = registry_from(include_str!("fixtures/product.json"));
    for name in ["id", "name"] {
        let schema = model_to_json_schema(&registry, "Product", &JsonSchemaOptions::new().exclude([name])).unwrap();
        assert!(schema.property(name).is_none());
        assert!(!schema.required.unwrap_or_default().iter().any(|r| r == name));
    }
}

#[test]
fn test_partial_has_no_required() {
    let registry = registry_from(include_str!("fixtures/product.json"));
    let schema = model_to_json_schema(&registry, "Product", &JsonSchemaOptions::new().partial()).unwrap();
    assert!(to_json(&schema).get("required").is_none());
}

#[test]
fn test_primitive_arrays() {
    let registry = registry_from(include_str!("fixtures/catalog.json"));
    let schema = model_to_json_schema(&registry, "Product", &JsonSchemaOptions::default()).unwrap();

    assert_eq!(
        to_json(schema.property("ratings").unwrap()),
        json!({"type": "array", "items": {"type": "number"}})
    );
    assert_eq!(
        to_json(schema.property("tags").unwrap()),
        json!({"type": "array", "items": {"type": "string"}})
    );
}

#[test]
fn test_mutual_references_are_flattened() {
    let registry = registry_from(include_str!("fixtures/catalog.json"));
    let schema = model_to_json_schema(&registry, "Category", &JsonSchemaOptions::default()).unwrap();

    assert_eq!(
        to_json(schema.property("products").unwrap()),
        json!({"type": "array", "items": {"$ref": "#/definitions/Product"}})
    );

    let definitions = schema.definitions.as_ref().unwrap();
    assert_eq!(definitions.len(), 1);
    let product = &definitions["Product"];
    assert!(product.definitions.is_none());
    assert_eq!(
        to_json(product.property("category").unwrap()),
        json!({"$ref": "#/definitions/Category"})
    );
}

#[test]
fn test_self_reference_terminates() {
    let mut registry = ModelRegistry::new();
    registry
        .register(
            ModelDefinition::new("Employee")
                .property("name", PropertyDefinition::string().required())
                .property("manager", PropertyDefinition::model("Employee"))
                .property("reports", PropertyDefinition::array(PropertyType::model("Employee"))),
        )
        .unwrap();

    let schema = model_to_json_schema(&registry, "Employee", &JsonSchemaOptions::default()).unwrap();
    assert_eq!(to_json(schema.property("manager").unwrap()), json!({"$ref": "#/definitions/Employee"}));
    assert!(schema.definitions.is_none());
}

#[test]
fn test_relations_golden() {
    let registry = registry_from(include_str!("fixtures/todo.json"));
    let options = JsonSchemaOptions::new().include_relations();
    let schema = model_to_json_schema(&registry, "TodoList", &options).unwrap();

    assert_eq!(
        to_json(&schema),
        expected(include_str!("fixtures/todo_list_with_relations.expected.json"))
    );
}

#[test]
fn test_unknown_relation_target_aborts() {
    let mut registry = registry_from(include_str!("fixtures/todo.json"));
    registry
        .add_relation(
            "Todo",
            repository_json_schema::RelationDefinition::has_one("owner", "Todo", "User"),
        )
        .unwrap();

    let err = model_to_json_schema(&registry, "Todo", &JsonSchemaOptions::new().include_relations()).unwrap_err();
    assert!(matches!(err, SchemaError::UnsupportedType(ref t) if t == "User"));
}

// =============================================================================
// Cache
// =============================================================================

#[test]
fn test_cache_returns_identical_documents() {
    let registry = registry_from(include_str!("fixtures/todo.json"));
    let mut cache = JsonSchemaCache::new();

    let option_sets = [
        JsonSchemaOptions::default(),
        JsonSchemaOptions::new().partial(),
        JsonSchemaOptions::new().exclude(["id"]).optional(["title"]),
        JsonSchemaOptions::new().include_relations(),
        JsonSchemaOptions::new().title("NewTodo").exclude(["id"]),
    ];

    for options in &option_sets {
        let first = cache.get_json_schema(&registry, "Todo", options).unwrap();
        let second = cache.get_json_schema(&registry, "Todo", &options.clone()).unwrap();
        assert!(Arc::ptr_eq(&first, &second), "cache miss for {}", options.cache_key());
    }
    assert_eq!(cache.len(), option_sets.len());
}

#[test]
fn test_schema_ref_is_self_contained() {
    let registry = registry_from(include_str!("fixtures/todo.json"));
    let mut cache = JsonSchemaCache::new();

    let wrapped = cache
        .get_json_schema_ref(&registry, "TodoList", &JsonSchemaOptions::new().include_relations())
        .unwrap();
    let value = to_json(&wrapped);
    assert_eq!(value["$ref"], json!("#/definitions/TodoListWithRelations"));
    assert!(value["definitions"]["TodoListWithRelations"].get("definitions").is_none());
    assert!(value["definitions"]["TodoWithRelations"].is_object());

    let compiled = CompiledSchema::compile(&wrapped).unwrap();
    let list = json!({
        "title": "Groceries",
        "todos": [
            {"title": "Milk", "isComplete": false, "todoList": {"title": "Groceries"}},
            {"title": "Bread", "priority": "high"}
        ]
    });
    assert!(compiled.validate(&list).is_ok());

    let untitled_todo = json!({"title": "Groceries", "todos": [{"isComplete": true}]});
    assert!(matches!(
        compiled.validate(&untitled_todo),
        Err(SchemaError::ValidationFailed(_))
    ));

    let extra_key = json!({"title": "Groceries", "color": "red"});
    assert!(!compiled.is_valid(&extra_key));
}

// =============================================================================
// Filters
// =============================================================================

#[test]
fn test_filter_schema_validates_queries() {
    let registry = registry_from(include_str!("fixtures/todo.json"));
    let todo_list = registry.get("TodoList").unwrap();
    let schema = get_filter_json_schema_for(todo_list, &FilterSchemaOptions::default());
    let compiled = CompiledSchema::compile(&schema).unwrap();

    let valid = [
        json!({}),
        json!({"limit": 10, "skip": 0, "order": "title ASC"}),
        json!({"where": {"title": {"like": "%milk%"}}, "fields": ["id", "title"]}),
        json!({"fields": {"id": true, "title": false}}),
        json!({"include": ["todos"]}),
        json!({"include": [{"relation": "todos", "scope": {"limit": 5, "include": [{"relation": "x"}]}}]}),
    ];
    for query in &valid {
        assert!(compiled.is_valid(query), "expected valid: {}", query);
    }

    let invalid = [
        json!({"limit": 0}),
        json!({"offset": -1}),
        json!({"order": 3}),
        json!({"fields": ["id", "color"]}),
        json!({"fields": ["id", "id"]}),
        json!({"include": ["owner"]}),
        json!({"unknown": true}),
    ];
    for query in &invalid {
        assert!(!compiled.is_valid(query), "expected invalid: {}", query);
    }
}

// =============================================================================
// Registry Loading & Graph
// =============================================================================

#[test]
fn test_fixture_directory_loading() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("catalog.json"), include_str!("fixtures/catalog.json")).unwrap();
    std::fs::write(dir.path().join("todo.json"), include_str!("fixtures/todo.json")).unwrap();

    let mut registry = ModelRegistry::new();
    assert_eq!(registry.load_from_directory(dir.path()).unwrap(), 4);
    assert_eq!(registry.validate_relations().unwrap().len(), 2);

    let graph = ModelGraph::build(&registry);
    assert_eq!(
        graph.cycles(),
        vec![
            vec!["Category".to_string(), "Product".to_string()],
            vec!["Todo".to_string(), "TodoList".to_string()],
        ]
    );
}
