//! End-to-end tests for the `schema-export` binary

use std::path::Path;
use std::process::{Command, Output};

use serde_json::{json, Value};

fn models_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("todo.json"), include_str!("fixtures/todo.json")).unwrap();
    dir
}

fn schema_export(models: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_schema-export"))
        .arg("--models")
        .arg(models)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "schema-export failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

// =============================================================================
// Model Schemas
// =============================================================================

#[test]
fn test_export_model_with_relations() {
    let dir = models_dir();
    let output = schema_export(dir.path(), &["TodoList", "--include-relations"]);

    let expected: Value =
        serde_json::from_str(include_str!("fixtures/todo_list_with_relations.expected.json")).unwrap();
    assert_eq!(stdout_json(&output), expected);
}

#[test]
fn test_export_deep_partial_model() {
    let dir = models_dir();
    let output = schema_export(dir.path(), &["Todo", "--deep", "--exclude", "id,dueDate"]);

    let value = stdout_json(&output);
    assert_eq!(value["title"], json!("TodoDeepPartialExcluding_dueDate-id_"));
    assert!(value.get("required").is_none());
    assert!(value["properties"].get("id").is_none());
}

#[test]
fn test_export_schema_ref() {
    let dir = models_dir();
    let output = schema_export(dir.path(), &["Todo", "--ref"]);

    let value = stdout_json(&output);
    assert_eq!(value["$ref"], json!("#/definitions/Todo"));
    assert_eq!(value["definitions"]["Todo"]["title"], json!("Todo"));
}

// =============================================================================
// Filters & Failures
// =============================================================================

#[test]
fn test_export_filter() {
    let dir = models_dir();
    let output = schema_export(dir.path(), &["TodoList", "--kind", "filter"]);

    let value = stdout_json(&output);
    assert_eq!(value["title"], json!("TodoList.Filter"));
    assert_eq!(value["properties"]["include"]["items"]["anyOf"][1]["enum"], json!(["todos"]));
}

#[test]
fn test_unknown_model_suggests_names() {
    let dir = models_dir();
    let output = schema_export(dir.path(), &["TodoLst"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("did you mean"), "stderr: {}", stderr);
    assert!(stderr.contains("TodoList"), "stderr: {}", stderr);
}

#[test]
fn test_missing_models_directory_fails() {
    let dir = models_dir();
    let output = schema_export(&dir.path().join("nope"), &["Todo"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("loading models from"), "stderr: {}", stderr);
}
