//! Full extraction → resolution → rendering → linking pipeline against a
//! file-backed store, the way the server drives it.

use std::collections::HashMap;
use std::fs;

use async_trait::async_trait;
use prompt_template::{
    BranchInfo, Error, ParameterRegistry, Result, extract_placeholders, extract_resource_uris,
    parameters_used_in_template, render_template, resolve_parameters,
};
use prompt_store::TemplateStore;
use tempfile::TempDir;

struct FixedBranches;

#[async_trait]
impl BranchInfo for FixedBranches {
    async fn current_branch(&self) -> Result<String> {
        Ok("feat/auth".to_string())
    }

    async fn default_branch(&self) -> Result<String> {
        Ok("main".to_string())
    }
}

fn store_fixture() -> (TempDir, TemplateStore) {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    fs::create_dir_all(root.join("review")).unwrap();
    fs::write(
        root.join("review/branch.md"),
        "Review {{target}}: compare {{currentBranch}} against {{defaultBranch}}.\n\
         {{> review/_checklist focus=\"correctness\"}}\n\
         Reference @doc://review/standards.",
    )
    .unwrap();
    fs::write(
        root.join("review/_checklist.md"),
        "Check {{focus}} on {{currentBranch}}.",
    )
    .unwrap();

    let store = TemplateStore::new(root);
    (dir, store)
}

#[tokio::test]
async fn end_to_end_render_with_auto_and_optional_parameters() {
    let (_dir, store) = store_fixture();
    let registry = ParameterRegistry::builtin();
    let body = store.read("review/branch").unwrap().body;

    // Extraction: focus is bound at the call site, the rest flow through.
    let placeholders = extract_placeholders(&body, &store).unwrap();
    assert!(placeholders.contains("target"));
    assert!(placeholders.contains("currentBranch"));
    assert!(placeholders.contains("defaultBranch"));
    assert!(!placeholders.contains("focus"));

    // Resolution: no caller arguments at all; optional falls back, autos
    // compute.
    let definitions = parameters_used_in_template(&registry, &body, &store).unwrap();
    let resolved = resolve_parameters(
        &registry,
        &FixedBranches,
        "review/branch",
        &definitions,
        &HashMap::new(),
    )
    .await
    .unwrap();

    let rendered = render_template(&body, &resolved, &store).unwrap();
    assert!(rendered.contains("Review the current context"));
    assert!(rendered.contains("compare feat/auth against main"));
    assert!(rendered.contains("Check correctness on feat/auth."));
    assert!(!rendered.contains("{{"));

    // Linking: the sigil and trailing period are both stripped.
    let uris = extract_resource_uris(&rendered);
    assert_eq!(uris.len(), 1);
    assert!(uris.contains("doc://review/standards"));
}

#[tokio::test]
async fn supplied_optional_value_survives_the_whole_pipeline() {
    let (_dir, store) = store_fixture();
    let registry = ParameterRegistry::builtin();
    let body = store.read("review/branch").unwrap().body;

    let definitions = parameters_used_in_template(&registry, &body, &store).unwrap();
    let supplied = HashMap::from([("target".to_string(), "  src/auth.rs  ".to_string())]);
    let resolved = resolve_parameters(
        &registry,
        &FixedBranches,
        "review/branch",
        &definitions,
        &supplied,
    )
    .await
    .unwrap();

    let rendered = render_template(&body, &resolved, &store).unwrap();
    assert!(rendered.contains("Review src/auth.rs:"));
}

#[tokio::test]
async fn render_rejects_values_for_absent_placeholders() {
    let (_dir, store) = store_fixture();
    let body = store.read("review/branch").unwrap().body;

    let mut context = HashMap::from([
        ("target".to_string(), "x".to_string()),
        ("currentBranch".to_string(), "b".to_string()),
        ("defaultBranch".to_string(), "m".to_string()),
        // Bound at the partial call site, so the caller never owes it.
        ("focus".to_string(), "speed".to_string()),
    ]);

    let err = render_template(&body, &context, &store).unwrap_err();
    assert!(matches!(err, Error::UnusedReplacementKey { name } if name == "focus"));

    context.remove("focus");
    assert!(render_template(&body, &context, &store).is_ok());
}
