//! Server round-trips over `handle_message`, including config overrides.

use std::fs;
use std::sync::Arc;

use async_trait::async_trait;
use prompt_mcp::PromptMcpServer;
use prompt_template::{BranchInfo, Result as TemplateResult};
use serde_json::Value;
use tempfile::TempDir;

struct FixedBranches;

#[async_trait]
impl BranchInfo for FixedBranches {
    async fn current_branch(&self) -> TemplateResult<String> {
        Ok("feat/payment".to_string())
    }

    async fn default_branch(&self) -> TemplateResult<String> {
        Ok("main".to_string())
    }
}

fn server_with_config() -> (TempDir, PromptMcpServer) {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    // Non-default directories, wired through prompts.toml.
    fs::write(
        root.join("prompts.toml"),
        "templates_dir = \"guidance\"\nplans_dir = \"docs/plans\"\n",
    )
    .unwrap();
    fs::create_dir_all(root.join("guidance")).unwrap();
    fs::write(
        root.join("guidance/commit-message.md"),
        "---\ndescription: Draft a commit message\n---\nDraft a commit message for {{currentBranch}} targeting {{defaultBranch}}.",
    )
    .unwrap();

    let server = PromptMcpServer::with_branches(root, Arc::new(FixedBranches)).unwrap();
    (dir, server)
}

async fn call(server: &PromptMcpServer, message: &str) -> Value {
    let response = server.handle_message(message).await.unwrap();
    serde_json::from_str(&response).unwrap()
}

#[tokio::test]
async fn full_session_initialize_list_get() {
    let (_dir, server) = server_with_config();

    let init = call(
        &server,
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
    )
    .await;
    assert_eq!(init["result"]["protocolVersion"], "2024-11-05");

    let listed = call(
        &server,
        r#"{"jsonrpc":"2.0","id":2,"method":"prompts/list","params":{}}"#,
    )
    .await;
    let prompts = listed["result"]["prompts"].as_array().unwrap();
    assert_eq!(prompts.len(), 1);
    assert_eq!(prompts[0]["name"], "commit-message");
    assert_eq!(prompts[0]["description"], "Draft a commit message");
    // Both referenced parameters are auto; nothing is advertised.
    assert!(prompts[0]["arguments"].as_array().unwrap().is_empty());

    let got = call(
        &server,
        r#"{"jsonrpc":"2.0","id":3,"method":"prompts/get","params":{"name":"commit-message"}}"#,
    )
    .await;
    assert_eq!(
        got["result"]["messages"][0]["content"]["text"],
        "Draft a commit message for feat/payment targeting main."
    );
}

#[tokio::test]
async fn auto_parameters_ignore_caller_values_end_to_end() {
    let (_dir, server) = server_with_config();

    let got = call(
        &server,
        r#"{"jsonrpc":"2.0","id":4,"method":"prompts/get","params":{"name":"commit-message","arguments":{"currentBranch":"attacker-controlled"}}}"#,
    )
    .await;

    let text = got["result"]["messages"][0]["content"]["text"].as_str().unwrap();
    assert!(text.contains("feat/payment"));
    assert!(!text.contains("attacker-controlled"));
}

#[tokio::test]
async fn plan_tool_honors_configured_plans_dir() {
    let (dir, server) = server_with_config();

    let response = call(
        &server,
        r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"plan_create","arguments":{"title":"Payment Rework"}}}"#,
    )
    .await;
    assert!(response["result"]["is_error"].is_null());

    let plan = dir.path().join("docs/plans/payment-rework.md");
    assert!(plan.is_file());
}
