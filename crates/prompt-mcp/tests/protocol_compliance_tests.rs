//! JSON-RPC protocol behavior over `handle_message`, with a fake branch
//! provider and a temporary template tree.

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
        Ok("feat/login".to_string())
    }

    async fn default_branch(&self) -> TemplateResult<String> {
        Ok("main".to_string())
    }
}

fn server_fixture() -> (TempDir, PromptMcpServer) {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    let templates = root.join("templates");
    fs::create_dir_all(templates.join("plan")).unwrap();
    fs::write(
        templates.join("write-tests.md"),
        "---\ndescription: Guidance for writing tests\n---\nTest {{target}} on {{currentBranch}}. See doc://testing/style.",
    )
    .unwrap();
    fs::write(
        templates.join("plan/create.md"),
        "Plan for {{linearIssueId}}: {{> plan/_instructions planType=\"feature\"}}",
    )
    .unwrap();
    fs::write(
        templates.join("plan/_instructions.md"),
        "create a {{planType}} plan on {{currentBranch}}",
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
async fn initialize_reports_capabilities() {
    let (_dir, server) = server_fixture();
    let response = call(
        &server,
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
    )
    .await;

    assert_eq!(response["jsonrpc"], "2.0");
    assert_eq!(response["result"]["serverInfo"]["name"], "prompt-mcp");
    assert!(response["result"]["capabilities"]["prompts"].is_object());
    assert!(response["result"]["capabilities"]["resources"].is_object());
    assert!(response["result"]["capabilities"]["tools"].is_object());
}

#[tokio::test]
async fn initialized_notification_has_no_response() {
    let (_dir, server) = server_fixture();
    let response = server
        .handle_message(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
        .await
        .unwrap();
    assert!(response.is_empty());
}

#[tokio::test]
async fn prompts_list_excludes_partials_and_auto_arguments() {
    let (_dir, server) = server_fixture();
    let response = call(
        &server,
        r#"{"jsonrpc":"2.0","id":2,"method":"prompts/list","params":{}}"#,
    )
    .await;

    let prompts = response["result"]["prompts"].as_array().unwrap();
    let names: Vec<&str> = prompts.iter().map(|p| p["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["plan/create", "write-tests"]);

    // write-tests references target (optional) and currentBranch (auto);
    // only target is advertised.
    let write_tests = &prompts[1];
    let args = write_tests["arguments"].as_array().unwrap();
    assert_eq!(args.len(), 1);
    assert_eq!(args[0]["name"], "target");
    assert_eq!(args[0]["required"], false);

    // plan/create requires the issue ID; planType is bound at the call
    // site and never surfaces.
    let plan = &prompts[0];
    let args = plan["arguments"].as_array().unwrap();
    assert_eq!(args.len(), 1);
    assert_eq!(args[0]["name"], "linearIssueId");
    assert_eq!(args[0]["required"], true);
}

#[tokio::test]
async fn prompts_get_renders_and_links_resources() {
    let (_dir, server) = server_fixture();
    let response = call(
        &server,
        r#"{"jsonrpc":"2.0","id":3,"method":"prompts/get","params":{"name":"write-tests","arguments":{}}}"#,
    )
    .await;

    let messages = response["result"]["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(
        messages[0]["content"]["text"],
        "Test the current context on feat/login. See doc://testing/style."
    );
    assert_eq!(messages[1]["content"]["type"], "resource_link");
    assert_eq!(messages[1]["content"]["uri"], "doc://testing/style");
}

#[tokio::test]
async fn prompts_get_expands_partials_with_literal_args() {
    let (_dir, server) = server_fixture();
    let response = call(
        &server,
        r#"{"jsonrpc":"2.0","id":4,"method":"prompts/get","params":{"name":"plan/create","arguments":{"linearIssueId":"fix AB-12 now"}}}"#,
    )
    .await;

    assert_eq!(
        response["result"]["messages"][0]["content"]["text"],
        "Plan for AB-12: create a feature plan on feat/login"
    );
}

#[tokio::test]
async fn prompts_get_missing_required_is_invalid_params() {
    let (_dir, server) = server_fixture();
    let response = call(
        &server,
        r#"{"jsonrpc":"2.0","id":5,"method":"prompts/get","params":{"name":"plan/create","arguments":{}}}"#,
    )
    .await;

    assert_eq!(response["error"]["code"], -32602);
    assert!(
        response["error"]["message"]
            .as_str()
            .unwrap()
            .contains("linearIssueId")
    );
}

#[tokio::test]
async fn prompts_get_invalid_issue_id_names_the_expectation() {
    let (_dir, server) = server_fixture();
    let response = call(
        &server,
        r#"{"jsonrpc":"2.0","id":6,"method":"prompts/get","params":{"name":"plan/create","arguments":{"linearIssueId":"no id here"}}}"#,
    )
    .await;

    assert_eq!(response["error"]["code"], -32602);
    assert!(
        response["error"]["message"]
            .as_str()
            .unwrap()
            .contains("No valid Linear issue ID")
    );
}

#[tokio::test]
async fn prompts_get_unknown_prompt_is_invalid_params() {
    let (_dir, server) = server_fixture();
    let response = call(
        &server,
        r#"{"jsonrpc":"2.0","id":7,"method":"prompts/get","params":{"name":"ghost","arguments":{}}}"#,
    )
    .await;
    assert_eq!(response["error"]["code"], -32602);
}

#[tokio::test]
async fn resources_list_includes_partials() {
    let (_dir, server) = server_fixture();
    let response = call(
        &server,
        r#"{"jsonrpc":"2.0","id":8,"method":"resources/list","params":{}}"#,
    )
    .await;

    let resources = response["result"]["resources"].as_array().unwrap();
    let uris: Vec<&str> = resources.iter().map(|r| r["uri"].as_str().unwrap()).collect();
    assert!(uris.contains(&"template://plan/_instructions"));
    assert!(uris.contains(&"template://write-tests"));
}

#[tokio::test]
async fn resources_read_returns_raw_content() {
    let (_dir, server) = server_fixture();
    let response = call(
        &server,
        r#"{"jsonrpc":"2.0","id":9,"method":"resources/read","params":{"uri":"template://write-tests"}}"#,
    )
    .await;

    let content = &response["result"]["contents"][0];
    assert_eq!(content["uri"], "template://write-tests");
    assert_eq!(content["mimeType"], "text/markdown");
    // Raw reads keep the frontmatter.
    assert!(content["text"].as_str().unwrap().starts_with("---\n"));
}

#[tokio::test]
async fn resources_read_unknown_is_invalid_params() {
    let (_dir, server) = server_fixture();
    let response = call(
        &server,
        r#"{"jsonrpc":"2.0","id":10,"method":"resources/read","params":{"uri":"template://ghost"}}"#,
    )
    .await;
    assert_eq!(response["error"]["code"], -32602);
}

#[tokio::test]
async fn tools_list_reports_definitions() {
    let (_dir, server) = server_fixture();
    let response = call(
        &server,
        r#"{"jsonrpc":"2.0","id":11,"method":"tools/list","params":{}}"#,
    )
    .await;

    let tools = response["result"]["tools"].as_array().unwrap();
    let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
    assert!(names.contains(&"plan_create"));
    assert!(names.contains(&"branch_status"));
    assert!(names.contains(&"pr_status"));
}

#[tokio::test]
async fn tools_call_plan_create_writes_scaffold() {
    let (dir, server) = server_fixture();
    let response = call(
        &server,
        r#"{"jsonrpc":"2.0","id":12,"method":"tools/call","params":{"name":"plan_create","arguments":{"title":"Add Login Flow","issue_id":"see AB-99","summary":"why"}}}"#,
    )
    .await;

    assert!(response["result"]["is_error"].is_null());

    let plan_path = dir.path().join("plans/add-login-flow.md");
    let content = fs::read_to_string(&plan_path).unwrap();
    assert!(content.contains("title: Add Login Flow"));
    assert!(content.contains("issue: AB-99"));
    assert!(content.contains("branch: feat/login"));
    assert!(content.contains("## Context\n\nwhy"));
}

#[tokio::test]
async fn tools_call_unknown_tool_is_in_band_error() {
    let (_dir, server) = server_fixture();
    let response = call(
        &server,
        r#"{"jsonrpc":"2.0","id":13,"method":"tools/call","params":{"name":"ghost","arguments":{}}}"#,
    )
    .await;

    assert_eq!(response["result"]["is_error"], true);
    assert!(
        response["result"]["content"][0]["text"]
            .as_str()
            .unwrap()
            .contains("unknown tool")
    );
}

#[tokio::test]
async fn unknown_method_is_method_not_found() {
    let (_dir, server) = server_fixture();
    let response = call(
        &server,
        r#"{"jsonrpc":"2.0","id":14,"method":"mystery/method","params":{}}"#,
    )
    .await;

    assert_eq!(response["error"]["code"], -32601);
}

#[tokio::test]
async fn invalid_json_is_an_error() {
    let (_dir, server) = server_fixture();
    let result = server.handle_message(r#"{"broken json"#).await;
    assert!(result.is_err());
}
