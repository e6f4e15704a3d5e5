//! MCP Tool implementations
//!
//! # Tools
//!
//! - `plan_create` - Scaffold a plan file under the plans directory
//! - `branch_status` - Current/default branch plus work-in-progress summary
//! - `pr_status` - GitHub pull request for the current branch

use std::collections::HashMap;
use std::path::Path;

use prompt_template::{BranchInfo, ParameterRegistry, resolve_parameter};
use prompt_vcs::{GhCli, GitCli};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{Error, Result};

/// Tool definition for MCP protocol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

/// Result from a tool invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

/// Content types for tool results
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ToolContent {
    #[serde(rename = "text")]
    Text { text: String },
}

impl ToolResult {
    /// Create a successful text result
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: content.into(),
            }],
            is_error: None,
        }
    }

    /// Create an error result
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: message.into(),
            }],
            is_error: Some(true),
        }
    }
}

/// Everything tool handlers may draw on.
pub struct ToolContext<'a> {
    pub plans_root: &'a Path,
    pub registry: &'a ParameterRegistry,
    pub branches: &'a dyn BranchInfo,
    pub git: &'a GitCli,
    pub gh: &'a GhCli,
}

/// Get all available tool definitions
pub fn get_tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "plan_create".to_string(),
            description: "Create a plan file scaffold under the plans directory".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "title": {
                        "type": "string",
                        "description": "Plan title"
                    },
                    "issue_id": {
                        "type": "string",
                        "description": "Linear issue ID (e.g. AB-123), may be embedded in text"
                    },
                    "summary": {
                        "type": "string",
                        "description": "One-paragraph context for the plan"
                    }
                },
                "required": ["title"]
            }),
        },
        ToolDefinition {
            name: "branch_status".to_string(),
            description: "Show the current branch and its work relative to the default branch"
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {}
            }),
        },
        ToolDefinition {
            name: "pr_status".to_string(),
            description: "Show the GitHub pull request for the current branch".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {}
            }),
        },
    ]
}

#[derive(Debug, Deserialize)]
struct PlanCreateArgs {
    title: String,
    #[serde(default)]
    issue_id: Option<String>,
    #[serde(default)]
    summary: Option<String>,
}

/// Dispatch a tool call to its handler.
pub async fn handle_tool_call(
    cx: &ToolContext<'_>,
    name: &str,
    arguments: Value,
) -> Result<Value> {
    match name {
        "plan_create" => plan_create(cx, arguments).await,
        "branch_status" => branch_status(cx).await,
        "pr_status" => pr_status(cx).await,
        _ => Err(Error::UnknownTool(name.to_string())),
    }
}

async fn plan_create(cx: &ToolContext<'_>, arguments: Value) -> Result<Value> {
    let args: PlanCreateArgs =
        serde_json::from_value(arguments).map_err(|e| Error::InvalidArguments {
            message: e.to_string(),
        })?;

    let title = args.title.trim();
    if title.is_empty() {
        return Err(Error::InvalidArguments {
            message: "title must not be empty".to_string(),
        });
    }

    // Validate the issue ID through the same pipeline prompts use.
    let issue = match args.issue_id.as_deref() {
        Some(raw) => Some(
            resolve_parameter(
                cx.registry,
                cx.branches,
                "plan_create",
                "linearIssueId",
                &HashMap::new(),
                Some(raw),
            )
            .await?,
        ),
        None => None,
    };

    // Branch context is best effort; a plan outside a repository still
    // gets written.
    let branch = cx.branches.current_branch().await.ok();

    let slug = slugify(title);
    let path = cx.plans_root.join(format!("{slug}.md"));
    let content = plan_scaffold(
        title,
        issue.as_deref(),
        branch.as_deref(),
        args.summary.as_deref(),
    );
    prompt_store::write_atomic(&path, &content)?;

    tracing::info!(path = %path.display(), "created plan file");
    Ok(json!({
        "path": path.display().to_string(),
        "slug": slug,
        "issue": issue,
    }))
}

async fn branch_status(cx: &ToolContext<'_>) -> Result<Value> {
    let current = cx.git.current_branch_name().await?;
    let default = cx.git.default_branch_name().await?;

    if current == default {
        return Ok(json!({
            "current_branch": current,
            "default_branch": default,
            "commits_ahead": [],
            "changed_files": [],
        }));
    }

    let commits = cx.git.commits_ahead(&default).await?;
    let files = cx.git.changed_files(&default).await?;
    Ok(json!({
        "current_branch": current,
        "default_branch": default,
        "commits_ahead": commits,
        "changed_files": files,
    }))
}

async fn pr_status(cx: &ToolContext<'_>) -> Result<Value> {
    let current = cx.git.current_branch_name().await?;

    match cx.gh.pr_for_branch(&current).await? {
        Some(pr) => Ok(json!({
            "branch": current,
            "found": true,
            "pull_request": pr,
        })),
        None => Ok(json!({
            "branch": current,
            "found": false,
        })),
    }
}

/// Convert a plan title to a flat file slug: lowercase alphanumerics with
/// single dashes.
fn slugify(title: &str) -> String {
    let mut result = String::with_capacity(title.len());
    let mut last_was_dash = true; // Start true to skip leading dashes

    for c in title.chars() {
        if c.is_alphanumeric() {
            for lower in c.to_lowercase() {
                result.push(lower);
            }
            last_was_dash = false;
        } else if !last_was_dash {
            result.push('-');
            last_was_dash = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }

    result
}

fn plan_scaffold(
    title: &str,
    issue: Option<&str>,
    branch: Option<&str>,
    summary: Option<&str>,
) -> String {
    let created = chrono::Local::now().format("%Y-%m-%d");

    let mut frontmatter = format!("---\ntitle: {title}\ncreated: {created}\n");
    if let Some(issue) = issue {
        frontmatter.push_str(&format!("issue: {issue}\n"));
    }
    if let Some(branch) = branch {
        frontmatter.push_str(&format!("branch: {branch}\n"));
    }
    frontmatter.push_str("---\n");

    let context = summary.unwrap_or("(fill in)");
    format!(
        "{frontmatter}\n# {title}\n\n## Context\n\n{context}\n\n## Approach\n\n## Steps\n\n## Verification\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definitions_cover_all_tools() {
        let tools = get_tool_definitions();
        let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["plan_create", "branch_status", "pr_status"]);
    }

    #[test]
    fn plan_create_requires_title() {
        let schema = &get_tool_definitions()[0].input_schema;
        assert_eq!(schema["required"][0], "title");
    }

    #[test]
    fn slugify_flattens_titles() {
        assert_eq!(slugify("Add Login Flow"), "add-login-flow");
        assert_eq!(slugify("  spaced  out  "), "spaced-out");
        assert_eq!(slugify("Fix: crash on empty input!"), "fix-crash-on-empty-input");
    }

    #[test]
    fn scaffold_includes_optional_sections() {
        let content = plan_scaffold("Auth", Some("AB-12"), Some("feat/auth"), Some("why"));
        assert!(content.starts_with("---\ntitle: Auth\n"));
        assert!(content.contains("issue: AB-12"));
        assert!(content.contains("branch: feat/auth"));
        assert!(content.contains("## Context\n\nwhy"));
    }

    #[test]
    fn scaffold_omits_missing_metadata() {
        let content = plan_scaffold("Auth", None, None, None);
        assert!(!content.contains("issue:"));
        assert!(!content.contains("branch:"));
        assert!(content.contains("(fill in)"));
    }

    #[test]
    fn tool_result_error_sets_flag() {
        let result = ToolResult::error("boom");
        assert_eq!(result.is_error, Some(true));
    }
}
