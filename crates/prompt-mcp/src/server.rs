//! MCP Server implementation
//!
//! The main server struct that coordinates MCP protocol handling with the
//! template engine, store, and VCS collaborators.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use prompt_template::{BranchInfo, ParameterRegistry};
use prompt_store::TemplateStore;
use prompt_vcs::{GhCli, GitCli};
use serde_json::{Value, json};

use crate::config::ServerConfig;
use crate::prompts::{get_prompt, list_prompts};
use crate::protocol::{
    GetPromptParams, InitializeResult, JsonRpcRequest, JsonRpcResponse, PromptsCapability,
    ReadResourceParams, ResourcesCapability, ServerCapabilities, ServerInfo, ToolCallParams,
    ToolsCapability,
};
use crate::resources::{list_resources, read_resource};
use crate::tools::{ToolContext, ToolResult, get_tool_definitions, handle_tool_call};
use crate::{Error, Result};

const PROTOCOL_VERSION: &str = "2024-11-05";

/// MCP server exposing prompt templates, resources, and workflow tools.
pub struct PromptMcpServer {
    /// Server root (templates and plans live beneath it)
    root: PathBuf,

    /// Loaded configuration
    config: ServerConfig,

    /// Template store rooted at the configured templates directory
    store: TemplateStore,

    /// Parameter registry, built once at startup
    registry: ParameterRegistry,

    /// Branch lookups used by auto parameters
    branches: Arc<dyn BranchInfo>,

    /// Git CLI for branch introspection tools
    git: GitCli,

    /// GitHub CLI for PR introspection tools
    gh: GhCli,
}

impl PromptMcpServer {
    /// Create a server whose branch lookups go through the `git` CLI at
    /// `root`.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let branches = Arc::new(GitCli::new(&root));
        Self::with_branches(root, branches)
    }

    /// Create a server with an injected branch provider. Production uses
    /// [`GitCli`]; tests substitute a fake.
    pub fn with_branches(
        root: impl Into<PathBuf>,
        branches: Arc<dyn BranchInfo>,
    ) -> Result<Self> {
        let root = root.into();
        let config = ServerConfig::load(&root)?;
        let store = TemplateStore::new(config.templates_root(&root));

        tracing::info!(
            root = %root.display(),
            templates = %config.templates_dir.display(),
            "initialized prompt server"
        );

        Ok(Self {
            git: GitCli::new(&root),
            gh: GhCli::new(&root),
            config,
            store,
            registry: ParameterRegistry::builtin(),
            branches,
            root,
        })
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    pub fn store(&self) -> &TemplateStore {
        &self.store
    }

    pub fn registry(&self) -> &ParameterRegistry {
        &self.registry
    }

    /// Run the server, processing JSON-RPC messages over stdio.
    pub async fn run(&self) -> Result<()> {
        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();

        tracing::info!("MCP server ready, listening on stdio");

        for line in stdin.lock().lines() {
            let line = line?;
            if line.is_empty() {
                continue;
            }

            tracing::debug!(request = %line, "received message");

            match self.handle_message(&line).await {
                Ok(response) if !response.is_empty() => {
                    writeln!(stdout, "{}", response)?;
                    stdout.flush()?;
                }
                Ok(_) => {} // Notification, no response
                Err(e) => {
                    let error_response =
                        JsonRpcResponse::error(None, -32603, format!("Internal error: {}", e));
                    let json_str = serde_json::to_string(&error_response)?;
                    writeln!(stdout, "{}", json_str)?;
                    stdout.flush()?;
                }
            }
        }

        Ok(())
    }

    /// Handle a single JSON-RPC message, returning the serialized response
    /// (empty string for notifications).
    pub async fn handle_message(&self, message: &str) -> Result<String> {
        let request: JsonRpcRequest = serde_json::from_str(message)?;

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id)?,
            "initialized" | "notifications/initialized" => return Ok(String::new()),
            "prompts/list" => self.handle_prompts_list(request.id)?,
            "prompts/get" => self.handle_prompts_get(request.id, request.params).await?,
            "resources/list" => self.handle_resources_list(request.id)?,
            "resources/read" => self.handle_resources_read(request.id, request.params)?,
            "tools/list" => self.handle_tools_list(request.id)?,
            "tools/call" => self.handle_tools_call(request.id, request.params).await?,
            _ => JsonRpcResponse::error(
                request.id,
                -32601,
                format!("Method not found: {}", request.method),
            ),
        };

        serde_json::to_string(&response).map_err(Error::from)
    }

    fn handle_initialize(&self, id: Option<Value>) -> Result<JsonRpcResponse> {
        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                prompts: Some(PromptsCapability {
                    list_changed: Some(false),
                }),
                resources: Some(ResourcesCapability {
                    subscribe: Some(false),
                    list_changed: Some(false),
                }),
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
            },
            server_info: ServerInfo {
                name: "prompt-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        Ok(JsonRpcResponse::success(id, serde_json::to_value(result)?))
    }

    fn handle_prompts_list(&self, id: Option<Value>) -> Result<JsonRpcResponse> {
        match list_prompts(&self.store, &self.registry) {
            Ok(prompts) => Ok(JsonRpcResponse::success(
                id,
                json!({ "prompts": prompts }),
            )),
            Err(e) => Ok(self.error_response(id, e)),
        }
    }

    async fn handle_prompts_get(
        &self,
        id: Option<Value>,
        params: Value,
    ) -> Result<JsonRpcResponse> {
        let params: GetPromptParams = serde_json::from_value(params)?;

        match get_prompt(
            &self.store,
            &self.registry,
            self.branches.as_ref(),
            &params.name,
            &params.arguments,
        )
        .await
        {
            Ok(result) => Ok(JsonRpcResponse::success(id, serde_json::to_value(result)?)),
            Err(e) => Ok(self.error_response(id, e)),
        }
    }

    fn handle_resources_list(&self, id: Option<Value>) -> Result<JsonRpcResponse> {
        match list_resources(&self.store) {
            Ok(resources) => {
                let resources_value: Vec<Value> = resources
                    .iter()
                    .map(|r| {
                        json!({
                            "uri": r.uri,
                            "name": r.name,
                            "description": r.description,
                            "mimeType": r.mime_type
                        })
                    })
                    .collect();
                Ok(JsonRpcResponse::success(
                    id,
                    json!({ "resources": resources_value }),
                ))
            }
            Err(e) => Ok(self.error_response(id, e)),
        }
    }

    fn handle_resources_read(&self, id: Option<Value>, params: Value) -> Result<JsonRpcResponse> {
        let params: ReadResourceParams = serde_json::from_value(params)?;

        match read_resource(&self.store, &params.uri) {
            Ok(content) => Ok(JsonRpcResponse::success(
                id,
                json!({
                    "contents": [{
                        "uri": content.uri,
                        "mimeType": content.mime_type,
                        "text": content.text
                    }]
                }),
            )),
            Err(e) => Ok(self.error_response(id, e)),
        }
    }

    fn handle_tools_list(&self, id: Option<Value>) -> Result<JsonRpcResponse> {
        let tools: Vec<Value> = get_tool_definitions()
            .iter()
            .map(|t| {
                json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect();

        Ok(JsonRpcResponse::success(id, json!({ "tools": tools })))
    }

    async fn handle_tools_call(&self, id: Option<Value>, params: Value) -> Result<JsonRpcResponse> {
        let params: ToolCallParams = serde_json::from_value(params)?;
        let plans_root = self.config.plans_root(&self.root);
        let cx = ToolContext {
            plans_root: &plans_root,
            registry: &self.registry,
            branches: self.branches.as_ref(),
            git: &self.git,
            gh: &self.gh,
        };

        // Tool failures are in-band results, not protocol errors.
        let tool_result = match handle_tool_call(&cx, &params.name, params.arguments).await {
            Ok(value) => ToolResult::text(serde_json::to_string_pretty(&value)?),
            Err(e) => ToolResult::error(e.to_string()),
        };

        Ok(JsonRpcResponse::success(
            id,
            serde_json::to_value(tool_result)?,
        ))
    }

    /// Map a handler error to the right JSON-RPC error code.
    fn error_response(&self, id: Option<Value>, error: Error) -> JsonRpcResponse {
        let code = if error.is_invalid_params() { -32602 } else { -32603 };
        tracing::warn!(code, error = %error, "request failed");
        JsonRpcResponse::error(id, code, error.to_string())
    }
}
