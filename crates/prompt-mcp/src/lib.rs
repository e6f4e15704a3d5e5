//! Prompt MCP server library.
//!
//! Exposes prompt templates, template resources, and Git/GitHub workflow
//! tools over the Model Context Protocol (JSON-RPC 2.0 on stdio). Prompt
//! rendering is delegated to the `prompt-template` engine; templates live
//! on disk behind `prompt-store`; branch and pull-request lookups shell out
//! through `prompt-vcs`.

pub mod config;
pub mod error;
pub mod prompts;
pub mod protocol;
pub mod resources;
pub mod server;
pub mod tools;

pub use config::ServerConfig;
pub use error::{Error, Result};
pub use server::PromptMcpServer;
