//! Error types for the MCP server

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for MCP operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during MCP server operations
#[derive(Debug, Error)]
pub enum Error {
    /// Error from the template engine (extraction, resolution, rendering)
    #[error("template error: {0}")]
    Template(#[from] prompt_template::Error),

    /// Error from the template store
    #[error("store error: {0}")]
    Store(#[from] prompt_store::Error),

    /// Error from a git/gh command
    #[error("vcs error: {0}")]
    Vcs(#[from] prompt_vcs::Error),

    /// Error during JSON serialization/deserialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file present but invalid
    #[error("config error at {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// Unknown prompt requested
    #[error("unknown prompt: {0}")]
    UnknownPrompt(String),

    /// Unknown tool requested
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// Unknown resource requested
    #[error("unknown resource: {0}")]
    UnknownResource(String),

    /// Invalid tool arguments
    #[error("invalid arguments: {message}")]
    InvalidArguments { message: String },
}

impl Error {
    /// Whether this error should surface as a JSON-RPC invalid-params
    /// response rather than an internal error.
    pub fn is_invalid_params(&self) -> bool {
        matches!(
            self,
            Error::Template(
                prompt_template::Error::UnknownParameter { .. }
                    | prompt_template::Error::MissingRequiredParameter { .. }
                    | prompt_template::Error::InvalidParameterValue { .. }
                    | prompt_template::Error::MissingContextValue { .. }
                    | prompt_template::Error::UnusedReplacementKey { .. }
            ) | Error::UnknownPrompt(_)
                | Error::UnknownResource(_)
                | Error::InvalidArguments { .. }
        )
    }
}
