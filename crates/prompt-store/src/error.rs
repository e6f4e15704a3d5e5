//! Error types for the template store

use std::path::PathBuf;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while scanning or reading templates
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("template not found: {name}")]
    TemplateNotFound { name: String },

    #[error("invalid frontmatter in {name}: {message}")]
    Frontmatter { name: String, message: String },

    #[error("template name escapes the store root: {name}")]
    InvalidName { name: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
