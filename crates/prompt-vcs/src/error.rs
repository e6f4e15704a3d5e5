//! Error types for VCS command wrappers

use thiserror::Error;

/// Result type for VCS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while running `git`/`gh` commands
#[derive(Debug, Error)]
pub enum Error {
    /// The binary could not be spawned at all (missing from PATH, etc.)
    #[error("failed to spawn {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The command ran but exited non-zero
    #[error("{command} exited with status {code}: {stderr}")]
    CommandFailed {
        command: String,
        code: i32,
        stderr: String,
    },

    /// HEAD does not point at a branch
    #[error("not on a branch (detached HEAD)")]
    DetachedHead,

    /// Neither origin/HEAD nor a conventional branch name exists
    #[error("could not determine the default branch")]
    NoDefaultBranch,

    /// JSON from `gh --json` did not parse
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
