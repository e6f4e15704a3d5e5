//! VCS collaborators for the prompt MCP server.
//!
//! Spawns the `git` and `gh` CLIs and parses their text output. `GitCli`
//! implements the engine's `BranchInfo` capability; `GhCli` provides
//! pull-request introspection for the server's tools.

pub mod error;
pub mod git;
pub mod github;
pub mod subprocess;

pub use error::{Error, Result};
pub use git::{FileChange, GitCli};
pub use github::{GhCli, PullRequest};
pub use subprocess::{run_gh, run_git};
