//! Subprocess execution for `git` and `gh`.
//!
//! Wraps CLI invocations, capturing stdout as a string and translating a
//! non-zero exit into a typed error carrying the exit code and stderr.

use std::path::Path;

use tokio::process::Command;

use crate::error::{Error, Result};

/// Run a program in `working_dir` and return its raw stdout.
pub async fn run(program: &str, working_dir: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new(program)
        .current_dir(working_dir)
        .args(args)
        .output()
        .await
        .map_err(|e| Error::Spawn {
            command: program.to_string(),
            source: e,
        })?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let code = output.status.code().unwrap_or(-1);
        tracing::debug!(command = %program, args = ?args, code, "command failed");
        Err(Error::CommandFailed {
            command: format!("{} {}", program, args.join(" ")),
            code,
            stderr,
        })
    }
}

/// Run `git` with the given arguments.
pub async fn run_git(working_dir: &Path, args: &[&str]) -> Result<String> {
    run("git", working_dir, args).await
}

/// Run `gh` with the given arguments.
pub async fn run_gh(working_dir: &Path, args: &[&str]) -> Result<String> {
    run("gh", working_dir, args).await
}
