//! Branch lookups and branch introspection via the `git` CLI.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::subprocess::run_git;

/// A changed file reported by `git diff --name-status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileChange {
    /// One-letter status (`A`, `M`, `D`, ...).
    pub status: String,
    pub path: String,
}

/// Git CLI wrapper bound to a working directory.
#[derive(Debug, Clone)]
pub struct GitCli {
    working_dir: PathBuf,
}

impl GitCli {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Name of the branch currently checked out.
    pub async fn current_branch_name(&self) -> Result<String> {
        let out = run_git(&self.working_dir, &["rev-parse", "--abbrev-ref", "HEAD"]).await?;
        let name = out.trim();
        if name == "HEAD" {
            return Err(Error::DetachedHead);
        }
        Ok(name.to_string())
    }

    /// Name of the repository's default branch.
    ///
    /// Prefers `origin/HEAD`; without a remote, probes the conventional
    /// `main`/`master` names.
    pub async fn default_branch_name(&self) -> Result<String> {
        if let Ok(out) = run_git(
            &self.working_dir,
            &["symbolic-ref", "refs/remotes/origin/HEAD"],
        )
        .await
        {
            let trimmed = out.trim();
            if let Some(name) = trimmed.rsplit('/').next()
                && !name.is_empty()
            {
                return Ok(name.to_string());
            }
        }

        for candidate in ["main", "master"] {
            let reference = format!("refs/heads/{candidate}");
            if run_git(
                &self.working_dir,
                &["show-ref", "--verify", "--quiet", &reference],
            )
            .await
            .is_ok()
            {
                return Ok(candidate.to_string());
            }
        }

        Err(Error::NoDefaultBranch)
    }

    /// One-line summaries of commits on HEAD but not on `base`.
    pub async fn commits_ahead(&self, base: &str) -> Result<Vec<String>> {
        let range = format!("{base}..HEAD");
        let out = run_git(&self.working_dir, &["log", "--oneline", &range]).await?;
        Ok(out.lines().map(str::to_string).collect())
    }

    /// Files changed between the merge base with `base` and HEAD.
    pub async fn changed_files(&self, base: &str) -> Result<Vec<FileChange>> {
        let range = format!("{base}...HEAD");
        let out = run_git(&self.working_dir, &["diff", "--name-status", &range]).await?;
        Ok(out
            .lines()
            .filter_map(|line| {
                let mut parts = line.split_whitespace();
                let status = parts.next()?;
                let path = parts.next()?;
                Some(FileChange {
                    status: status.to_string(),
                    path: path.to_string(),
                })
            })
            .collect())
    }
}

#[async_trait]
impl prompt_template::BranchInfo for GitCli {
    async fn current_branch(&self) -> prompt_template::Result<String> {
        self.current_branch_name()
            .await
            .map_err(|e| prompt_template::Error::BranchLookup {
                message: e.to_string(),
            })
    }

    async fn default_branch(&self) -> prompt_template::Result<String> {
        self.default_branch_name()
            .await
            .map_err(|e| prompt_template::Error::BranchLookup {
                message: e.to_string(),
            })
    }
}
