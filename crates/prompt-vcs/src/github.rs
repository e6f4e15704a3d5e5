//! Pull-request introspection via the `gh` CLI.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::subprocess::run_gh;

/// Fields requested from `gh pr view --json`.
const PR_FIELDS: &str = "number,title,state,url,body";

/// A pull request as reported by `gh pr view --json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub state: String,
    pub url: String,
    #[serde(default)]
    pub body: String,
}

/// GitHub CLI wrapper bound to a working directory.
#[derive(Debug, Clone)]
pub struct GhCli {
    working_dir: PathBuf,
}

impl GhCli {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Look up the pull request for `branch`.
    ///
    /// A branch with no PR is `Ok(None)`, not an error; `gh` signals that
    /// case with a non-zero exit and a recognizable stderr message.
    pub async fn pr_for_branch(&self, branch: &str) -> Result<Option<PullRequest>> {
        let result = run_gh(
            &self.working_dir,
            &["pr", "view", branch, "--json", PR_FIELDS],
        )
        .await;

        match result {
            Ok(out) => Ok(Some(serde_json::from_str(&out)?)),
            Err(Error::CommandFailed { stderr, .. })
                if stderr.contains("no pull requests found") =>
            {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
