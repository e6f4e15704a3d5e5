//! Server configuration.
//!
//! An optional `prompts.toml` at the server root overrides where templates
//! live and where plan files are written:
//!
//! ```toml
//! templates_dir = "templates"
//! plans_dir = "plans"
//! ```
//!
//! A missing file means defaults; a present-but-invalid file is an error
//! (silently ignoring a broken config hides authoring mistakes).

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{Error, Result};

/// Name of the optional config file at the server root.
pub const CONFIG_FILE: &str = "prompts.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Directory of template files, relative to the root.
    pub templates_dir: PathBuf,

    /// Directory plan files are written to, relative to the root.
    pub plans_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            templates_dir: PathBuf::from("templates"),
            plans_dir: PathBuf::from("plans"),
        }
    }
}

impl ServerConfig {
    /// Load the config from `root`, falling back to defaults when the file
    /// does not exist.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.is_file() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(&path)?;
        toml::from_str(&raw).map_err(|e| Error::Config {
            path,
            message: e.to_string(),
        })
    }

    /// Absolute template directory for a given root.
    pub fn templates_root(&self, root: &Path) -> PathBuf {
        root.join(&self.templates_dir)
    }

    /// Absolute plans directory for a given root.
    pub fn plans_root(&self, root: &Path) -> PathBuf {
        root.join(&self.plans_dir)
    }
}
