//! File-backed template store.
//!
//! Templates are `.md` files under a root directory. A template's name is
//! its path relative to the root with the extension stripped and `/` as the
//! separator on every platform, e.g. `plan/create` for
//! `<root>/plan/create.md`. Files whose basename starts with `_` are
//! partials: addressable by name, never listed as prompts.

use std::path::{Component, Path, PathBuf};

use prompt_template::PartialSource;

use crate::frontmatter::{Document, parse_document};
use crate::{Error, Result};

/// Extension every template file carries.
const TEMPLATE_EXTENSION: &str = "md";

/// Read-only view over a directory of template files.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    root: PathBuf,
}

impl TemplateStore {
    /// Create a store rooted at `root`. The directory is not required to
    /// exist yet; reads will fail with `TemplateNotFound` until it does.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List prompt templates (basename not starting with `_`), sorted by
    /// name.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut names = self.list_all()?;
        names.retain(|name| {
            name.rsplit('/')
                .next()
                .is_some_and(|basename| !basename.starts_with('_'))
        });
        Ok(names)
    }

    /// List every template, partials included, sorted by name.
    pub fn list_all(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        if self.root.is_dir() {
            scan_dir(&self.root, &self.root, &mut names)?;
        }
        names.sort();
        Ok(names)
    }

    /// Read and parse the named template.
    pub fn read(&self, name: &str) -> Result<Document> {
        let raw = self.read_raw(name)?;
        parse_document(name, &raw)
    }

    /// Read the named template's raw content, frontmatter included.
    pub fn read_raw(&self, name: &str) -> Result<String> {
        let path = self.path_for(name)?;
        if !path.is_file() {
            return Err(Error::TemplateNotFound {
                name: name.to_string(),
            });
        }
        std::fs::read_to_string(&path).map_err(|e| Error::io(&path, e))
    }

    /// Whether the named template exists.
    pub fn contains(&self, name: &str) -> bool {
        self.path_for(name).map(|p| p.is_file()).unwrap_or(false)
    }

    fn path_for(&self, name: &str) -> Result<PathBuf> {
        let relative = Path::new(name);
        // Template names are always relative and never climb out of the
        // root.
        let escapes = relative.components().any(|c| {
            !matches!(c, Component::Normal(_))
        });
        if name.is_empty() || escapes {
            return Err(Error::InvalidName {
                name: name.to_string(),
            });
        }
        // Append the extension rather than `with_extension`, which would
        // truncate a dotted name like `release.v2` to `release.md`.
        Ok(self.root.join(format!("{name}.{TEMPLATE_EXTENSION}")))
    }
}

fn scan_dir(root: &Path, dir: &Path, names: &mut Vec<String>) -> Result<()> {
    let entries = std::fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let path = entry.path();

        if path.is_dir() {
            scan_dir(root, &path, names)?;
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some(TEMPLATE_EXTENSION) {
            continue;
        }

        let relative = path
            .strip_prefix(root)
            .expect("scanned path is under the root")
            .with_extension("");
        let name = relative
            .components()
            .filter_map(|c| c.as_os_str().to_str())
            .collect::<Vec<_>>()
            .join("/");
        names.push(name);
    }

    Ok(())
}

impl PartialSource for TemplateStore {
    /// Partials resolve through the same addressing scheme as templates;
    /// their bodies are served with frontmatter stripped.
    fn read_partial(&self, name: &str) -> prompt_template::Result<String> {
        match self.read(name) {
            Ok(document) => Ok(document.body),
            Err(Error::TemplateNotFound { name } | Error::InvalidName { name }) => {
                Err(prompt_template::Error::PartialNotFound { name })
            }
            Err(e) => Err(prompt_template::Error::PartialRead {
                name: name.to_string(),
                message: e.to_string(),
            }),
        }
    }
}
