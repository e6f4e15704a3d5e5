//! YAML frontmatter parsing for template files.
//!
//! Templates may start with a fenced frontmatter block:
//!
//! ```text
//! ---
//! title: Write a plan
//! description: Scaffold an implementation plan
//! ---
//! template body...
//! ```
//!
//! The block is optional; a file without one is all body.

use serde::Deserialize;

use crate::{Error, Result};

/// Metadata parsed from a template's frontmatter block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Frontmatter {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
}

/// A template file split into metadata and renderable body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub frontmatter: Frontmatter,
    pub body: String,
}

/// Split raw file content into `(yaml, body)` if it opens with a
/// frontmatter fence. Returns `None` when there is no frontmatter.
pub fn split_frontmatter(raw: &str) -> Option<(&str, &str)> {
    let rest = raw
        .strip_prefix("---\n")
        .or_else(|| raw.strip_prefix("---\r\n"))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some((yaml, body));
        }
        offset += line.len();
    }

    // Opening fence with no closing fence: not frontmatter.
    None
}

/// Parse raw template content into a [`Document`].
///
/// `name` is only used for error reporting.
pub fn parse_document(name: &str, raw: &str) -> Result<Document> {
    match split_frontmatter(raw) {
        Some((yaml, body)) => {
            let frontmatter = if yaml.trim().is_empty() {
                Frontmatter::default()
            } else {
                serde_yaml::from_str(yaml).map_err(|e| Error::Frontmatter {
                    name: name.to_string(),
                    message: e.to_string(),
                })?
            };
            Ok(Document {
                frontmatter,
                body: body.to_string(),
            })
        }
        None => Ok(Document {
            frontmatter: Frontmatter::default(),
            body: raw.to_string(),
        }),
    }
}
