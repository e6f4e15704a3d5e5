//! Partial template lookup.
//!
//! Partials are named, separately-stored template fragments included from
//! another template via `{{> name key=value}}`. The engine only needs a way
//! to fetch a partial body by name; where those bodies live is up to the
//! implementor (files on disk, an in-memory map in tests).

use std::collections::HashMap;

use crate::{Error, Result};

/// Source of partial template bodies, addressed by name.
///
/// Names use the same addressing scheme as templates: a path relative to the
/// template root with the extension stripped (e.g. `plan/_instructions`).
pub trait PartialSource {
    /// Read the body of the named partial.
    ///
    /// Returns [`Error::PartialNotFound`] if no partial exists under `name`.
    fn read_partial(&self, name: &str) -> Result<String>;
}

/// Map-backed partial source.
///
/// Used by tests and by callers that assemble templates programmatically.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPartials {
    bodies: HashMap<String, String>,
}

impl InMemoryPartials {
    /// Create an empty source (every lookup fails).
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a partial body under `name`, replacing any previous body.
    pub fn insert(&mut self, name: impl Into<String>, body: impl Into<String>) {
        self.bodies.insert(name.into(), body.into());
    }
}

impl PartialSource for InMemoryPartials {
    fn read_partial(&self, name: &str) -> Result<String> {
        self.bodies
            .get(name)
            .cloned()
            .ok_or_else(|| Error::PartialNotFound {
                name: name.to_string(),
            })
    }
}
