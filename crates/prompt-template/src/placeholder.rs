//! Placeholder and partial-reference extraction.
//!
//! Templates use a Handlebars-like syntax with two constructs the engine
//! cares about:
//!
//! - plain placeholders: `{{ name }}`
//! - partial references: `{{> partial/name key=value key2="two words"}}`
//!
//! Block helpers (`{{#if}}`, `{{/if}}`) are not placeholders and are never
//! surfaced by extraction.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::partials::PartialSource;
use crate::{Error, Result};

/// Maximum partial nesting depth before a render is rejected.
///
/// Cycles are caught by the visited set; the depth cap backstops
/// pathological non-cyclic nesting.
pub const MAX_PARTIAL_DEPTH: usize = 16;

/// Plain placeholder: `{{ name }}`. The name is a run of non-whitespace,
/// non-brace characters and must not begin with `#`, `/`, or `>` (block
/// helpers and partials are handled elsewhere).
static PLACEHOLDER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([^\s{}#/>][^\s{}]*)\s*\}\}").expect("invalid placeholder regex")
});

/// Partial reference: `{{> name key=value ...}}`. The argument tail is
/// captured raw and split by [`PARTIAL_ARG_REGEX`].
static PARTIAL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\{\{>\s*([^\s{}]+)((?:\s+[^\s={}]+=(?:"[^"]*"|[^\s{}]+))*)\s*\}\}"#)
        .expect("invalid partial regex")
});

/// A single `key=value` argument. Quoted values may contain whitespace.
static PARTIAL_ARG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([^\s={}]+)=("[^"]*"|[^\s{}]+)"#).expect("invalid partial argument regex")
});

/// A parsed `{{> ...}}` token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialRef {
    /// The partial's template name (e.g. `plan/_instructions`).
    pub name: String,
    /// Explicit `key=value` bindings from the call site, in source order.
    /// Values are unquoted.
    pub args: Vec<(String, String)>,
    /// Byte offset of the token's opening `{{` in the scanned text.
    pub start: usize,
    /// Byte offset just past the token's closing `}}`.
    pub end: usize,
}

impl PartialRef {
    /// The set of argument keys bound at the call site.
    pub fn bound_keys(&self) -> BTreeSet<&str> {
        self.args.iter().map(|(k, _)| k.as_str()).collect()
    }
}

/// Find every partial reference in `template`, in source order.
pub fn find_partial_refs(template: &str) -> Vec<PartialRef> {
    PARTIAL_REGEX
        .captures_iter(template)
        .map(|caps| {
            let token = caps.get(0).expect("regex match has group 0");
            PartialRef {
                name: caps[1].to_string(),
                args: parse_args(caps.get(2).map_or("", |m| m.as_str())),
                start: token.start(),
                end: token.end(),
            }
        })
        .collect()
}

fn parse_args(raw: &str) -> Vec<(String, String)> {
    PARTIAL_ARG_REGEX
        .captures_iter(raw)
        .map(|caps| {
            let value = &caps[2];
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value);
            (caps[1].to_string(), value.to_string())
        })
        .collect()
}

/// Extract the deduplicated set of placeholder names `template` requires
/// from its caller.
///
/// Recurses into referenced partials; a partial contributes its own
/// placeholders minus the keys explicitly bound at the call site. Repeated
/// occurrences of a name count once.
///
/// Fails with [`Error::PartialNotFound`] for a reference to a nonexistent
/// partial and [`Error::CyclicPartial`] if a partial includes itself,
/// directly or transitively.
pub fn extract_placeholders(
    template: &str,
    partials: &dyn PartialSource,
) -> Result<BTreeSet<String>> {
    let mut visited = BTreeSet::new();
    extract_inner(template, partials, &mut visited, 0)
}

fn extract_inner(
    template: &str,
    partials: &dyn PartialSource,
    visited: &mut BTreeSet<String>,
    depth: usize,
) -> Result<BTreeSet<String>> {
    if depth > MAX_PARTIAL_DEPTH {
        return Err(Error::RecursionLimit {
            limit: MAX_PARTIAL_DEPTH,
        });
    }

    let mut names: BTreeSet<String> = PLACEHOLDER_REGEX
        .captures_iter(template)
        .map(|caps| caps[1].to_string())
        .collect();

    for partial in find_partial_refs(template) {
        // The visited set tracks the current inclusion path, not every
        // partial ever seen; a diamond (two siblings including the same
        // partial) is legal, a cycle is not.
        if !visited.insert(partial.name.clone()) {
            return Err(Error::CyclicPartial { name: partial.name });
        }
        let body = partials.read_partial(&partial.name)?;
        let inner = extract_inner(&body, partials, visited, depth + 1)?;
        visited.remove(&partial.name);

        let bound = partial.bound_keys();
        names.extend(inner.into_iter().filter(|n| !bound.contains(n.as_str())));
    }

    Ok(names)
}
