//! Template rendering: placeholder substitution and partial expansion.

use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use regex::Regex;

use crate::partials::PartialSource;
use crate::placeholder::{MAX_PARTIAL_DEPTH, extract_placeholders, find_partial_refs};
use crate::{Error, Result};

/// Same pattern as extraction; kept separate so rendering can walk matches
/// with byte offsets.
static PLACEHOLDER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([^\s{}#/>][^\s{}]*)\s*\}\}").expect("invalid placeholder regex")
});

/// Render `template` by substituting every placeholder from `context` and
/// recursively expanding partial references.
///
/// Strict on both sides of the contract:
///
/// - a placeholder with no context entry is [`Error::MissingContextValue`];
/// - a context key matching no placeholder anywhere in the expanded
///   template is [`Error::UnusedReplacementKey`].
///
/// Each partial renders against its own context: the enclosing context's
/// values for the names the partial needs, overlaid with the explicit
/// `key=value` arguments from the call site (which are substituted as
/// literal strings, never looked up in `context`).
pub fn render_template(
    template: &str,
    context: &HashMap<String, String>,
    partials: &dyn PartialSource,
) -> Result<String> {
    // extract_placeholders already excludes keys bound at partial call
    // sites, so the unused-key check sees exactly what the caller owes.
    let placeholders = extract_placeholders(template, partials)?;
    if let Some(unused) = context.keys().find(|key| !placeholders.contains(*key)) {
        return Err(Error::UnusedReplacementKey {
            name: unused.clone(),
        });
    }

    let mut visited = BTreeSet::new();
    render_inner(template, context, partials, &mut visited, 0)
}

fn render_inner(
    template: &str,
    context: &HashMap<String, String>,
    partials: &dyn PartialSource,
    visited: &mut BTreeSet<String>,
    depth: usize,
) -> Result<String> {
    if depth > MAX_PARTIAL_DEPTH {
        return Err(Error::RecursionLimit {
            limit: MAX_PARTIAL_DEPTH,
        });
    }

    let mut out = String::with_capacity(template.len());
    let mut cursor = 0;

    // Partial tokens split the template into plain segments; substituted
    // values are never re-scanned for syntax.
    for partial in find_partial_refs(template) {
        substitute_plain(&template[cursor..partial.start], context, &mut out)?;

        if !visited.insert(partial.name.clone()) {
            return Err(Error::CyclicPartial { name: partial.name });
        }
        let body = partials.read_partial(&partial.name)?;

        // The partial's context: outer values for the names it needs,
        // call-site arguments taking precedence.
        let needed = extract_placeholders(&body, partials)?;
        let bound = partial.bound_keys();
        let mut partial_context: HashMap<String, String> = HashMap::new();
        for name in needed {
            if bound.contains(name.as_str()) {
                continue;
            }
            if let Some(value) = context.get(&name) {
                partial_context.insert(name, value.clone());
            }
        }
        for (key, value) in &partial.args {
            partial_context.insert(key.clone(), value.clone());
        }

        let rendered = render_inner(&body, &partial_context, partials, visited, depth + 1)?;
        visited.remove(&partial.name);

        out.push_str(&rendered);
        cursor = partial.end;
    }

    substitute_plain(&template[cursor..], context, &mut out)?;
    Ok(out)
}

/// Replace every plain placeholder in `text`, appending to `out`.
fn substitute_plain(
    text: &str,
    context: &HashMap<String, String>,
    out: &mut String,
) -> Result<()> {
    let mut cursor = 0;

    for caps in PLACEHOLDER_REGEX.captures_iter(text) {
        let token = caps.get(0).expect("regex match has group 0");
        let name = &caps[1];
        let value = context.get(name).ok_or_else(|| Error::MissingContextValue {
            name: name.to_string(),
        })?;

        out.push_str(&text[cursor..token.start()]);
        out.push_str(value);
        cursor = token.end();
    }

    out.push_str(&text[cursor..]);
    Ok(())
}
