//! Resource URI extraction from rendered prompt text.
//!
//! Operates on fully-rendered text only; raw templates still contain
//! placeholders and are never scanned for URIs.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

/// `scheme://rest`, where rest is a maximal run of non-whitespace.
/// A leading `@` sigil is not part of the scheme class and so never lands
/// in the match.
static URI_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z][A-Za-z0-9+.-]*)://\S+").expect("invalid URI regex"));

/// Extract the deduplicated set of resource URIs embedded in rendered text.
///
/// Web URLs (`http`/`https`) are excluded; a single trailing `.`, `!`, or
/// `?` is stripped from each match (sentence-ending punctuation accidentally
/// captured by the maximal-run rule).
pub fn extract_resource_uris(rendered: &str) -> BTreeSet<String> {
    let mut uris = BTreeSet::new();

    for caps in URI_REGEX.captures_iter(rendered) {
        let scheme = &caps[1];
        if matches!(scheme, "http" | "https") {
            continue;
        }

        let mut uri = caps.get(0).expect("regex match has group 0").as_str();
        if uri.ends_with(['.', '!', '?']) {
            uri = &uri[..uri.len() - 1];
        }
        uris.insert(uri.to_string());
    }

    uris
}
