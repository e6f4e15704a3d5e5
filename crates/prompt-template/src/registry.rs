//! Parameter registry: how each named placeholder gets its value.
//!
//! The registry is constructed once at startup and injected wherever
//! resolution happens; it is never mutated afterwards and never global.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;

use crate::partials::PartialSource;
use crate::placeholder::extract_placeholders;
use crate::resolver::BranchInfo;
use crate::{Error, Result};

/// Fallback value for the `target` parameter when the caller supplies
/// nothing.
pub const TARGET_FALLBACK: &str = "the current context";

/// Linear issue IDs: two-or-more uppercase letters, a hyphen, digits.
static LINEAR_ISSUE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z]{2,}-[0-9]+").expect("invalid Linear issue regex"));

/// Validation/normalization applied to a required parameter's value.
pub type Transform = fn(&str) -> Result<String>;

/// Everything an [`ResolveFn`] may draw on while computing a value.
pub struct ResolveContext<'a> {
    /// Injected VCS collaborator (current/default branch lookups).
    pub branches: &'a dyn BranchInfo,
    /// Name of the template being rendered.
    pub template_name: &'a str,
    /// Name of the parameter being resolved.
    pub parameter_name: &'a str,
    /// Parameters resolved earlier in this invocation, in registry order.
    /// Lets one parameter's resolution depend on another's.
    pub resolved: &'a HashMap<String, String>,
}

/// Computation producing a value for an `Optional` fallback or an `Auto`
/// parameter. May perform I/O through the context's collaborators.
#[async_trait]
pub trait ResolveFn: Send + Sync {
    async fn resolve(&self, cx: &ResolveContext<'_>) -> Result<String>;
}

/// Resolution strategy for a parameter.
pub enum ParameterKind {
    /// Must be supplied by the caller; optionally validated/transformed.
    Required { transform: Option<Transform> },
    /// Caller value used if non-empty, otherwise the fallback computes one.
    Optional { fallback: Arc<dyn ResolveFn> },
    /// Always computed; any caller-supplied value is ignored.
    Auto { compute: Arc<dyn ResolveFn> },
}

impl fmt::Debug for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required { .. } => f.write_str("Required"),
            Self::Optional { .. } => f.write_str("Optional"),
            Self::Auto { .. } => f.write_str("Auto"),
        }
    }
}

/// A registry entry describing how a named placeholder's value is validated
/// or computed.
#[derive(Debug)]
pub struct ParameterDefinition {
    name: String,
    description: String,
    kind: ParameterKind,
}

impl ParameterDefinition {
    pub fn required(
        name: impl Into<String>,
        description: impl Into<String>,
        transform: Option<Transform>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind: ParameterKind::Required { transform },
        }
    }

    pub fn optional(
        name: impl Into<String>,
        description: impl Into<String>,
        fallback: Arc<dyn ResolveFn>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind: ParameterKind::Optional { fallback },
        }
    }

    pub fn auto(
        name: impl Into<String>,
        description: impl Into<String>,
        compute: Arc<dyn ResolveFn>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind: ParameterKind::Auto { compute },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> &ParameterKind {
        &self.kind
    }

    /// Whether the caller must supply a value.
    pub fn is_required(&self) -> bool {
        matches!(self.kind, ParameterKind::Required { .. })
    }

    /// Whether the caller's value is ignored entirely.
    pub fn is_auto(&self) -> bool {
        matches!(self.kind, ParameterKind::Auto { .. })
    }
}

/// Ordered, read-only collection of parameter definitions.
///
/// Names are unique and lookups are case-sensitive exact matches. Order is
/// preserved: it drives both resolution order (so a later parameter can use
/// an earlier one's value) and the order of advertised prompt arguments.
#[derive(Debug, Default)]
pub struct ParameterRegistry {
    entries: Vec<ParameterDefinition>,
}

impl ParameterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in definitions registered:
    ///
    /// - `target` (optional, falls back to [`TARGET_FALLBACK`])
    /// - `currentBranch` (auto, from the VCS collaborator)
    /// - `defaultBranch` (auto, from the VCS collaborator)
    /// - `linearIssueId` (required, validated against the issue-ID pattern)
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry
            .register(ParameterDefinition::optional(
                "target",
                "What to operate on (a file, module, or feature); defaults to the current context",
                Arc::new(TargetFallback),
            ))
            .expect("builtin registry has unique names");
        registry
            .register(ParameterDefinition::auto(
                "currentBranch",
                "The branch currently checked out",
                Arc::new(CurrentBranch),
            ))
            .expect("builtin registry has unique names");
        registry
            .register(ParameterDefinition::auto(
                "defaultBranch",
                "The repository's default branch",
                Arc::new(DefaultBranch),
            ))
            .expect("builtin registry has unique names");
        registry
            .register(ParameterDefinition::required(
                "linearIssueId",
                "A Linear issue ID such as AB-123; may be embedded in surrounding text",
                Some(linear_issue_id),
            ))
            .expect("builtin registry has unique names");
        registry
    }

    /// Register a definition.
    ///
    /// Fails with [`Error::DuplicateParameter`] if the name is taken.
    pub fn register(&mut self, definition: ParameterDefinition) -> Result<()> {
        if self.get(definition.name()).is_some() {
            return Err(Error::DuplicateParameter {
                name: definition.name().to_string(),
            });
        }
        self.entries.push(definition);
        Ok(())
    }

    /// Look up a definition by exact name.
    pub fn get(&self, name: &str) -> Option<&ParameterDefinition> {
        self.entries.iter().find(|d| d.name() == name)
    }

    /// Iterate over definitions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ParameterDefinition> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Filter the registry down to the definitions a template actually
/// references, preserving registry order.
///
/// Placeholders (including those contributed by partials) with no registry
/// entry fail with [`Error::UnknownParameter`]: a template referencing an
/// undefined parameter is an authoring bug, not something to ignore.
pub fn parameters_used_in_template<'r>(
    registry: &'r ParameterRegistry,
    template: &str,
    partials: &dyn PartialSource,
) -> Result<Vec<&'r ParameterDefinition>> {
    let names: BTreeSet<String> = extract_placeholders(template, partials)?;

    for name in &names {
        if registry.get(name).is_none() {
            return Err(Error::UnknownParameter { name: name.clone() });
        }
    }

    Ok(registry
        .iter()
        .filter(|d| names.contains(d.name()))
        .collect())
}

struct TargetFallback;

#[async_trait]
impl ResolveFn for TargetFallback {
    async fn resolve(&self, _cx: &ResolveContext<'_>) -> Result<String> {
        Ok(TARGET_FALLBACK.to_string())
    }
}

struct CurrentBranch;

#[async_trait]
impl ResolveFn for CurrentBranch {
    async fn resolve(&self, cx: &ResolveContext<'_>) -> Result<String> {
        cx.branches.current_branch().await
    }
}

struct DefaultBranch;

#[async_trait]
impl ResolveFn for DefaultBranch {
    async fn resolve(&self, cx: &ResolveContext<'_>) -> Result<String> {
        cx.branches.default_branch().await
    }
}

/// Transform for `linearIssueId`: the value must contain a substring
/// matching the issue-ID pattern; the matched substring (not the whole
/// input) is the resolved value.
fn linear_issue_id(value: &str) -> Result<String> {
    match LINEAR_ISSUE_REGEX.find(value.trim()) {
        Some(m) => Ok(m.as_str().to_string()),
        None => Err(Error::InvalidParameterValue {
            name: "linearIssueId".to_string(),
            message: format!("No valid Linear issue ID found in {value:?} (expected e.g. AB-123)"),
        }),
    }
}
