//! Per-invocation parameter resolution.
//!
//! Resolution is a strict three-way dispatch on the parameter's kind:
//! required values are validated, optional values fall back, auto values
//! are always computed. Every failure is typed and fails the whole render;
//! nothing here retries or substitutes defaults beyond what the kind
//! specifies.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::registry::{ParameterDefinition, ParameterKind, ParameterRegistry, ResolveContext};
use crate::{Error, Result};

/// Injected VCS capability used by the built-in auto parameters.
///
/// Implementations live outside this crate (a `git` CLI wrapper in
/// production, a fixed fake in tests).
#[async_trait]
pub trait BranchInfo: Send + Sync {
    /// Name of the branch currently checked out, trimmed.
    async fn current_branch(&self) -> Result<String>;

    /// Name of the repository's default branch.
    async fn default_branch(&self) -> Result<String>;
}

/// Resolve a single parameter to its final string value.
///
/// Strategy, in strict order:
///
/// 1. trim the supplied value, treating an empty result as absent;
/// 2. look the name up in the registry ([`Error::UnknownParameter`]);
/// 3. `Required`: absent value is [`Error::MissingRequiredParameter`],
///    otherwise the definition's transform (if any) validates it;
/// 4. `Auto`: the supplied value is ignored entirely, the computation runs;
/// 5. `Optional`: a non-empty supplied value wins as-is, otherwise the
///    fallback runs.
///
/// `resolved` holds parameters already resolved in this invocation so one
/// parameter's computation can depend on another's value.
pub async fn resolve_parameter(
    registry: &ParameterRegistry,
    branches: &dyn BranchInfo,
    template_name: &str,
    parameter_name: &str,
    resolved: &HashMap<String, String>,
    supplied: Option<&str>,
) -> Result<String> {
    let trimmed = supplied.map(str::trim).filter(|v| !v.is_empty());

    let definition = registry
        .get(parameter_name)
        .ok_or_else(|| Error::UnknownParameter {
            name: parameter_name.to_string(),
        })?;

    let cx = ResolveContext {
        branches,
        template_name,
        parameter_name,
        resolved,
    };

    match definition.kind() {
        ParameterKind::Required { transform } => {
            let value = trimmed.ok_or_else(|| Error::MissingRequiredParameter {
                name: parameter_name.to_string(),
            })?;
            match transform {
                Some(transform) => transform(value),
                None => Ok(value.to_string()),
            }
        }
        ParameterKind::Auto { compute } => compute.resolve(&cx).await,
        ParameterKind::Optional { fallback } => match trimmed {
            Some(value) => Ok(value.to_string()),
            None => fallback.resolve(&cx).await,
        },
    }
}

/// Resolve a template's parameters in registry order, threading earlier
/// values into later resolutions.
///
/// `definitions` is the ordered slice produced by
/// [`crate::registry::parameters_used_in_template`]; `supplied` is the raw
/// caller-provided argument map.
pub async fn resolve_parameters(
    registry: &ParameterRegistry,
    branches: &dyn BranchInfo,
    template_name: &str,
    definitions: &[&ParameterDefinition],
    supplied: &HashMap<String, String>,
) -> Result<HashMap<String, String>> {
    let mut resolved = HashMap::with_capacity(definitions.len());

    for definition in definitions {
        let value = resolve_parameter(
            registry,
            branches,
            template_name,
            definition.name(),
            &resolved,
            supplied.get(definition.name()).map(String::as_str),
        )
        .await?;

        tracing::debug!(
            template = %template_name,
            parameter = %definition.name(),
            "resolved parameter"
        );
        resolved.insert(definition.name().to_string(), value);
    }

    Ok(resolved)
}
