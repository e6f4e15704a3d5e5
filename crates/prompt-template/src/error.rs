//! Error types for the template engine

use thiserror::Error;

/// Result type for template engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during extraction, resolution, or rendering.
///
/// Every failure is fatal to the render that raised it; nothing in this
/// crate downgrades an error into a default value.
#[derive(Debug, Error)]
pub enum Error {
    /// A parameter name with no entry in the registry
    #[error("unknown parameter: {name}")]
    UnknownParameter { name: String },

    /// A required parameter left empty or absent by the caller
    #[error("missing required parameter: {name}")]
    MissingRequiredParameter { name: String },

    /// A supplied value rejected by a parameter's transform
    #[error("invalid value for parameter {name}: {message}")]
    InvalidParameterValue { name: String, message: String },

    /// A `{{> name}}` reference to a partial that does not exist
    #[error("Partial {name} was not found.")]
    PartialNotFound { name: String },

    /// A partial exists but could not be read
    #[error("failed to read partial {name}: {message}")]
    PartialRead { name: String, message: String },

    /// A placeholder with no corresponding context entry
    #[error("no value provided for placeholder: {name}")]
    MissingContextValue { name: String },

    /// A context key that matches no placeholder in the expanded template
    #[error("replacement key {name} does not match any placeholder in the template")]
    UnusedReplacementKey { name: String },

    /// A partial that includes itself, directly or transitively
    #[error("cyclic partial reference: {name}")]
    CyclicPartial { name: String },

    /// Partial nesting deeper than the engine allows
    #[error("partial nesting exceeds {limit} levels")]
    RecursionLimit { limit: usize },

    /// A parameter definition registered under an already-taken name
    #[error("duplicate parameter definition: {name}")]
    DuplicateParameter { name: String },

    /// A branch lookup collaborator failed
    #[error("branch lookup failed: {message}")]
    BranchLookup { message: String },
}
