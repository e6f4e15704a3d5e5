//! Template placeholder and partial resolution engine.
//!
//! Powers prompt rendering for the MCP server: a Handlebars-like template
//! is scanned for `{{ name }}` placeholders and `{{> name key=value}}`
//! partial references, each placeholder is resolved through the parameter
//! registry (required / optional / auto strategies), the template is
//! rendered strictly (no missing values, no unused values), and resource
//! URIs are extracted from the rendered text for linking.
//!
//! Each render is an independent pure computation over its own inputs plus
//! read-only collaborators; the registry is built once at startup and
//! injected wherever resolution happens.

pub mod error;
pub mod partials;
pub mod placeholder;
pub mod registry;
pub mod render;
pub mod resolver;
pub mod uri;

pub use error::{Error, Result};
pub use partials::{InMemoryPartials, PartialSource};
pub use placeholder::{MAX_PARTIAL_DEPTH, PartialRef, extract_placeholders, find_partial_refs};
pub use registry::{
    ParameterDefinition, ParameterKind, ParameterRegistry, ResolveContext, ResolveFn,
    TARGET_FALLBACK, Transform, parameters_used_in_template,
};
pub use render::render_template;
pub use resolver::{BranchInfo, resolve_parameter, resolve_parameters};
pub use uri::extract_resource_uris;
