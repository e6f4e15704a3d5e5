//! Template file store for the prompt MCP server.
//!
//! Scans a directory tree of Markdown templates, parses optional YAML
//! frontmatter, serves partial bodies to the template engine, and writes
//! generated documents atomically.

pub mod error;
pub mod frontmatter;
pub mod io;
pub mod store;

pub use error::{Error, Result};
pub use frontmatter::{Document, Frontmatter, parse_document, split_frontmatter};
pub use io::write_atomic;
pub use store::TemplateStore;
