//! Template resources.
//!
//! Every template in the store (partials included) is readable as a
//! `template://<name>` resource, so an assistant can inspect the raw
//! guidance documents the prompts are built from.

use prompt_store::TemplateStore;
use serde::Serialize;

use crate::{Error, Result};

/// URI scheme for template resources.
pub const TEMPLATE_SCHEME: &str = "template://";

const MARKDOWN_MIME: &str = "text/markdown";

/// Resource definition for `resources/list`.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceDefinition {
    pub uri: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub mime_type: String,
}

/// Resource payload for `resources/read`.
#[derive(Debug, Clone)]
pub struct ResourceContent {
    pub uri: String,
    pub mime_type: String,
    pub text: String,
}

/// List every template as a resource.
pub fn list_resources(store: &TemplateStore) -> Result<Vec<ResourceDefinition>> {
    let mut resources = Vec::new();

    for name in store.list_all()? {
        let document = store.read(&name)?;
        resources.push(ResourceDefinition {
            uri: format!("{TEMPLATE_SCHEME}{name}"),
            name: document.frontmatter.title.unwrap_or_else(|| name.clone()),
            description: document.frontmatter.description,
            mime_type: MARKDOWN_MIME.to_string(),
        });
    }

    Ok(resources)
}

/// Read a template resource by URI.
pub fn read_resource(store: &TemplateStore, uri: &str) -> Result<ResourceContent> {
    let name = uri
        .strip_prefix(TEMPLATE_SCHEME)
        .ok_or_else(|| Error::UnknownResource(uri.to_string()))?;

    match store.read_raw(name) {
        Ok(text) => Ok(ResourceContent {
            uri: uri.to_string(),
            mime_type: MARKDOWN_MIME.to_string(),
            text,
        }),
        Err(prompt_store::Error::TemplateNotFound { .. })
        | Err(prompt_store::Error::InvalidName { .. }) => {
            Err(Error::UnknownResource(uri.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}
