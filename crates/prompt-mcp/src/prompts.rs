//! Prompt registration and rendering.
//!
//! Each non-partial template in the store becomes an MCP prompt. Its
//! advertised arguments come from the parameters the template actually
//! references; `prompts/get` resolves those parameters in registry order,
//! renders the template, and extracts resource URIs from the rendered text
//! as resource links.

use std::collections::HashMap;

use prompt_template::{
    BranchInfo, ParameterRegistry, extract_resource_uris, parameters_used_in_template,
    render_template, resolve_parameters,
};
use prompt_store::TemplateStore;
use serde::Serialize;

use crate::{Error, Result};

/// Prompt definition for `prompts/list`.
#[derive(Debug, Clone, Serialize)]
pub struct PromptDefinition {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub arguments: Vec<PromptArgument>,
}

/// Advertised prompt argument.
#[derive(Debug, Clone, Serialize)]
pub struct PromptArgument {
    pub name: String,
    pub description: String,
    pub required: bool,
}

/// Result payload for `prompts/get`.
#[derive(Debug, Clone, Serialize)]
pub struct GetPromptResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub messages: Vec<PromptMessage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PromptMessage {
    pub role: String,
    pub content: MessageContent,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum MessageContent {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "resource_link")]
    ResourceLink { uri: String, name: String },
}

impl PromptMessage {
    fn user_text(text: String) -> Self {
        Self {
            role: "user".to_string(),
            content: MessageContent::Text { text },
        }
    }

    fn resource_link(uri: String) -> Self {
        let name = uri
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or(uri.as_str())
            .to_string();
        Self {
            role: "user".to_string(),
            content: MessageContent::ResourceLink { uri, name },
        }
    }
}

/// Build prompt definitions for every listable template in the store.
///
/// Auto parameters are not advertised: their values are always computed
/// and caller input is ignored.
pub fn list_prompts(
    store: &TemplateStore,
    registry: &ParameterRegistry,
) -> Result<Vec<PromptDefinition>> {
    let mut prompts = Vec::new();

    for name in store.list()? {
        let document = store.read(&name)?;
        let parameters = parameters_used_in_template(registry, &document.body, store)?;

        let arguments = parameters
            .iter()
            .filter(|p| !p.is_auto())
            .map(|p| PromptArgument {
                name: p.name().to_string(),
                description: p.description().to_string(),
                required: p.is_required(),
            })
            .collect();

        prompts.push(PromptDefinition {
            name,
            description: document.frontmatter.description,
            arguments,
        });
    }

    Ok(prompts)
}

/// Resolve, render, and link a single prompt.
pub async fn get_prompt(
    store: &TemplateStore,
    registry: &ParameterRegistry,
    branches: &dyn BranchInfo,
    name: &str,
    arguments: &HashMap<String, String>,
) -> Result<GetPromptResult> {
    if !store.contains(name) {
        return Err(Error::UnknownPrompt(name.to_string()));
    }
    let document = store.read(name)?;

    let parameters = parameters_used_in_template(registry, &document.body, store)?;
    let resolved =
        resolve_parameters(registry, branches, name, &parameters, arguments).await?;
    let rendered = render_template(&document.body, &resolved, store)?;

    let mut messages = vec![PromptMessage::user_text(rendered.clone())];
    for uri in extract_resource_uris(&rendered) {
        messages.push(PromptMessage::resource_link(uri));
    }

    tracing::debug!(prompt = %name, messages = messages.len(), "rendered prompt");
    Ok(GetPromptResult {
        description: document.frontmatter.description,
        messages,
    })
}
