//! Sample inputs for Dakora's built-in templates.

use serde::Serialize;
use std::collections::BTreeMap;

use super::env::EnvState;
use crate::api::ConfigError;

/// Template rendered when `DAKORA_TEMPLATE_ID` is not set.
pub const FAQ_TEMPLATE_ID: &str = "faq_responder";

/// Variable that overrides the default template.
pub const TEMPLATE_ID_VAR: &str = "DAKORA_TEMPLATE_ID";

/// Starter templates every Dakora project ships with.
pub const BUILT_IN_TEMPLATES: &[(&str, &str)] = &[
    ("faq_responder", "Answer FAQ questions with optional sources."),
    ("research_synthesizer", "Summarize multiple sources into one cohesive output."),
    ("technical_documentation", "Generate technical docs with code examples."),
    ("social_media_campaign", "Create multi-platform social posts from a brief."),
];

/// A single template input value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum InputValue {
    Text(String),
    Flag(bool),
}

impl From<&str> for InputValue {
    fn from(s: &str) -> Self {
        InputValue::Text(s.to_string())
    }
}

impl From<bool> for InputValue {
    fn from(b: bool) -> Self {
        InputValue::Flag(b)
    }
}

/// Input field name to value, sent as-is to the renderer.
pub type TemplateInputs = BTreeMap<String, InputValue>;

const FAQ_KNOWLEDGE_BASE: &str = "Password resets are available in Settings > Security.\n\
Users receive a confirmation email and must complete the flow within 15 minutes.";

fn faq_inputs() -> TemplateInputs {
    [
        ("question", InputValue::from("How do I reset my password?")),
        ("knowledge_base", InputValue::from(FAQ_KNOWLEDGE_BASE)),
        ("tone", InputValue::from("helpful and concise")),
        ("include_sources", InputValue::from(true)),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

/// Ids that [`inputs_for`] has a payload for.
pub fn sample_template_ids() -> &'static [&'static str] {
    &[FAQ_TEMPLATE_ID]
}

/// The override from the environment, or the FAQ template.
pub fn resolve_default_template_id(env: &EnvState) -> String {
    env.get(TEMPLATE_ID_VAR)
        .unwrap_or(FAQ_TEMPLATE_ID)
        .to_string()
}

/// Example inputs for a known template.
pub fn inputs_for(template_id: &str) -> Result<TemplateInputs, ConfigError> {
    match template_id {
        FAQ_TEMPLATE_ID => Ok(faq_inputs()),
        other => Err(ConfigError::UnknownTemplate(other.to_string())),
    }
}
