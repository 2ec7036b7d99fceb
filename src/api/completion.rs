//! Bridge to the `llm` crate for chat completions.

use async_trait::async_trait;
use llm::builder::{LLMBackend, LLMBuilder};
use llm::chat::ChatMessage;
use llm::LLMProvider;

use super::error::QuickstartError;
use crate::core::config::OpenAiSettings;

/// Sends a single user message and returns the reply text.
#[async_trait(?Send)]
pub trait Completion {
    fn model(&self) -> &str;

    async fn complete(&self, prompt: &str) -> Result<String, QuickstartError>;
}

/// OpenAI through the `llm` crate.
pub struct LlmCompletion {
    provider: Box<dyn LLMProvider>,
    model: String,
}

impl LlmCompletion {
    pub fn openai(settings: &OpenAiSettings) -> Result<Self, QuickstartError> {
        let provider = LLMBuilder::new()
            .backend(LLMBackend::OpenAI)
            .api_key(&settings.api_key)
            .model(&settings.model)
            .build()?;
        Ok(Self {
            provider,
            model: settings.model.clone(),
        })
    }
}

#[async_trait(?Send)]
impl Completion for LlmCompletion {
    fn model(&self) -> &str {
        &self.model
    }

    #[tracing::instrument(name = "openai.chat", skip(self, prompt), fields(model = %self.model))]
    async fn complete(&self, prompt: &str) -> Result<String, QuickstartError> {
        let messages = vec![ChatMessage::user().content(prompt).build()];
        let response = self.provider.chat(&messages).await?;
        Ok(response.text().unwrap_or_default())
    }
}
