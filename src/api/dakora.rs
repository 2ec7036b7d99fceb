//! Access to the Dakora template service.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::QuickstartError;
use crate::core::config::DakoraSettings;
use crate::core::templates::TemplateInputs;

/// A template rendered by the service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RenderedTemplate {
    #[serde(alias = "rendered")]
    pub text: String,
    pub version: i64,
}

/// Renders a stored template with the given inputs.
#[async_trait]
pub trait TemplateRenderer {
    async fn render(
        &self,
        template_id: &str,
        inputs: &TemplateInputs,
    ) -> Result<RenderedTemplate, QuickstartError>;
}

#[derive(Serialize)]
struct RenderRequest<'a> {
    inputs: &'a TemplateInputs,
}

/// Thin HTTP adapter over the Dakora render endpoint.
pub struct DakoraClient {
    http: reqwest::Client,
    settings: DakoraSettings,
}

impl DakoraClient {
    pub fn new(settings: DakoraSettings) -> Result<Self, QuickstartError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("dakora-quickstart/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, settings })
    }

    fn render_url(&self, template_id: &str) -> String {
        format!(
            "{}/api/prompts/{}/render",
            self.settings.base_url, template_id
        )
    }
}

#[async_trait]
impl TemplateRenderer for DakoraClient {
    #[tracing::instrument(name = "dakora.render", skip(self, inputs))]
    async fn render(
        &self,
        template_id: &str,
        inputs: &TemplateInputs,
    ) -> Result<RenderedTemplate, QuickstartError> {
        let resp = self
            .http
            .post(self.render_url(template_id))
            .header("X-API-Key", &self.settings.api_key)
            .json(&RenderRequest { inputs })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(QuickstartError::RenderStatus {
                template_id: template_id.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let rendered: RenderedTemplate = resp.json().await?;
        tracing::info!(version = rendered.version, "template rendered");
        Ok(rendered)
    }
}
