use crate::api::quickstart::{tracing_example, TracingSummary};
use crate::api::{DakoraClient, LlmCompletion};
use crate::core::config::{DakoraSettings, OpenAiSettings, DAKORA_API_KEY, OPENAI_API_KEY};
use crate::core::templates::{inputs_for, resolve_default_template_id};

use super::AppCtx;

/// Render a template, send it to OpenAI and flush the traces.
pub async fn run(ctx: &AppCtx, template: Option<&str>) -> Result<TracingSummary, String> {
    ctx.env
        .require_env([DAKORA_API_KEY, OPENAI_API_KEY], &ctx.paths.env_file)
        .map_err(|e| e.to_string())?;
    let dakora = DakoraSettings::from_env(&ctx.env, &ctx.paths).map_err(|e| e.to_string())?;
    let openai = OpenAiSettings::from_env(&ctx.env, &ctx.paths).map_err(|e| e.to_string())?;

    let template_id = template
        .map(str::to_string)
        .unwrap_or_else(|| resolve_default_template_id(&ctx.env));
    let inputs = inputs_for(&template_id).map_err(|e| e.to_string())?;

    let renderer = DakoraClient::new(dakora).map_err(|e| e.to_string())?;
    let completion = LlmCompletion::openai(&openai).map_err(|e| e.to_string())?;

    tracing_example(
        &renderer,
        &completion,
        ctx.flusher.as_ref(),
        &template_id,
        &inputs,
    )
    .await
    .map_err(|e| e.to_string())
}
