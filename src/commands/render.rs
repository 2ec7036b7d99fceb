use crate::api::quickstart::{render_example, RenderSummary};
use crate::api::DakoraClient;
use crate::core::config::DakoraSettings;
use crate::core::templates::{inputs_for, resolve_default_template_id};

use super::AppCtx;

/// Render a template through Dakora and print a preview.
pub async fn run(ctx: &AppCtx, template: Option<&str>) -> Result<RenderSummary, String> {
    let settings = DakoraSettings::from_env(&ctx.env, &ctx.paths).map_err(|e| e.to_string())?;
    let template_id = template
        .map(str::to_string)
        .unwrap_or_else(|| resolve_default_template_id(&ctx.env));
    let inputs = inputs_for(&template_id).map_err(|e| e.to_string())?;

    let client = DakoraClient::new(settings).map_err(|e| e.to_string())?;
    render_example(&client, &template_id, &inputs)
        .await
        .map_err(|e| e.to_string())
}
