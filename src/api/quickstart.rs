//! The two quickstart walkthroughs, written against the collaborator traits.

use spinners::{Spinner, Spinners};
use std::time::Duration;

use super::completion::Completion;
use super::dakora::{RenderedTemplate, TemplateRenderer};
use super::error::QuickstartError;
use crate::core::telemetry::TraceFlusher;
use crate::core::templates::{TemplateInputs, TEMPLATE_ID_VAR};
use crate::ui::{preview, print_banner, print_step};

/// Characters of rendered text shown by the render example.
pub const PREVIEW_CHARS: usize = 800;

/// How long the tracing example waits for spans to drain.
pub const FLUSH_TIMEOUT: Duration = Duration::from_millis(5000);

/// What the render example printed.
#[derive(Debug, Clone)]
pub struct RenderSummary {
    pub preview: String,
    pub version: i64,
}

/// What the tracing example printed.
#[derive(Debug, Clone)]
pub struct TracingSummary {
    pub rendered: RenderedTemplate,
    pub reply: String,
}

/// Render a template and print a preview of the result.
pub async fn render_example<R>(
    renderer: &R,
    template_id: &str,
    inputs: &TemplateInputs,
) -> Result<RenderSummary, QuickstartError>
where
    R: TemplateRenderer + ?Sized,
{
    print_banner("Dakora Quickstart: Template Render (no OTLP)");
    print_step(&format!(
        "Using template `{template_id}` (override with {TEMPLATE_ID_VAR})"
    ));
    print_step(&format!("Rendering template `{template_id}` without tracing..."));

    let rendered = renderer.render(template_id, inputs).await?;

    print_step("Rendered content preview:");
    let shown = preview(&rendered.text, PREVIEW_CHARS);
    println!("{shown}");
    print_step(&format!("Template version: v{}", rendered.version));

    Ok(RenderSummary {
        preview: shown,
        version: rendered.version,
    })
}

/// Render a template, send it to the LLM and flush the resulting traces.
#[tracing::instrument(name = "quickstart.tracing", skip_all, fields(template_id = %template_id))]
pub async fn tracing_example<R, C>(
    renderer: &R,
    completion: &C,
    flusher: &dyn TraceFlusher,
    template_id: &str,
    inputs: &TemplateInputs,
) -> Result<TracingSummary, QuickstartError>
where
    R: TemplateRenderer + ?Sized,
    C: Completion + ?Sized,
{
    print_banner("Dakora Quickstart: Template Render + Tracing");
    print_step(&format!(
        "Using template `{template_id}` (override with {TEMPLATE_ID_VAR})"
    ));
    print_step(&format!("Rendering template `{template_id}`..."));

    let rendered = renderer.render(template_id, inputs).await?;
    print_step(&format!("Rendered template v{}", rendered.version));

    print_step(&format!(
        "Calling {} with rendered template (traced)...",
        completion.model()
    ));
    let mut sp = Spinner::new(Spinners::Dots9, "Waiting for LLM response...".into());
    let reply = match completion.complete(&rendered.text).await {
        Ok(reply) => {
            sp.stop_with_message("✔ Response received.".into());
            reply
        }
        Err(e) => {
            sp.stop_with_message("✘ LLM request failed.".into());
            return Err(e);
        }
    };
    println!("{reply}");

    print_step("Flushing traces to Dakora...");
    flusher.force_flush(FLUSH_TIMEOUT);
    print_step("Done. Check Dakora Studio > Executions to see this trace.");

    Ok(TracingSummary { rendered, reply })
}
