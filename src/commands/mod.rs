use crate::cli::Cmd;
use crate::core::config::Paths;
use crate::core::env::EnvState;
use crate::core::telemetry::TraceFlusher;

pub mod doctor;
pub mod render;
pub mod run;
pub mod templates;
pub mod trace;

/// Everything a command needs from startup.
pub struct AppCtx {
    pub env: EnvState,
    pub paths: Paths,
    pub flusher: Box<dyn TraceFlusher>,
}

/// Dispatches the parsed command to the appropriate handler.
///
/// Returns the process exit code.
pub async fn dispatch(command: Cmd, ctx: &AppCtx) -> Result<i32, String> {
    match command {
        Cmd::Run { example, runner } => run::run(ctx, example.as_str(), runner),
        Cmd::Doctor => Ok(doctor::run(ctx)),
        Cmd::Render { template } => render::run(ctx, template.as_deref()).await.map(|_| 0),
        Cmd::Trace { template } => trace::run(ctx, template.as_deref()).await.map(|_| 0),
        Cmd::Templates => templates::run().map(|_| 0),
    }
}
