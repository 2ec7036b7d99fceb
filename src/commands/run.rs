use crate::core::process::SystemSpawner;
use crate::core::runner::{Dispatcher, RunnerChoice};

use super::AppCtx;

/// Validate the example's environment and launch it.
pub fn run(ctx: &AppCtx, example: &str, runner: RunnerChoice) -> Result<i32, String> {
    let binary = std::env::current_exe()
        .map_err(|e| format!("Unable to locate the running binary: {}", e))?;
    let mut dispatcher = Dispatcher::new(ctx.env.clone(), ctx.paths.clone(), binary, SystemSpawner);
    Ok(dispatcher.run(example, runner))
}
