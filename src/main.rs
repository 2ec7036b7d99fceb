use clap::Parser;
use dakora_quickstart::cli::Cli;
use dakora_quickstart::commands::{self, AppCtx};
use dakora_quickstart::core::config::Paths;
use dakora_quickstart::core::env::EnvState;
use dakora_quickstart::core::telemetry;

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("• {}", e);
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32, String> {
    let cli = Cli::parse();
    let paths = Paths::project();

    let mut env = EnvState::from_process();
    let loaded = env.load_environment(&paths.env_file);

    let flusher = telemetry::init(&env, cli.command.trace_service());
    tracing::debug!(?loaded, "environment loaded");

    let ctx = AppCtx {
        env,
        paths,
        flusher,
    };
    let rt = tokio::runtime::Runtime::new().map_err(|e| e.to_string())?;
    rt.block_on(commands::dispatch(cli.command, &ctx))
}
