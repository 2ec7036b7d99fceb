//! Launching an example through cargo, or through the already-built binary.

use std::io;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use tracing::{debug, info, warn};

use super::config::Paths;
use super::env::EnvState;
use super::examples::{compiled_features, find_example, ExampleDescriptor};
use super::process::{which, Invocation, Spawner};

/// Runner requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RunnerChoice {
    /// Use cargo when it is on PATH, otherwise the built binary.
    #[default]
    Auto,
    /// Build and run through `cargo run`.
    Cargo,
    /// Run the binary that is executing right now.
    Binary,
}

/// The runner actually used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Runner {
    Cargo,
    Binary,
}

/// Decide which runner to use before anything is spawned.
pub fn resolve_runner(preferred: RunnerChoice, cargo_available: bool) -> Runner {
    match preferred {
        RunnerChoice::Auto if cargo_available => Runner::Cargo,
        RunnerChoice::Auto => Runner::Binary,
        RunnerChoice::Cargo => Runner::Cargo,
        RunnerChoice::Binary => Runner::Binary,
    }
}

/// `cargo run` for the example's subcommand, with its features enabled.
pub fn cargo_invocation(cargo: &Path, paths: &Paths, example: &ExampleDescriptor) -> Invocation {
    let mut inv = Invocation::new(cargo)
        .arg("run")
        .arg("--quiet")
        .arg("--manifest-path")
        .arg(paths.manifest().display().to_string());
    if !example.features.is_empty() {
        inv = inv.arg("--features").arg(example.features);
    }
    inv.arg("--").arg(example.subcommand).current_dir(&paths.root)
}

/// The example's subcommand on `binary`.
pub fn binary_invocation(binary: &Path, example: &ExampleDescriptor) -> Invocation {
    Invocation::new(binary).arg(example.subcommand)
}

/// Warning for running `example` on a binary that lacks some of its features.
pub fn feature_notice(example: &ExampleDescriptor, compiled: &[&str]) -> Option<String> {
    let missing = example.missing_features(compiled);
    if missing.is_empty() {
        return None;
    }
    let list = missing.join(",");
    Some(format!(
        "This binary was built without `{list}`, so {} runs without it. \
         Use `--runner cargo` or rebuild with `--features {list}`.",
        example.name
    ))
}

/// Validates an example's environment and runs it in a child process.
pub struct Dispatcher<S> {
    env: EnvState,
    paths: Paths,
    binary: PathBuf,
    spawner: S,
    compiled: Vec<&'static str>,
}

impl<S: Spawner> Dispatcher<S> {
    pub fn new(env: EnvState, paths: Paths, binary: PathBuf, spawner: S) -> Self {
        Self {
            env,
            paths,
            binary,
            spawner,
            compiled: compiled_features(),
        }
    }

    /// Override the features the binary is assumed to carry.
    pub fn with_compiled_features(mut self, compiled: Vec<&'static str>) -> Self {
        self.compiled = compiled;
        self
    }

    pub fn spawner(&self) -> &S {
        &self.spawner
    }

    /// Run `example` and return the exit code to report.
    ///
    /// Nothing is spawned when a required variable is missing. The child's
    /// exit code is returned unchanged.
    pub fn run(&mut self, example: &str, preferred: RunnerChoice) -> i32 {
        let descriptor = match find_example(example) {
            Ok(d) => d,
            Err(e) => {
                println!("{e}");
                return 1;
            }
        };

        if let Err(e) = self
            .env
            .require_env(descriptor.required_env.iter().copied(), &self.paths.env_file)
        {
            println!("Environment check failed: {e}");
            return 1;
        }

        let probed = match preferred {
            RunnerChoice::Auto => which(&self.env, "cargo").is_some(),
            _ => false,
        };
        let runner = resolve_runner(preferred, probed);
        info!(example = descriptor.name, ?runner, "dispatching example");
        println!(
            "Selected example: {} - {}",
            descriptor.name, descriptor.description
        );

        if runner == Runner::Cargo {
            if let Some(code) = self.run_cargo(descriptor) {
                return code;
            }
        }

        if let Some(notice) = feature_notice(descriptor, &self.compiled) {
            warn!(example = descriptor.name, features = descriptor.features, "binary lacks example features");
            println!("{notice}");
        }
        let inv = binary_invocation(&self.binary, descriptor);
        match self.spawn(&inv) {
            Ok(code) => code,
            Err(e) => {
                println!("Failed to run `{inv}`: {e}");
                1
            }
        }
    }

    /// Try the cargo runner. `None` means fall back to the binary.
    fn run_cargo(&mut self, descriptor: &ExampleDescriptor) -> Option<i32> {
        let manifest = self.paths.manifest();
        if !manifest.is_file() {
            println!(
                "Project manifest {} not found. Falling back to the built binary.",
                manifest.display()
            );
            return None;
        }
        let Some(cargo) = which(&self.env, "cargo") else {
            println!("cargo not found. Falling back to the built binary.");
            return None;
        };

        let inv = cargo_invocation(&cargo, &self.paths, descriptor);
        match self.spawn(&inv) {
            Ok(code) => Some(code),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(program = %inv.program.display(), "cargo vanished before spawn");
                println!("cargo could not be started. Falling back to the built binary.");
                None
            }
            Err(e) => {
                println!("Failed to run `{inv}`: {e}");
                Some(1)
            }
        }
    }

    fn spawn(&mut self, inv: &Invocation) -> io::Result<i32> {
        crate::ui::print_command(&inv.to_string());
        let code = self.spawner.spawn(inv, &self.env)?;
        debug!(%inv, code, "child exited");
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Records invocations and replays canned results.
    #[derive(Default)]
    struct StubSpawner {
        calls: Vec<Invocation>,
        results: VecDeque<io::Result<i32>>,
    }

    impl StubSpawner {
        fn returning(results: impl IntoIterator<Item = io::Result<i32>>) -> Self {
            Self {
                calls: Vec::new(),
                results: results.into_iter().collect(),
            }
        }
    }

    impl Spawner for StubSpawner {
        fn spawn(&mut self, invocation: &Invocation, _env: &EnvState) -> io::Result<i32> {
            self.calls.push(invocation.clone());
            self.results.pop_front().unwrap_or(Ok(0))
        }
    }

    #[cfg(unix)]
    fn path_with_cargo() -> (tempfile::TempDir, String) {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let cargo = dir.path().join("cargo");
        std::fs::write(&cargo, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&cargo, std::fs::Permissions::from_mode(0o755)).unwrap();
        let path = dir.path().display().to_string();
        (dir, path)
    }

    fn dispatcher(env: EnvState, spawner: StubSpawner) -> Dispatcher<StubSpawner> {
        Dispatcher::new(
            env,
            Paths::at("/nonexistent/quickstart"),
            PathBuf::from("/opt/bin/dakora-quickstart"),
            spawner,
        )
    }

    /// A checkout with a manifest, so the cargo runner is usable.
    fn project() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Cargo.toml"), "[package]\n").unwrap();
        dir
    }

    fn dispatcher_in(
        root: &Path,
        env: EnvState,
        spawner: StubSpawner,
    ) -> Dispatcher<StubSpawner> {
        Dispatcher::new(
            env,
            Paths::at(root),
            PathBuf::from("/opt/bin/dakora-quickstart"),
            spawner,
        )
    }

    #[test]
    fn resolve_runner_is_pure() {
        assert_eq!(resolve_runner(RunnerChoice::Auto, true), Runner::Cargo);
        assert_eq!(resolve_runner(RunnerChoice::Auto, false), Runner::Binary);
        assert_eq!(resolve_runner(RunnerChoice::Cargo, false), Runner::Cargo);
        assert_eq!(resolve_runner(RunnerChoice::Binary, true), Runner::Binary);
    }

    #[test]
    fn auto_without_cargo_uses_binary_and_relays_code() {
        let empty = tempfile::tempdir().unwrap();
        let env = EnvState::from_pairs([
            ("PATH".to_string(), empty.path().display().to_string()),
            ("DAKORA_API_KEY".to_string(), "dk".to_string()),
        ]);
        let mut d = dispatcher(env, StubSpawner::returning([Ok(7)]));

        assert_eq!(d.run("template-render", RunnerChoice::Auto), 7);

        let calls = &d.spawner().calls;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, PathBuf::from("/opt/bin/dakora-quickstart"));
        assert_eq!(calls[0].args, vec!["render".to_string()]);
    }

    #[test]
    fn missing_key_spawns_nothing() {
        let env = EnvState::from_pairs([("OPENAI_API_KEY", "sk")]);
        let mut d = dispatcher(env, StubSpawner::default());

        assert_eq!(d.run("template-tracing", RunnerChoice::Binary), 1);
        assert!(d.spawner().calls.is_empty());
    }

    #[test]
    fn unknown_example_spawns_nothing() {
        let env = EnvState::from_pairs([("DAKORA_API_KEY", "dk")]);
        let mut d = dispatcher(env, StubSpawner::default());
        assert_eq!(d.run("nope", RunnerChoice::Auto), 1);
        assert!(d.spawner().calls.is_empty());
    }

    #[test]
    fn explicit_cargo_without_cargo_falls_back_once() {
        let root = project();
        let env = EnvState::from_pairs([("DAKORA_API_KEY", "dk")]);
        let mut d = dispatcher_in(root.path(), env, StubSpawner::returning([Ok(0)]));

        assert_eq!(d.run("template-render", RunnerChoice::Cargo), 0);
        assert_eq!(d.spawner().calls.len(), 1);
        assert_eq!(d.spawner().calls[0].args, vec!["render".to_string()]);
    }

    #[test]
    #[cfg(unix)]
    fn auto_with_cargo_runs_cargo_with_features() {
        let (_dir, path) = path_with_cargo();
        let root = project();
        let env = EnvState::from_pairs([
            ("PATH", path.as_str()),
            ("DAKORA_API_KEY", "dk"),
            ("OPENAI_API_KEY", "sk"),
        ]);
        let mut d = dispatcher_in(root.path(), env, StubSpawner::returning([Ok(3)]));

        assert_eq!(d.run("template-tracing", RunnerChoice::Auto), 3);

        let manifest = root.path().join("Cargo.toml").display().to_string();
        let calls = &d.spawner().calls;
        assert_eq!(calls.len(), 1);
        assert!(calls[0].program.ends_with("cargo"));
        assert_eq!(
            calls[0].args,
            [
                "run",
                "--quiet",
                "--manifest-path",
                manifest.as_str(),
                "--features",
                "otel",
                "--",
                "trace",
            ]
        );
        assert_eq!(calls[0].current_dir.as_deref(), Some(root.path()));
    }

    #[test]
    #[cfg(unix)]
    fn cargo_not_found_at_spawn_falls_back_to_binary() {
        let (_dir, path) = path_with_cargo();
        let root = project();
        let env = EnvState::from_pairs([("PATH", path.as_str()), ("DAKORA_API_KEY", "dk")]);
        let spawner = StubSpawner::returning([
            Err(io::Error::from(io::ErrorKind::NotFound)),
            Ok(5),
        ]);
        let mut d = dispatcher_in(root.path(), env, spawner);

        assert_eq!(d.run("template-render", RunnerChoice::Auto), 5);
        let calls = &d.spawner().calls;
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].program, PathBuf::from("/opt/bin/dakora-quickstart"));
    }

    #[test]
    #[cfg(unix)]
    fn failing_child_is_not_retried() {
        let (_dir, path) = path_with_cargo();
        let root = project();
        let env = EnvState::from_pairs([("PATH", path.as_str()), ("DAKORA_API_KEY", "dk")]);
        let mut d = dispatcher_in(root.path(), env, StubSpawner::returning([Ok(101), Ok(0)]));

        assert_eq!(d.run("template-render", RunnerChoice::Cargo), 101);
        assert_eq!(d.spawner().calls.len(), 1);
    }

    #[test]
    fn other_spawn_errors_exit_one() {
        let env = EnvState::from_pairs([("DAKORA_API_KEY", "dk")]);
        let spawner =
            StubSpawner::returning([Err(io::Error::from(io::ErrorKind::PermissionDenied))]);
        let mut d = dispatcher(env, spawner);
        assert_eq!(d.run("template-render", RunnerChoice::Binary), 1);
    }

    #[test]
    #[cfg(unix)]
    fn missing_manifest_skips_cargo() {
        let (_dir, path) = path_with_cargo();
        let env = EnvState::from_pairs([("PATH", path.as_str()), ("DAKORA_API_KEY", "dk")]);
        let mut d = dispatcher(env, StubSpawner::returning([Ok(0)]));

        assert_eq!(d.run("template-render", RunnerChoice::Cargo), 0);
        let calls = &d.spawner().calls;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, PathBuf::from("/opt/bin/dakora-quickstart"));
    }

    #[test]
    fn binary_without_example_features_warns_and_still_runs() {
        let tracing = find_example("template-tracing").unwrap();
        let notice = feature_notice(tracing, &[]).unwrap();
        assert!(notice.contains("`otel`"));
        assert!(notice.contains("--features otel"));

        let env = EnvState::from_pairs([("DAKORA_API_KEY", "dk"), ("OPENAI_API_KEY", "sk")]);
        let mut d = dispatcher(env, StubSpawner::returning([Ok(0)])).with_compiled_features(vec![]);
        assert_eq!(d.run("template-tracing", RunnerChoice::Binary), 0);
        assert_eq!(d.spawner().calls[0].args, vec!["trace".to_string()]);
    }

    #[test]
    fn binary_with_example_features_has_no_notice() {
        let tracing = find_example("template-tracing").unwrap();
        assert!(feature_notice(tracing, &["otel"]).is_none());
        let render = find_example("template-render").unwrap();
        assert!(feature_notice(render, &[]).is_none());
    }
}
