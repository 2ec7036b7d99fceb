//! Read-only checks that tell a user whether the quickstart can run.

use regex::Regex;
use std::process::Command;

use super::config::{Paths, DAKORA_API_KEY, OPENAI_API_KEY};
use super::env::{check_env_vars, env_hint, DiagnosticResult, EnvState};
use super::process::which;
use crate::ui::status;

/// Oldest toolchain the examples are tested with.
pub const MIN_RUST: (u32, u32) = (1, 75);

/// Values shipped in `.env.example`.
pub const ENV_PLACEHOLDERS: &[(&str, &str)] = &[
    (DAKORA_API_KEY, "dk_proj_your_project_key"),
    (OPENAI_API_KEY, "sk-your-openai-key"),
];

pub const COMMANDS: &[&str] = &["cargo", "rustc"];

/// Optional pieces compiled into the binary, with a hint for when one is absent.
pub const COMPONENTS: &[(&str, &str)] = &[
    ("dakora", "Dakora client; always built in."),
    ("openai", "Needed for the tracing example; provided by the llm crate."),
    (
        "opentelemetry",
        "Needed for trace export; rebuild with `--features otel`.",
    ),
];

/// Facts about the machine the doctor inspects.
pub trait Host {
    /// Output of `rustc --version`, if rustc can be run.
    fn rustc_version(&self) -> Option<String>;
    fn has_command(&self, name: &str) -> bool;
    fn has_component(&self, name: &str) -> bool;
}

/// The real machine, with commands resolved through the given environment.
pub struct SystemHost<'a> {
    env: &'a EnvState,
}

impl<'a> SystemHost<'a> {
    pub fn new(env: &'a EnvState) -> Self {
        Self { env }
    }
}

impl Host for SystemHost<'_> {
    fn rustc_version(&self) -> Option<String> {
        let rustc = which(self.env, "rustc")?;
        let output = Command::new(rustc).arg("--version").output().ok()?;
        if !output.status.success() {
            return None;
        }
        Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn has_command(&self, name: &str) -> bool {
        which(self.env, name).is_some()
    }

    fn has_component(&self, name: &str) -> bool {
        match name {
            "opentelemetry" => cfg!(feature = "otel"),
            "dakora" | "openai" => true,
            _ => false,
        }
    }
}

/// Parse `rustc 1.82.0 (f6e511eec 2024-10-15)` into `(major, minor, patch)`.
pub fn parse_rustc_version(raw: &str) -> Option<(u32, u32, u32)> {
    let re = Regex::new(r"rustc (\d+)\.(\d+)\.(\d+)").ok()?;
    let caps = re.captures(raw)?;
    Some((
        caps[1].parse().ok()?,
        caps[2].parse().ok()?,
        caps[3].parse().ok()?,
    ))
}

/// Everything the doctor found.
#[derive(Debug, Clone)]
pub struct DoctorReport {
    pub results: Vec<DiagnosticResult>,
    pub toolchain_ok: bool,
    pub env_ok: bool,
}

impl DoctorReport {
    /// Only the toolchain and environment checks decide the exit code.
    pub fn exit_code(&self) -> i32 {
        if self.toolchain_ok && self.env_ok {
            0
        } else {
            1
        }
    }
}

pub struct Doctor<'a, H> {
    env: &'a EnvState,
    paths: &'a Paths,
    host: H,
}

impl<'a, H: Host> Doctor<'a, H> {
    pub fn new(env: &'a EnvState, paths: &'a Paths, host: H) -> Self {
        Self { env, paths, host }
    }

    /// Run every check; none of them stops the others.
    pub fn run(&self) -> DoctorReport {
        let mut results = Vec::new();
        let toolchain_ok = self.check_toolchain(&mut results);
        self.check_commands(&mut results);
        let env_ok = self.check_env(&mut results);
        self.check_components(&mut results);
        DoctorReport {
            results,
            toolchain_ok,
            env_ok,
        }
    }

    fn check_toolchain(&self, out: &mut Vec<DiagnosticResult>) -> bool {
        let (min_major, min_minor) = MIN_RUST;
        let raw = self.host.rustc_version();
        let parsed = raw.as_deref().and_then(parse_rustc_version);
        let ok = parsed.is_some_and(|(major, minor, _)| (major, minor) >= MIN_RUST);
        let shown = match parsed {
            Some((major, minor, patch)) => format!("{major}.{minor}.{patch}"),
            None => "not found".to_string(),
        };
        let mut result = DiagnosticResult::new(
            "Rust toolchain",
            ok,
            format!("{shown} [{}]", status(ok)),
        );
        if !ok {
            result = result.with_hint(format!(
                "Install or upgrade to Rust {min_major}.{min_minor}+ (rustup update stable)."
            ));
        }
        out.push(result);
        ok
    }

    fn check_commands(&self, out: &mut Vec<DiagnosticResult>) {
        for cmd in COMMANDS {
            let found = self.host.has_command(cmd);
            out.push(DiagnosticResult::new(
                format!("Command {cmd}"),
                found,
                status(found),
            ));
        }
    }

    fn check_env(&self, out: &mut Vec<DiagnosticResult>) -> bool {
        let exists = self.paths.env_file.exists();
        let mut file = DiagnosticResult::new(".env file", exists, status(exists));
        if !exists {
            file = file.with_hint("Copy .env.example to .env and fill in your keys.");
        }
        out.push(file);

        let hint = env_hint(&self.paths.env_file);
        check_env_vars(self.env, ENV_PLACEHOLDERS, &hint, out)
    }

    fn check_components(&self, out: &mut Vec<DiagnosticResult>) {
        for (name, hint) in COMPONENTS {
            if self.host.has_component(name) {
                out.push(DiagnosticResult::new(format!("Component {name}"), true, "OK"));
            } else {
                out.push(DiagnosticResult::new(
                    format!("Component {name}"),
                    false,
                    format!("MISSING -> {hint}"),
                ));
            }
        }
    }
}
