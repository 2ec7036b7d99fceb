//! Environment state: loading `.env` files and checking required variables.

use std::collections::HashMap;
use std::env as stdenv;
use std::path::{Path, PathBuf};

use crate::api::ConfigError;

/// Snapshot of the process environment, extended by `.env` loading.
///
/// Everything downstream (validation, config, child processes) reads from
/// this value rather than from `std::env`, so the state can be built by hand
/// in tests and handed to spawned examples verbatim.
#[derive(Debug, Clone, Default)]
pub struct EnvState {
    vars: HashMap<String, String>,
}

/// What [`EnvState::load_environment`] ended up reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The configured file existed; `applied` entries were new.
    File { path: PathBuf, applied: usize },
    /// No configured file, but `path` was discovered from the working directory.
    Discovered { path: PathBuf, applied: usize },
    /// Nothing was loaded.
    Nothing,
}

impl EnvState {
    /// Capture the current process environment.
    pub fn from_process() -> Self {
        Self {
            vars: stdenv::vars().collect(),
        }
    }

    /// Build a state from explicit pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Value of `key`, treating an empty value as unset.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Set or override a variable.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    /// Iterate over every variable, e.g. to hand them to a child process.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Load `KEY=VALUE` pairs from `env_file`, or from a `.env` discovered
    /// upwards from the working directory when `env_file` does not exist.
    ///
    /// Variables that are already present are never overwritten. A missing
    /// or unreadable file is not an error.
    pub fn load_environment(&mut self, env_file: &Path) -> LoadOutcome {
        let cwd = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        self.load_environment_from(env_file, &cwd)
    }

    /// [`load_environment`](Self::load_environment) with discovery starting at `search_from`.
    pub fn load_environment_from(&mut self, env_file: &Path, search_from: &Path) -> LoadOutcome {
        if env_file.exists() {
            return match self.read_file(env_file) {
                Some(applied) => LoadOutcome::File {
                    path: env_file.to_path_buf(),
                    applied,
                },
                None => LoadOutcome::Nothing,
            };
        }

        match discover_env_file(search_from) {
            Some(path) => match self.read_file(&path) {
                Some(applied) => LoadOutcome::Discovered { path, applied },
                None => LoadOutcome::Nothing,
            },
            None => LoadOutcome::Nothing,
        }
    }

    fn read_file(&mut self, path: &Path) -> Option<usize> {
        match dotenvy::from_path_iter(path) {
            Ok(iter) => Some(self.merge(iter)),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "unable to read env file");
                None
            }
        }
    }

    fn merge<R: std::io::Read>(&mut self, iter: dotenvy::Iter<R>) -> usize {
        let mut applied = 0;
        for item in iter {
            match item {
                Ok((key, value)) => {
                    if !self.vars.contains_key(&key) {
                        self.vars.insert(key, value);
                        applied += 1;
                    }
                }
                Err(e) => tracing::debug!(error = %e, "skipping malformed env line"),
            }
        }
        applied
    }

    /// Fail unless every key in `keys` is set.
    ///
    /// All missing keys are reported together, in the order requested.
    pub fn require_env<'a>(
        &self,
        keys: impl IntoIterator<Item = &'a str>,
        env_file: &Path,
    ) -> Result<(), ConfigError> {
        let missing: Vec<String> = keys
            .into_iter()
            .filter(|key| self.get(key).is_none())
            .map(str::to_string)
            .collect();

        if missing.is_empty() {
            return Ok(());
        }
        Err(ConfigError::MissingEnv {
            missing,
            hint: env_hint(env_file),
        })
    }
}

/// First `.env` file in `start` or one of its ancestors.
fn discover_env_file(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(".env"))
        .find(|candidate| candidate.is_file())
}

/// The file to point users at: the real `.env` if present, else the template.
pub fn env_hint(env_file: &Path) -> String {
    if env_file.exists() {
        env_file.display().to_string()
    } else {
        ".env.example".to_string()
    }
}

/// Outcome of a single doctor check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticResult {
    pub check_name: String,
    pub passed: bool,
    pub detail: String,
    pub hint: Option<String>,
}

impl DiagnosticResult {
    pub fn new(check_name: impl Into<String>, passed: bool, detail: impl Into<String>) -> Self {
        Self {
            check_name: check_name.into(),
            passed,
            detail: detail.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// How a variable compares against its known placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvStatus {
    Ok,
    Placeholder,
    Missing,
}

impl EnvStatus {
    pub fn classify(raw: Option<&str>, placeholder: &str) -> Self {
        match raw {
            None => Self::Missing,
            Some(v) if v == placeholder => Self::Placeholder,
            Some(_) => Self::Ok,
        }
    }
}

/// Check each `(key, placeholder)` pair, pushing one result per key.
///
/// Returns true only when every key holds a real value.
pub fn check_env_vars(
    env: &EnvState,
    keys: &[(&str, &str)],
    env_hint: &str,
    out: &mut Vec<DiagnosticResult>,
) -> bool {
    let mut all_present = true;
    for (key, placeholder) in keys {
        let name = format!("Env {key}");
        let result = match EnvStatus::classify(env.get(key), placeholder) {
            EnvStatus::Ok => DiagnosticResult::new(name, true, "OK"),
            EnvStatus::Placeholder => DiagnosticResult::new(
                name,
                false,
                format!("PLACEHOLDER -> replace the value in {env_hint}."),
            ),
            EnvStatus::Missing => {
                let note = if key.starts_with("OPENAI") {
                    "required for tracing/OpenAI"
                } else {
                    "required for all examples"
                };
                DiagnosticResult::new(
                    name,
                    false,
                    format!("MISSING -> set it in {env_hint} or export it ({note})."),
                )
            }
        };
        all_present &= result.passed;
        out.push(result);
    }
    all_present
}
