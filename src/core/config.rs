//! Project paths and the typed settings the examples read from the environment.

use std::path::{Path, PathBuf};

use super::env::EnvState;
use crate::api::ConfigError;

pub const DAKORA_API_KEY: &str = "DAKORA_API_KEY";
pub const DAKORA_BASE_URL: &str = "DAKORA_BASE_URL";
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const OPENAI_MODEL: &str = "OPENAI_MODEL";
pub const OTLP_ENDPOINT: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";

pub const DEFAULT_BASE_URL: &str = "https://api.dakora.io";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Where the quickstart lives on disk.
#[derive(Debug, Clone)]
pub struct Paths {
    pub root: PathBuf,
    pub env_file: PathBuf,
}

impl Paths {
    /// Paths relative to the crate checkout this binary was built from.
    pub fn project() -> Self {
        Self::at(env!("CARGO_MANIFEST_DIR"))
    }

    pub fn at(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        Self {
            env_file: root.join(".env"),
            root,
        }
    }

    pub fn manifest(&self) -> PathBuf {
        self.root.join("Cargo.toml")
    }
}

/// Dakora connection settings.
#[derive(Debug, Clone)]
pub struct DakoraSettings {
    pub api_key: String,
    pub base_url: String,
}

impl DakoraSettings {
    pub fn from_env(env: &EnvState, paths: &Paths) -> Result<Self, ConfigError> {
        env.require_env([DAKORA_API_KEY], &paths.env_file)?;
        Ok(Self {
            api_key: env.get(DAKORA_API_KEY).unwrap_or_default().to_string(),
            base_url: env
                .get(DAKORA_BASE_URL)
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
        })
    }
}

/// OpenAI settings for the tracing example.
#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub model: String,
}

impl OpenAiSettings {
    pub fn from_env(env: &EnvState, paths: &Paths) -> Result<Self, ConfigError> {
        env.require_env([OPENAI_API_KEY], &paths.env_file)?;
        Ok(Self {
            api_key: env.get(OPENAI_API_KEY).unwrap_or_default().to_string(),
            model: env.get(OPENAI_MODEL).unwrap_or(DEFAULT_MODEL).to_string(),
        })
    }
}
