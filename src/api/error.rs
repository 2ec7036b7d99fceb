//! Error types for the library API.

use llm::error::LLMError;
use thiserror::Error;

/// Errors caused by missing or mismatched user configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// One or more required environment variables are unset.
    #[error(
        "Missing environment variables: {}. Update {hint} or export them in your shell. \
         Copy .env.example to .env if you need to regenerate it quickly.",
        .missing.join(", ")
    )]
    MissingEnv {
        /// Every missing key, in the order it was requested.
        missing: Vec<String>,
        /// The file the user should edit.
        hint: String,
    },

    /// No sample inputs are known for the requested template.
    #[error(
        "No sample inputs defined for template '{0}'. Set DAKORA_TEMPLATE_ID to a built-in \
         template with known inputs or add your template's inputs to the sample catalog."
    )]
    UnknownTemplate(String),

    /// The requested example has no descriptor.
    #[error("Unknown example '{0}'")]
    UnknownExample(String),
}

/// A comprehensive error type for running the quickstart examples.
#[derive(Error, Debug)]
pub enum QuickstartError {
    /// The example could not start because of its configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The template service could not be reached or returned garbage.
    #[error("Dakora request failed: {0}")]
    Render(#[from] reqwest::Error),

    /// The template service answered with an error status.
    #[error("Dakora returned {status} while rendering '{template_id}': {body}")]
    RenderStatus {
        template_id: String,
        status: u16,
        body: String,
    },

    /// An error originating from the underlying LLM backend.
    #[error("LLM backend error: {0}")]
    LLM(#[from] LLMError),
}
