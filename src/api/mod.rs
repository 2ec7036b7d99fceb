//! Library API: errors, the external collaborators and the example flows.

mod completion;
mod dakora;
mod error;
pub mod quickstart;

pub use completion::{Completion, LlmCompletion};
pub use dakora::{DakoraClient, RenderedTemplate, TemplateRenderer};
pub use error::{ConfigError, QuickstartError};
