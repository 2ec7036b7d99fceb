pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod ui;

pub use api::{ConfigError, QuickstartError};
