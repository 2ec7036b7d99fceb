pub mod config;
pub mod doctor;
pub mod env;
pub mod examples;
pub mod process;
pub mod runner;
pub mod telemetry;
pub mod templates;
