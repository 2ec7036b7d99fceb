//! Defines the command-line interface structure using clap.

use clap::{Parser, Subcommand, ValueEnum};

use crate::core::runner::RunnerChoice;

#[derive(Parser)]
#[command(
    name = "dakora-quickstart",
    version,
    about = "Run the Dakora quickstart examples and check your setup"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Cmd,
}

/// Examples `run` can launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExampleName {
    /// Render the default template without tracing
    TemplateRender,
    /// Render a template, call OpenAI and export traces
    TemplateTracing,
}

impl ExampleName {
    pub fn as_str(self) -> &'static str {
        match self {
            ExampleName::TemplateRender => "template-render",
            ExampleName::TemplateTracing => "template-tracing",
        }
    }
}

#[derive(Subcommand)]
pub enum Cmd {
    /// Check the environment, then run an example through cargo or this binary
    Run {
        /// Example to run
        #[arg(value_enum)]
        example: ExampleName,
        /// Preferred runner. Default: cargo when available, else this binary
        #[arg(long, value_enum, default_value_t = RunnerChoice::Auto)]
        runner: RunnerChoice,
    },
    /// Diagnose the toolchain, environment and optional components
    Doctor,
    /// Render a Dakora template (the `template-render` example)
    Render {
        /// Template to render instead of DAKORA_TEMPLATE_ID / faq_responder
        #[arg(long)]
        template: Option<String>,
    },
    /// Render a template, send it to OpenAI and export traces (the `template-tracing` example)
    Trace {
        /// Template to render instead of DAKORA_TEMPLATE_ID / faq_responder
        #[arg(long)]
        template: Option<String>,
    },
    /// List Dakora's built-in templates
    Templates,
}

impl Cmd {
    /// Service name to export spans under, for commands that trace.
    pub fn trace_service(&self) -> Option<&'static str> {
        match self {
            Cmd::Trace { .. } => Some("dakora-examples-quickstart"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runner_defaults_to_auto() {
        let cli = Cli::try_parse_from(["dakora-quickstart", "run", "template-render"]).unwrap();
        match cli.command {
            Cmd::Run { example, runner } => {
                assert_eq!(example, ExampleName::TemplateRender);
                assert_eq!(runner, RunnerChoice::Auto);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn runner_flag_is_closed() {
        let cli = Cli::try_parse_from([
            "dakora-quickstart",
            "run",
            "template-tracing",
            "--runner",
            "binary",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Cmd::Run {
                runner: RunnerChoice::Binary,
                ..
            }
        ));
        assert!(Cli::try_parse_from(["dakora-quickstart", "run", "template-render", "--runner", "uv"]).is_err());
        assert!(Cli::try_parse_from(["dakora-quickstart", "run", "other"]).is_err());
    }

    #[test]
    fn example_names_match_descriptors() {
        for name in ExampleName::value_variants() {
            assert!(crate::core::examples::find_example(name.as_str()).is_ok());
            let parsed = name.to_possible_value().unwrap();
            assert_eq!(parsed.get_name(), name.as_str());
        }
    }

    #[test]
    fn only_trace_exports() {
        assert!(Cmd::Trace { template: None }.trace_service().is_some());
        assert!(Cmd::Doctor.trace_service().is_none());
    }
}
