//! The examples the dispatcher knows how to launch.

use crate::api::ConfigError;

/// Static description of one runnable example.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExampleDescriptor {
    pub name: &'static str,
    /// Subcommand of this binary that implements the example.
    pub subcommand: &'static str,
    pub required_env: &'static [&'static str],
    /// Cargo features the example wants when run through cargo.
    pub features: &'static str,
    pub description: &'static str,
}

pub const EXAMPLES: &[ExampleDescriptor] = &[
    ExampleDescriptor {
        name: "template-render",
        subcommand: "render",
        required_env: &["DAKORA_API_KEY"],
        features: "",
        description: "Render the default faq_responder template (no tracing).",
    },
    ExampleDescriptor {
        name: "template-tracing",
        subcommand: "trace",
        required_env: &["DAKORA_API_KEY", "OPENAI_API_KEY"],
        features: "otel",
        description: "Render template, call OpenAI, export traces to Dakora.",
    },
];

impl ExampleDescriptor {
    /// Features this example wants that are absent from `compiled`.
    pub fn missing_features(&self, compiled: &[&str]) -> Vec<&'static str> {
        self.features
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty() && !compiled.contains(f))
            .collect()
    }
}

/// Cargo features compiled into the running binary.
pub fn compiled_features() -> Vec<&'static str> {
    let mut features = Vec::new();
    if cfg!(feature = "otel") {
        features.push("otel");
    }
    features
}

/// Find an example by name.
pub fn find_example(name: &str) -> Result<&'static ExampleDescriptor, ConfigError> {
    EXAMPLES
        .iter()
        .find(|e| e.name == name)
        .ok_or_else(|| ConfigError::UnknownExample(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique() {
        let names: HashSet<_> = EXAMPLES.iter().map(|e| e.name).collect();
        assert_eq!(names.len(), EXAMPLES.len());
    }

    #[test]
    fn missing_features_against_compiled_set() {
        let tracing = find_example("template-tracing").unwrap();
        assert_eq!(tracing.missing_features(&[]), ["otel"]);
        assert!(tracing.missing_features(&["otel"]).is_empty());

        let render = find_example("template-render").unwrap();
        assert!(render.missing_features(&[]).is_empty());
    }

    #[test]
    fn compiled_features_follow_cfg() {
        assert_eq!(
            compiled_features().contains(&"otel"),
            cfg!(feature = "otel")
        );
    }

    #[test]
    fn lookup() {
        assert_eq!(find_example("template-render").unwrap().subcommand, "render");
        assert!(matches!(
            find_example("missing"),
            Err(ConfigError::UnknownExample(n)) if n == "missing"
        ));
    }
}
