//! Log output and, with the `otel` feature, OpenTelemetry trace export.

use std::collections::HashMap;
use std::time::Duration;

use tracing::Subscriber;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use super::config::{DAKORA_API_KEY, DAKORA_BASE_URL, DEFAULT_BASE_URL, OTLP_ENDPOINT};
use super::env::EnvState;

const DEFAULT_FILTER: &str = "warn";

/// Path of Dakora's OTLP/HTTP trace intake, relative to the base URL.
pub const DAKORA_TRACES_PATH: &str = "/api/v1/traces";

/// Where spans are exported and which headers go with them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTarget {
    pub endpoint: String,
    pub headers: HashMap<String, String>,
}

impl ExportTarget {
    /// `OTEL_EXPORTER_OTLP_ENDPOINT` when set, else Dakora's trace intake.
    /// The project key is attached as `X-API-Key` when present.
    pub fn from_env(env: &EnvState) -> Self {
        let endpoint = match env.get(OTLP_ENDPOINT) {
            Some(endpoint) => endpoint.to_string(),
            None => format!(
                "{}{DAKORA_TRACES_PATH}",
                env.get(DAKORA_BASE_URL)
                    .unwrap_or(DEFAULT_BASE_URL)
                    .trim_end_matches('/')
            ),
        };
        let headers = env
            .get(DAKORA_API_KEY)
            .map(|key| HashMap::from([("X-API-Key".to_string(), key.to_string())]))
            .unwrap_or_default();
        Self { endpoint, headers }
    }
}

/// Pushes buffered spans to the backend before the process exits.
pub trait TraceFlusher {
    fn force_flush(&self, timeout: Duration);
}

/// Used when trace export is not compiled in or not requested.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopFlusher;

impl TraceFlusher for NoopFlusher {
    fn force_flush(&self, _timeout: Duration) {}
}

fn env_filter(env: &EnvState) -> EnvFilter {
    EnvFilter::try_new(env.get("RUST_LOG").unwrap_or(DEFAULT_FILTER))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn fmt_layer<S>(env: &EnvState) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_filter(env_filter(env))
}

/// Install the global subscriber.
///
/// With `export_as` set and the `otel` feature enabled, spans are exported
/// over OTLP under that service name and the returned flusher drains them.
/// Otherwise logs go to stderr only and the flusher does nothing.
pub fn init(env: &EnvState, export_as: Option<&str>) -> Box<dyn TraceFlusher> {
    match export_as {
        Some(service_name) => init_with_export(env, service_name),
        None => {
            let _ = tracing_subscriber::registry().with(fmt_layer(env)).try_init();
            Box::new(NoopFlusher)
        }
    }
}

#[cfg(feature = "otel")]
fn init_with_export(env: &EnvState, service_name: &str) -> Box<dyn TraceFlusher> {
    use opentelemetry::trace::TracerProvider as _;

    match otel::provider(env, service_name) {
        Ok(provider) => {
            let tracer = provider.tracer("dakora-quickstart");
            let otel_layer = tracing_opentelemetry::layer()
                .with_tracer(tracer)
                .with_filter(tracing_subscriber::filter::LevelFilter::INFO);
            let _ = tracing_subscriber::registry()
                .with(fmt_layer(env))
                .with(otel_layer)
                .try_init();
            opentelemetry::global::set_tracer_provider(provider.clone());
            Box::new(otel::OtelFlusher(provider))
        }
        Err(e) => {
            let _ = tracing_subscriber::registry().with(fmt_layer(env)).try_init();
            tracing::warn!(error = %e, "trace export disabled");
            Box::new(NoopFlusher)
        }
    }
}

#[cfg(not(feature = "otel"))]
fn init_with_export(env: &EnvState, service_name: &str) -> Box<dyn TraceFlusher> {
    let _ = tracing_subscriber::registry().with(fmt_layer(env)).try_init();
    tracing::debug!(service_name, "built without the otel feature; spans stay local");
    Box::new(NoopFlusher)
}

#[cfg(feature = "otel")]
mod otel {
    use std::time::Duration;

    use opentelemetry_otlp::{WithExportConfig, WithHttpConfig};
    use opentelemetry_sdk::trace::SdkTracerProvider;
    use opentelemetry_sdk::Resource;

    use super::{ExportTarget, TraceFlusher};
    use crate::core::env::EnvState;

    pub(super) fn provider(
        env: &EnvState,
        service_name: &str,
    ) -> Result<SdkTracerProvider, opentelemetry_otlp::ExporterBuildError> {
        let target = ExportTarget::from_env(env);
        tracing::debug!(endpoint = %target.endpoint, "exporting spans");
        let exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_http()
            .with_protocol(opentelemetry_otlp::Protocol::HttpBinary)
            .with_endpoint(target.endpoint)
            .with_headers(target.headers)
            .build()?;

        Ok(SdkTracerProvider::builder()
            .with_batch_exporter(exporter)
            .with_resource(
                Resource::builder()
                    .with_service_name(service_name.to_string())
                    .build(),
            )
            .build())
    }

    pub(super) struct OtelFlusher(pub(super) SdkTracerProvider);

    impl TraceFlusher for OtelFlusher {
        fn force_flush(&self, timeout: Duration) {
            if let Err(e) = self.0.force_flush() {
                tracing::warn!(error = %e, timeout_ms = timeout.as_millis() as u64, "trace flush failed");
            }
        }
    }
}
