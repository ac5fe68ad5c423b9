// Telemetry module for structured logging, query metrics, and tracing

use anyhow::Result;
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::{global, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    trace::{RandomIdGenerator, Sampler, TracerProvider},
    Resource,
};
use std::net::SocketAddr;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const SERVICE_NAME: &str = "lightbnb";

/// Initialize structured logging with JSON formatting and trace context
///
/// `RUST_LOG` takes precedence over `log_level`. When `tracing_endpoint` is
/// set, spans are also exported over OTLP.
#[tracing::instrument(skip_all)]
pub fn init_logging(log_level: &str, tracing_endpoint: Option<&str>) -> Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => log_filter(log_level)?,
    };

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_filter(env_filter);

    let registry = tracing_subscriber::registry().with(json_layer);

    if let Some(endpoint) = tracing_endpoint {
        let tracer = init_tracer(endpoint)?;
        let telemetry_layer = tracing_opentelemetry::layer().with_tracer(tracer);
        registry
            .with(telemetry_layer)
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing subscriber: {}", e))?;
    } else {
        registry
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing subscriber: {}", e))?;
    }

    tracing::info!(
        log_level = log_level,
        tracing_endpoint = tracing_endpoint,
        "Structured logging initialized"
    );

    Ok(())
}

/// Parse a configured log level or filter directive
pub fn log_filter(log_level: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(log_level)
        .map_err(|e| anyhow::anyhow!("Invalid log level '{}': {}", log_level, e))
}

/// Initialize OpenTelemetry tracer with OTLP exporter
#[tracing::instrument(skip_all)]
fn init_tracer(endpoint: &str) -> Result<opentelemetry_sdk::trace::Tracer> {
    use opentelemetry_sdk::runtime::Tokio;

    let exporter = opentelemetry_otlp::new_exporter()
        .tonic()
        .with_endpoint(endpoint)
        .build_span_exporter()
        .map_err(|e| anyhow::anyhow!("Failed to build span exporter: {}", e))?;

    let tracer_provider = TracerProvider::builder()
        .with_batch_exporter(exporter, Tokio)
        .with_config(
            opentelemetry_sdk::trace::Config::default()
                .with_sampler(Sampler::AlwaysOn)
                .with_id_generator(RandomIdGenerator::default())
                .with_resource(Resource::new(vec![
                    KeyValue::new("service.name", SERVICE_NAME),
                    KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
                ])),
        )
        .build();

    global::set_tracer_provider(tracer_provider.clone());
    let tracer = tracer_provider.tracer(SERVICE_NAME);

    tracing::info!(endpoint = endpoint, "OpenTelemetry tracer initialized");

    Ok(tracer)
}

/// Flush remaining spans on shutdown
pub fn shutdown_tracer() {
    global::shutdown_tracer_provider();
}

/// Initialize Prometheus metrics exporter and describe the query metrics
///
/// - db_queries_total: successful store operations
/// - db_query_failures_total: failed store operations, labelled by error kind
/// - db_query_duration_seconds: store operation latency
#[tracing::instrument(skip_all)]
pub fn init_metrics(metrics_port: u16) -> Result<()> {
    let addr: SocketAddr = format!("0.0.0.0:{}", metrics_port)
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid metrics port: {}", e))?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus exporter: {}", e))?;

    describe_counter!("db_queries_total", "Total number of successful store operations");
    describe_counter!(
        "db_query_failures_total",
        "Total number of failed store operations"
    );
    describe_histogram!(
        "db_query_duration_seconds",
        "Duration of store operations in seconds"
    );

    tracing::info!(
        metrics_port = metrics_port,
        "Prometheus metrics exporter initialized"
    );

    Ok(())
}

/// Record a successful store operation
#[inline]
pub fn record_query(operation: &'static str, duration_seconds: f64) {
    counter!("db_queries_total", "operation" => operation).increment(1);
    histogram!("db_query_duration_seconds", "operation" => operation).record(duration_seconds);
}

/// Record a failed store operation
#[inline]
pub fn record_query_failure(operation: &'static str, kind: &'static str, duration_seconds: f64) {
    counter!(
        "db_query_failures_total",
        "operation" => operation,
        "kind" => kind
    )
    .increment(1);
    histogram!("db_query_duration_seconds", "operation" => operation).record(duration_seconds);
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_exporter_prometheus::PrometheusRecorder;

    fn render_with(recorder: &PrometheusRecorder, record: impl FnOnce()) -> String {
        metrics::with_local_recorder(recorder, record);
        recorder.handle().render()
    }

    #[test]
    fn test_log_filter_accepts_level_and_directives() {
        assert!(log_filter("info").is_ok());
        assert!(log_filter("lightbnb_common=debug,sqlx=warn").is_ok());
    }

    #[test]
    fn test_log_filter_rejects_bad_directive() {
        let err = log_filter("lightbnb=notalevel").unwrap_err();
        assert!(err.to_string().contains("lightbnb=notalevel"));
    }

    #[test]
    fn test_invalid_log_directive_is_rejected_without_env() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let result = init_logging("lightbnb=notalevel", None);
        assert!(result.is_err());
    }

    #[test]
    fn test_successful_query_reaches_prometheus() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let rendered = render_with(&recorder, || {
            record_query("get_user_with_id", 0.002);
            record_query("get_user_with_id", 0.003);
        });

        assert!(
            rendered.contains("db_queries_total{operation=\"get_user_with_id\"} 2"),
            "{rendered}"
        );
        assert!(rendered.contains("db_query_duration_seconds"), "{rendered}");
        assert!(!rendered.contains("db_query_failures_total"), "{rendered}");
    }

    #[test]
    fn test_failed_query_is_labelled_with_error_kind() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let rendered = render_with(&recorder, || {
            record_query_failure("add_user", "duplicate_key", 0.004);
        });

        let line = rendered
            .lines()
            .find(|line| line.starts_with("db_query_failures_total{"))
            .unwrap_or_else(|| panic!("failure counter missing: {rendered}"));
        assert!(line.contains("operation=\"add_user\""));
        assert!(line.contains("kind=\"duplicate_key\""));
        assert!(line.ends_with(" 1"));
    }
}
