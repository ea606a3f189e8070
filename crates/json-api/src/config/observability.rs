//! Logging and Tracing Config

use std::time::Duration;

use clap::{ArgAction, Args, ValueEnum};

/// Log line format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// One human-readable line per event.
    Compact,

    /// One JSON object per event, with the active spans.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Level for cinemates crates when `RUST_LOG` carries no directives
    #[arg(short, long = "log-level", env = "RUST_LOG", default_value = "info")]
    pub level: String,

    /// Log line format (compact, json)
    #[arg(
        long = "log-format",
        env = "LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Compact
    )]
    pub format: LogFormat,
}

/// Trace export and request timing settings.
#[derive(Debug, Args)]
pub struct ObservabilityConfig {
    /// Export request spans over OTLP
    #[arg(
        long = "otel-enabled",
        env = "OTEL_ENABLED",
        action = ArgAction::Set,
        default_value_t = true
    )]
    pub tracing_enabled: bool,

    /// Continue traces the booking site starts, via its `traceparent` header
    #[arg(
        long = "otel-parent-propagation-enabled",
        env = "OTEL_PARENT_PROPAGATION_ENABLED",
        action = ArgAction::Set,
        default_value_t = false
    )]
    pub continue_site_traces: bool,

    /// OTLP gRPC collector endpoint
    #[arg(
        long = "otel-exporter-otlp-endpoint",
        env = "OTEL_EXPORTER_OTLP_ENDPOINT",
        default_value = "http://localhost:4317"
    )]
    pub collector_endpoint: String,

    /// Seconds a span export may take before it is dropped
    #[arg(
        long = "otel-exporter-otlp-timeout-seconds",
        env = "OTEL_EXPORTER_OTLP_TIMEOUT_SECONDS",
        value_parser = parse_seconds,
        default_value = "3"
    )]
    pub export_timeout: Duration,

    /// Service name on exported spans
    #[arg(
        long = "otel-service-name",
        env = "OTEL_SERVICE_NAME",
        default_value = "cinemates-json"
    )]
    pub service_name: String,

    /// Service version on exported spans
    #[arg(
        long = "otel-service-version",
        env = "OTEL_SERVICE_VERSION",
        default_value = env!("CARGO_PKG_VERSION")
    )]
    pub service_version: String,

    /// Deployment environment on exported spans
    #[arg(
        long = "otel-deployment-environment",
        env = "OTEL_DEPLOYMENT_ENVIRONMENT",
        default_value = "development"
    )]
    pub deployment_environment: String,

    /// Share of new traces kept, from 0.0 to 1.0
    #[arg(
        long = "otel-trace-sample-ratio",
        env = "OTEL_TRACE_SAMPLE_RATIO",
        value_parser = parse_sample_ratio,
        default_value = "1.0"
    )]
    pub sample_ratio: f64,

    /// Milliseconds after which a request is logged as slow
    #[arg(
        long = "slow-request-threshold-ms",
        env = "SLOW_REQUEST_THRESHOLD_MS",
        value_parser = parse_millis,
        default_value = "1000"
    )]
    pub slow_request_threshold: Duration,
}

impl ObservabilityConfig {
    /// Whether request spans join a trace named in the request headers.
    ///
    /// Only when spans are exported; otherwise there is no trace to join.
    #[must_use]
    pub fn joins_incoming_traces(&self) -> bool {
        self.tracing_enabled && self.continue_site_traces
    }
}

fn parse_sample_ratio(value: &str) -> Result<f64, String> {
    let ratio: f64 = value.trim().parse().map_err(|e| format!("{e}"))?;

    if (0.0..=1.0).contains(&ratio) {
        Ok(ratio)
    } else {
        Err(format!("sample ratio {ratio} is outside 0.0..=1.0"))
    }
}

fn parse_seconds(value: &str) -> Result<Duration, String> {
    value
        .trim()
        .parse()
        .map(Duration::from_secs)
        .map_err(|e| format!("{e}"))
}

fn parse_millis(value: &str) -> Result<Duration, String> {
    value
        .trim()
        .parse()
        .map(Duration::from_millis)
        .map_err(|e| format!("{e}"))
}
