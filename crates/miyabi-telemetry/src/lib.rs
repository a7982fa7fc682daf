//! Observability for Miyabi.
//!
//! - **Logging**: structured JSON or pretty output via `tracing-subscriber`
//! - **Metrics**: Prometheus-format validation counters via the `metrics` crate
//!
//! # Standard Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `miyabi_requests_validated_total` | Counter | `operation` | Requests that passed validation |
//! | `miyabi_request_validation_failures_total` | Counter | `operation` | Requests rejected by validation |
//! | `miyabi_response_validation_failures_total` | Counter | `operation`, `status` | Responses that broke their contract |
//!
//! # Example
//!
//! ```rust,ignore
//! use miyabi_telemetry::{init_telemetry, TelemetryConfig};
//!
//! init_telemetry(&TelemetryConfig::default())?;
//! tracing::info!(operation_id = "getUser", "validated");
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::TelemetryError;
pub use logging::{init_logging, LogConfig};
pub use metrics::{init_metrics, render_metrics, MetricsConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Combined telemetry configuration.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name reported in the event logged once telemetry is up.
    pub service_name: String,
    /// Logging configuration.
    pub logging: LogConfig,
    /// Metrics configuration.
    pub metrics: MetricsConfig,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "miyabi".to_string(),
            logging: LogConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

/// Initializes logging and metrics.
///
/// # Errors
///
/// Returns `TelemetryError` if either subsystem fails to initialize.
pub fn init_telemetry(config: &TelemetryConfig) -> TelemetryResult<()> {
    init_logging(&config.logging)?;
    init_metrics(&config.metrics)?;
    tracing::info!(service.name = %config.service_name, "telemetry initialized");
    Ok(())
}
