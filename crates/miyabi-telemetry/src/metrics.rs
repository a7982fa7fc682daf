//! Prometheus metrics for Miyabi.
//!
//! The recording functions are safe to call before [`init_metrics`]; the
//! `metrics` facade drops samples until a recorder is installed.
//!
//! # Example
//!
//! ```rust,ignore
//! use miyabi_telemetry::metrics::{init_metrics, record_request_validated, render_metrics, MetricsConfig};
//!
//! init_metrics(&MetricsConfig::default())?;
//! record_request_validated("getUser");
//! println!("{}", render_metrics().unwrap_or_default());
//! ```

use std::sync::OnceLock;

use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::{Deserialize, Serialize};

use crate::error::TelemetryError;
use crate::TelemetryResult;

/// Requests that passed validation.
pub const REQUESTS_VALIDATED_TOTAL: &str = "miyabi_requests_validated_total";

/// Requests rejected by validation.
pub const REQUEST_VALIDATION_FAILURES_TOTAL: &str = "miyabi_request_validation_failures_total";

/// Responses that did not match their declared schema.
pub const RESPONSE_VALIDATION_FAILURES_TOTAL: &str = "miyabi_response_validation_failures_total";

/// Global metrics handle for rendering.
static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Whether metrics are enabled.
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Installs the Prometheus recorder.
///
/// Calling this again after a successful install is a no-op.
///
/// # Errors
///
/// Returns `TelemetryError::MetricsInit` if another recorder is installed.
pub fn init_metrics(config: &MetricsConfig) -> TelemetryResult<()> {
    if !config.enabled || METRICS_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;

    let _ = METRICS_HANDLE.set(handle);
    register_metric_descriptions();

    Ok(())
}

/// Renders metrics in Prometheus text format.
///
/// Returns `None` if metrics are not initialized.
#[must_use]
pub fn render_metrics() -> Option<String> {
    METRICS_HANDLE.get().map(PrometheusHandle::render)
}

fn register_metric_descriptions() {
    describe_counter!(
        REQUESTS_VALIDATED_TOTAL,
        "Total number of requests that passed contract validation"
    );
    describe_counter!(
        REQUEST_VALIDATION_FAILURES_TOTAL,
        "Total number of requests rejected by contract validation"
    );
    describe_counter!(
        RESPONSE_VALIDATION_FAILURES_TOTAL,
        "Total number of responses that broke their declared contract"
    );
}

/// Records a request that passed validation.
pub fn record_request_validated(operation: &str) {
    counter!(REQUESTS_VALIDATED_TOTAL, "operation" => operation.to_string()).increment(1);
}

/// Records a request rejected by validation.
pub fn record_request_validation_failure(operation: &str) {
    counter!(
        REQUEST_VALIDATION_FAILURES_TOTAL,
        "operation" => operation.to_string()
    )
    .increment(1);
}

/// Records a response that did not match its declared schema.
pub fn record_response_validation_failure(operation: &str, status: u16) {
    counter!(
        RESPONSE_VALIDATION_FAILURES_TOTAL,
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        assert!(MetricsConfig::default().enabled);
    }

    #[test]
    fn test_disabled_metrics_skip_install() {
        assert!(init_metrics(&MetricsConfig { enabled: false }).is_ok());
    }

    #[test]
    fn test_record_functions_dont_panic() {
        record_request_validated("getUser");
        record_request_validation_failure("getUser");
        record_response_validation_failure("getUser", 200);
    }

    #[test]
    fn test_render_after_init() {
        init_metrics(&MetricsConfig::default()).unwrap();
        record_request_validated("renderProbe");

        let rendered = render_metrics().unwrap();
        assert!(rendered.contains(REQUESTS_VALIDATED_TOTAL));
        assert!(rendered.contains("operation=\"renderProbe\""));
    }
}
