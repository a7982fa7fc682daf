//! Configuration schema types.
//!
//! This module defines the structure of all configuration sections. Every
//! section rejects unknown keys and falls back to defaults for absent ones.

use serde::{Deserialize, Serialize};

/// Contract validation section.
///
/// # Example
///
/// ```
/// use miyabi_config::ValidationSection;
///
/// let section = ValidationSection::default();
/// assert!(section.validate_requests);
/// assert!(!section.reject_missing_fields);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ValidationSection {
    /// Run the request pipeline before dispatch.
    #[serde(default = "default_true")]
    pub validate_requests: bool,

    /// Check handler output after dispatch.
    #[serde(default = "default_true")]
    pub validate_responses: bool,

    /// Fail the request on a response violation instead of only logging it.
    #[serde(default = "default_true")]
    pub enforce_responses: bool,

    /// Reject absent path or body fields at extraction.
    #[serde(default)]
    pub reject_missing_fields: bool,

    /// Skip response checks for statuses the operation does not declare.
    #[serde(default)]
    pub allow_undeclared_status: bool,
}

impl Default for ValidationSection {
    fn default() -> Self {
        Self {
            validate_requests: true,
            validate_responses: true,
            enforce_responses: true,
            reject_missing_fields: false,
            allow_undeclared_status: false,
        }
    }
}

/// Swagger document section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DocsSection {
    /// Host (and optional port) serving the API.
    #[serde(default = "default_host")]
    pub host: String,

    /// API title.
    #[serde(default = "default_title")]
    pub title: String,

    /// API version.
    #[serde(default = "default_version")]
    pub version: String,

    /// Transfer protocols.
    #[serde(default = "default_schemes")]
    pub schemes: Vec<String>,

    /// Path prefix shared by every operation.
    #[serde(default = "default_base_path")]
    pub base_path: String,

    /// Where the document is written. `.json` selects JSON, otherwise YAML.
    #[serde(default = "default_output_path")]
    pub output_path: String,
}

impl Default for DocsSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            title: default_title(),
            version: default_version(),
            schemes: default_schemes(),
            base_path: default_base_path(),
            output_path: default_output_path(),
        }
    }
}

fn default_host() -> String {
    "localhost:8080".to_string()
}

fn default_title() -> String {
    "Miyabi API".to_string()
}

fn default_version() -> String {
    "0.1.0".to_string()
}

fn default_schemes() -> Vec<String> {
    vec!["http".to_string()]
}

fn default_base_path() -> String {
    "/".to_string()
}

fn default_output_path() -> String {
    "swagger.yaml".to_string()
}

/// Log format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON formatted logs (production).
    #[default]
    Json,
    /// Human-readable pretty format (development).
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    /// Install the Prometheus recorder and count validation outcomes.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Telemetry configuration section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TelemetrySection {
    /// Service name for telemetry identification.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSection,

    /// Metrics configuration.
    #[serde(default)]
    pub metrics: MetricsSection,
}

impl Default for TelemetrySection {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            logging: LoggingSection::default(),
            metrics: MetricsSection::default(),
        }
    }
}

fn default_service_name() -> String {
    "miyabi".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_defaults() {
        let docs = DocsSection::default();
        assert_eq!(docs.base_path, "/");
        assert_eq!(docs.schemes, vec!["http"]);
        assert_eq!(docs.output_path, "swagger.yaml");

        let telemetry = TelemetrySection::default();
        assert_eq!(telemetry.service_name, "miyabi");
        assert_eq!(telemetry.logging.format, LogFormat::Json);
        assert!(telemetry.metrics.enabled);
    }

    #[test]
    fn test_partial_section_uses_defaults() {
        let docs: DocsSection = toml::from_str(r#"title = "Users""#).unwrap();
        assert_eq!(docs.title, "Users");
        assert_eq!(docs.host, "localhost:8080");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = toml::from_str::<ValidationSection>("validate_everything = true");
        assert!(result.is_err());
    }

    #[test]
    fn test_log_format_serialization() {
        let logging: LoggingSection = serde_json::from_str(r#"{"format": "pretty"}"#).unwrap();
        assert_eq!(logging.format, LogFormat::Pretty);
        assert_eq!(serde_json::to_string(&LogFormat::Json).unwrap(), r#""json""#);
    }
}
