//! Main configuration types.
//!
//! This module provides the top-level [`MiyabiConfig`] struct and its presets.

use serde::{Deserialize, Serialize};

use crate::{ConfigError, DocsSection, LogFormat, TelemetrySection, ValidationSection};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const SCHEMES: [&str; 4] = ["http", "https", "ws", "wss"];
const OUTPUT_EXTENSIONS: [&str; 3] = ["yaml", "yml", "json"];

/// Complete Miyabi configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load configuration from files
/// and environment variables.
///
/// # Example
///
/// ```
/// use miyabi_config::MiyabiConfig;
///
/// let config = MiyabiConfig::default();
/// assert!(config.validation.validate_requests);
/// assert_eq!(config.docs.output_path, "swagger.yaml");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct MiyabiConfig {
    /// Contract validation configuration.
    #[serde(default)]
    pub validation: ValidationSection,

    /// Swagger document configuration.
    #[serde(default)]
    pub docs: DocsSection,

    /// Telemetry configuration (logging, metrics).
    #[serde(default)]
    pub telemetry: TelemetrySection,
}

impl MiyabiConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - The log level is not a known level
    /// - A scheme is not `http`, `https`, `ws` or `wss`
    /// - The base path does not start with `/`
    /// - The output path is not a `.yaml`, `.yml` or `.json` file
    /// - The service name or the document title is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = self.telemetry.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::invalid_value(
                "telemetry.logging.level",
                format!("unknown level '{}'", self.telemetry.logging.level),
            ));
        }

        if self.telemetry.service_name.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "telemetry.service_name",
                "must not be empty",
            ));
        }

        if self.docs.title.trim().is_empty() {
            return Err(ConfigError::invalid_value("docs.title", "must not be empty"));
        }

        if let Some(scheme) = self
            .docs
            .schemes
            .iter()
            .find(|scheme| !SCHEMES.contains(&scheme.as_str()))
        {
            return Err(ConfigError::invalid_value(
                "docs.schemes",
                format!("unsupported scheme '{scheme}'"),
            ));
        }

        if !self.docs.base_path.starts_with('/') {
            return Err(ConfigError::invalid_value(
                "docs.base_path",
                "must start with '/'",
            ));
        }

        let extension = std::path::Path::new(&self.docs.output_path)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);
        if !extension
            .as_deref()
            .is_some_and(|e| OUTPUT_EXTENSIONS.contains(&e))
        {
            return Err(ConfigError::invalid_value(
                "docs.output_path",
                format!("expected a .yaml, .yml or .json file: {}", self.docs.output_path),
            ));
        }

        Ok(())
    }

    /// Create a development configuration preset.
    ///
    /// - Response violations fail the request
    /// - Pretty log formatting at debug level
    ///
    /// # Example
    ///
    /// ```
    /// use miyabi_config::MiyabiConfig;
    ///
    /// let config = MiyabiConfig::development();
    /// assert_eq!(config.telemetry.logging.level, "debug");
    /// assert!(config.validation.enforce_responses);
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();

        config.telemetry.logging.level = "debug".to_string();
        config.telemetry.logging.format = LogFormat::Pretty;

        config
    }

    /// Create a production configuration preset.
    ///
    /// - Response violations are logged and counted only
    /// - Undeclared response statuses pass unchecked
    /// - JSON log formatting at info level
    ///
    /// # Example
    ///
    /// ```
    /// use miyabi_config::{LogFormat, MiyabiConfig};
    ///
    /// let config = MiyabiConfig::production();
    /// assert_eq!(config.telemetry.logging.format, LogFormat::Json);
    /// assert!(!config.validation.enforce_responses);
    /// ```
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();

        config.telemetry.logging.level = "info".to_string();
        config.telemetry.logging.format = LogFormat::Json;

        config.validation.enforce_responses = false;
        config.validation.allow_undeclared_status = true;

        config
    }
}
