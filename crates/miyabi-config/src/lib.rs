//! Typed configuration for Miyabi.
//!
//! This crate provides a strongly-typed configuration with support for:
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → file → env)
//!
//! The root [`MiyabiConfig`] holds three sections:
//!
//! - [`ValidationSection`] - which contract checks run and how strictly
//! - [`DocsSection`] - Swagger document metadata and output path
//! - [`TelemetrySection`] - logging and metrics
//!
//! # Configuration File Format
//!
//! ```toml
//! [validation]
//! validate_requests = true
//! validate_responses = true
//! enforce_responses = false
//! reject_missing_fields = false
//! allow_undeclared_status = true
//!
//! [docs]
//! host = "api.example.com"
//! title = "User Service"
//! version = "1.0.0"
//! schemes = ["https"]
//! base_path = "/"
//! output_path = "swagger.yaml"
//!
//! [telemetry]
//! service_name = "users"
//!
//! [telemetry.logging]
//! enabled = true
//! level = "info"
//! format = "json"
//!
//! [telemetry.metrics]
//! enabled = true
//! ```
//!
//! # Environment Variable Overrides
//!
//! Values can be overridden with `MIYABI__SECTION__KEY` variables, e.g.
//! `MIYABI__VALIDATION__ENFORCE_RESPONSES=false` or
//! `MIYABI__TELEMETRY__LOGGING__LEVEL=debug`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::MiyabiConfig;
pub use error::ConfigError;
pub use loader::{ConfigLoader, DEFAULT_ENV_PREFIX};
pub use schema::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documented_file_format_parses() {
        let toml = r#"
            [validation]
            enforce_responses = false
            allow_undeclared_status = true

            [docs]
            host = "api.example.com"
            title = "User Service"
            version = "1.0.0"
            schemes = ["https"]

            [telemetry]
            service_name = "users"

            [telemetry.logging]
            level = "info"
            format = "json"

            [telemetry.metrics]
            enabled = true
        "#;

        let config = ConfigLoader::new()
            .with_string(toml, "toml")
            .unwrap()
            .load()
            .unwrap();

        assert!(!config.validation.enforce_responses);
        assert_eq!(config.docs.title, "User Service");
        assert_eq!(config.telemetry.logging.format, LogFormat::Json);
    }
}
