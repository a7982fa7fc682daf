//! Mapping from [`MiyabiConfig`] sections to the runtime settings of each crate.

use miyabi_config::{DocsSection, LogFormat, MiyabiConfig, TelemetrySection, ValidationSection};
use miyabi_docs::BasicInfo;
use miyabi_telemetry::{LogConfig, MetricsConfig, TelemetryConfig};
use miyabi_validation::ValidationConfig;

use crate::error::AppResult;

/// Validation settings from the `[validation]` section.
pub fn validation_config(section: &ValidationSection) -> ValidationConfig {
    ValidationConfig {
        validate_requests: section.validate_requests,
        validate_responses: section.validate_responses,
        enforce_responses: section.enforce_responses,
        reject_missing_fields: section.reject_missing_fields,
        allow_undeclared_status: section.allow_undeclared_status,
    }
}

/// Swagger metadata from the `[docs]` section.
pub fn basic_info(section: &DocsSection) -> BasicInfo {
    BasicInfo {
        host: section.host.clone(),
        title: section.title.clone(),
        version: section.version.clone(),
        schemes: section.schemes.clone(),
        base_path: section.base_path.clone(),
    }
}

/// Telemetry settings from the `[telemetry]` section.
///
/// Pretty output also carries file and line information.
pub fn telemetry_config(section: &TelemetrySection) -> TelemetryConfig {
    let pretty = section.logging.format == LogFormat::Pretty;
    TelemetryConfig {
        service_name: section.service_name.clone(),
        logging: LogConfig {
            enabled: section.logging.enabled,
            level: section.logging.level.clone(),
            json_format: !pretty,
            file_line_info: pretty,
            include_target: true,
        },
        metrics: MetricsConfig {
            enabled: section.metrics.enabled,
        },
    }
}

/// Installs logging and metrics as configured.
///
/// # Errors
///
/// Returns [`AppError::Telemetry`](crate::AppError::Telemetry) if a global
/// subscriber is already installed or the level is not a valid filter.
pub fn init_telemetry(config: &MiyabiConfig) -> AppResult<()> {
    miyabi_telemetry::init_telemetry(&telemetry_config(&config.telemetry))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_config_mapping() {
        let config = MiyabiConfig::production();
        assert_eq!(
            validation_config(&config.validation),
            ValidationConfig::production()
        );

        let config = MiyabiConfig::development();
        assert_eq!(
            validation_config(&config.validation),
            ValidationConfig::development()
        );
    }

    #[test]
    fn test_basic_info_mapping() {
        let mut config = MiyabiConfig::default();
        config.docs.host = "api.example.com".to_string();
        config.docs.schemes = vec!["https".to_string()];

        let basic = basic_info(&config.docs);
        assert_eq!(basic.host, "api.example.com");
        assert_eq!(basic.schemes, vec!["https"]);
        assert_eq!(basic.base_path, "/");
    }

    #[test]
    fn test_telemetry_config_mapping() {
        let dev = telemetry_config(&MiyabiConfig::development().telemetry);
        assert!(!dev.logging.json_format);
        assert!(dev.logging.file_line_info);
        assert_eq!(dev.logging.level, "debug");

        let prod = telemetry_config(&MiyabiConfig::production().telemetry);
        assert!(prod.logging.json_format);
        assert!(prod.metrics.enabled);
        assert_eq!(prod.service_name, "miyabi");
    }
}
