//! Facade error type.

use thiserror::Error;

use miyabi_config::ConfigError;
use miyabi_core::MiyabiError;
use miyabi_docs::DocsError;
use miyabi_telemetry::TelemetryError;

/// Any error raised while setting up or running Miyabi.
#[derive(Debug, Error)]
pub enum AppError {
    /// Contract definition, registry or validation error.
    #[error(transparent)]
    Contract(#[from] MiyabiError),

    /// Swagger rendering or output error.
    #[error(transparent)]
    Docs(#[from] DocsError),

    /// Configuration loading error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Logging or metrics initialization error.
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
}

/// Result type for facade operations.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_error_is_transparent() {
        let err: AppError = MiyabiError::unmapped_operation("getUser").into();
        assert!(matches!(err, AppError::Contract(_)));
        assert_eq!(
            err.to_string(),
            MiyabiError::unmapped_operation("getUser").to_string()
        );
    }

    #[test]
    fn test_config_error_conversion() {
        let err: AppError = ConfigError::validation_error("bad").into();
        assert!(err.to_string().contains("bad"));
    }
}
