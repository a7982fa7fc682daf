//! Configuration for contract validation.

use serde::{Deserialize, Serialize};

/// Configuration for validation behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Whether to run the request pipeline.
    pub validate_requests: bool,
    /// Whether to check handler responses.
    pub validate_responses: bool,
    /// Return response violations to the host instead of only logging them.
    pub enforce_responses: bool,
    /// Reject a request when a declared path or body field is absent.
    pub reject_missing_fields: bool,
    /// Let responses with an undeclared status through unchecked.
    pub allow_undeclared_status: bool,
}

impl Default for ValidationConfig {
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

impl ValidationConfig {
    /// Validates everything and rejects absent fields at extraction.
    pub fn strict() -> Self {
        Self {
            reject_missing_fields: true,
            ..Self::default()
        }
    }

    /// Validates nothing.
    pub fn permissive() -> Self {
        Self {
            validate_requests: false,
            validate_responses: false,
            enforce_responses: false,
            reject_missing_fields: false,
            allow_undeclared_status: true,
        }
    }

    /// Response violations fail the request.
    pub fn development() -> Self {
        Self::default()
    }

    /// Response violations are logged and counted only.
    pub fn production() -> Self {
        Self {
            enforce_responses: false,
            allow_undeclared_status: true,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let dev = ValidationConfig::development();
        assert!(dev.validate_requests && dev.validate_responses && dev.enforce_responses);

        let prod = ValidationConfig::production();
        assert!(prod.validate_responses);
        assert!(!prod.enforce_responses);
        assert!(prod.allow_undeclared_status);

        assert!(ValidationConfig::strict().reject_missing_fields);
        assert!(!ValidationConfig::permissive().validate_requests);
    }

    #[test]
    fn test_config_serialization() {
        let json = serde_json::to_value(ValidationConfig::default()).unwrap();
        assert_eq!(json["validate_requests"], true);
        assert_eq!(json["reject_missing_fields"], false);
    }
}
