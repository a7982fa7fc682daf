//! Error types for Miyabi.
//!
//! This module provides the [`MiyabiError`] type, the single error type
//! raised by schema validation, schema combination, registry lookups and
//! the request/response hooks.
//!
//! # Taxonomy
//!
//! | Variant | Category | Meaning |
//! |---|---|---|
//! | `Validation` | `Validation` | Client input does not match its schema |
//! | `MissingField` | `Validation` | Partial schemas did not supply a canonical field |
//! | `ResponseValidation` | `ResponseValidation` | The service broke its own response contract |
//! | `Definition` | `Definition` | Configuration or context needed to validate is missing |
//! | `UnmappedOperation` | `Definition` | An operation id has no registered contract |
//! | `UndeclaredStatus` | `Definition` | A response status has no declared schema |
//!
//! Only the `Validation` category is a client problem. Everything else is a
//! service or wiring defect and maps to a 5xx status.

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validate::ValidationError;

/// Result type alias using [`MiyabiError`].
pub type MiyabiResult<T> = Result<T, MiyabiError>;

/// Categories of errors for classification and handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Request data does not conform to the declared contract.
    Validation,
    /// Response data produced by the service does not conform to its contract.
    ResponseValidation,
    /// The contract wiring itself is incomplete.
    Definition,
}

impl ErrorCategory {
    /// Returns the default HTTP status code for this error category.
    #[must_use]
    pub const fn default_status_code(&self) -> StatusCode {
        match self {
            Self::Validation => StatusCode::BAD_REQUEST,
            Self::ResponseValidation | Self::Definition => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Standard error type for Miyabi.
///
/// # Example
///
/// ```
/// use miyabi_core::{ErrorCategory, MiyabiError, ValidationError};
///
/// let error: MiyabiError = ValidationError::new("$.id", "expected integer, got string").into();
/// assert!(error.is_validation());
/// assert_eq!(error.category(), ErrorCategory::Validation);
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MiyabiError {
    /// Request input failed structural validation.
    #[error("request validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A handler response failed structural validation.
    #[error("response validation failed: {0}")]
    ResponseValidation(ValidationError),

    /// A canonical schema field was not supplied by any partial schema.
    #[error("missing field '{field}' for schema '{schema}'")]
    MissingField {
        /// The schema being constructed.
        schema: String,
        /// The field that no source supplied.
        field: String,
    },

    /// Configuration or context required for validation is missing.
    #[error("definition error: {message}")]
    Definition {
        /// Human-readable error message.
        message: String,
    },

    /// The operation id was never registered.
    #[error("operation '{operation_id}' is not registered")]
    UnmappedOperation {
        /// The unknown operation id.
        operation_id: String,
    },

    /// The operation declares no response definition for the status code.
    #[error("operation '{operation_id}' declares no response for status {status}")]
    UndeclaredStatus {
        /// The operation id.
        operation_id: String,
        /// The undeclared status code.
        status: u16,
    },
}

impl MiyabiError {
    /// Creates a request validation error.
    #[must_use]
    pub fn validation(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(ValidationError::new(path, message))
    }

    /// Wraps a validation error as a response validation error.
    #[must_use]
    pub fn response_validation(error: ValidationError) -> Self {
        Self::ResponseValidation(error)
    }

    /// Creates a missing field error.
    #[must_use]
    pub fn missing_field(schema: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            schema: schema.into(),
            field: field.into(),
        }
    }

    /// Creates a definition error.
    #[must_use]
    pub fn definition(message: impl Into<String>) -> Self {
        Self::Definition {
            message: message.into(),
        }
    }

    /// Creates an unmapped operation error.
    #[must_use]
    pub fn unmapped_operation(operation_id: impl Into<String>) -> Self {
        Self::UnmappedOperation {
            operation_id: operation_id.into(),
        }
    }

    /// Creates an undeclared status error.
    #[must_use]
    pub fn undeclared_status(operation_id: impl Into<String>, status: u16) -> Self {
        Self::UndeclaredStatus {
            operation_id: operation_id.into(),
            status,
        }
    }

    /// Returns the error category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation(_) | Self::MissingField { .. } => ErrorCategory::Validation,
            Self::ResponseValidation(_) => ErrorCategory::ResponseValidation,
            Self::Definition { .. }
            | Self::UnmappedOperation { .. }
            | Self::UndeclaredStatus { .. } => ErrorCategory::Definition,
        }
    }

    /// Returns `true` for request and response validation failures.
    ///
    /// A response validation error is a validation error too; use
    /// [`category`](Self::category) to tell the two apart.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::ResponseValidation(_) | Self::MissingField { .. }
        )
    }

    /// Returns the underlying structural error, if any.
    #[must_use]
    pub const fn validation_error(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(error) | Self::ResponseValidation(error) => Some(error),
            _ => None,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        self.category().default_status_code()
    }

    /// Converts this error to a serializable error envelope.
    #[must_use]
    pub fn to_envelope(&self, request_id: Option<&str>) -> ErrorEnvelope {
        ErrorEnvelope {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
                category: self.category(),
                details: self.error_details(),
            },
            request_id: request_id.map(ToString::to_string),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::ResponseValidation(_) => "RESPONSE_VALIDATION_ERROR",
            Self::MissingField { .. } => "MISSING_FIELD",
            Self::Definition { .. } => "DEFINITION_ERROR",
            Self::UnmappedOperation { .. } => "UNMAPPED_OPERATION",
            Self::UndeclaredStatus { .. } => "UNDECLARED_STATUS",
        }
    }

    fn error_details(&self) -> Option<serde_json::Value> {
        match self {
            Self::Validation(error) | Self::ResponseValidation(error) => {
                serde_json::to_value(error).ok()
            }
            Self::MissingField { schema, field } => Some(serde_json::json!({
                "schema": schema,
                "field": field,
            })),
            Self::UnmappedOperation { operation_id } => Some(serde_json::json!({
                "operation_id": operation_id,
            })),
            Self::UndeclaredStatus {
                operation_id,
                status,
            } => Some(serde_json::json!({
                "operation_id": operation_id,
                "status": status,
            })),
            Self::Definition { .. } => None,
        }
    }
}

/// Serializable error envelope for HTTP responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// The error details.
    pub error: ErrorDetail,
    /// The request ID for correlation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Error detail within an envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Error category.
    pub category: ErrorCategory,
    /// Additional error details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_maps_to_bad_request() {
        let error = MiyabiError::validation("$.id", "expected integer, got string");
        assert_eq!(error.category(), ErrorCategory::Validation);
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert!(error.is_validation());
        assert!(error.to_string().contains("$.id"));
    }

    #[test]
    fn test_response_validation_is_a_validation_error() {
        let error = MiyabiError::response_validation(ValidationError::new("$.name", "missing"));
        assert!(error.is_validation());
        assert_eq!(error.category(), ErrorCategory::ResponseValidation);
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_definition_errors_are_not_validation_errors() {
        let errors = [
            MiyabiError::definition("no operation bound"),
            MiyabiError::unmapped_operation("getUser"),
            MiyabiError::undeclared_status("getUser", 404),
        ];

        for error in errors {
            assert!(!error.is_validation(), "{error} should not be a validation error");
            assert_eq!(error.category(), ErrorCategory::Definition);
            assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn test_missing_field_is_client_error() {
        let error = MiyabiError::missing_field("UserRequest", "name");
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert!(error.to_string().contains("name"));
        assert!(error.to_string().contains("UserRequest"));
    }

    #[test]
    fn test_error_envelope_serialization() {
        let error = MiyabiError::validation("$.id", "expected integer, got string");
        let envelope = error.to_envelope(Some("req-456"));

        let json = serde_json::to_string(&envelope).expect("serialization should work");
        assert!(json.contains("\"code\":\"VALIDATION_ERROR\""));
        assert!(json.contains("\"request_id\":\"req-456\""));
        assert!(json.contains("\"category\":\"validation\""));
        assert!(json.contains("\"path\":\"$.id\""));
    }

    #[test]
    fn test_envelope_details_for_undeclared_status() {
        let envelope = MiyabiError::undeclared_status("getUser", 404).to_envelope(None);
        let details = envelope.error.details.unwrap();
        assert_eq!(details["status"], 404);
        assert_eq!(details["operation_id"], "getUser");
        assert!(envelope.request_id.is_none());
    }
}
