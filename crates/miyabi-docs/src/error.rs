//! Error types for the documentation crate.

use thiserror::Error;

/// Errors that can occur while rendering or writing a Swagger document.
#[derive(Debug, Error)]
pub enum DocsError {
    /// Failed to serialize the document to JSON.
    #[error("Failed to serialize Swagger document as JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Failed to serialize the document to YAML.
    #[error("Failed to serialize Swagger document as YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// IO error when writing the document.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for documentation operations.
pub type DocsResult<T> = Result<T, DocsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_error() {
        let err: DocsError = serde_json::from_str::<String>("invalid")
            .unwrap_err()
            .into();
        assert!(matches!(err, DocsError::JsonError(_)));
        assert!(err.to_string().contains("JSON"));
    }

    #[test]
    fn test_io_error() {
        let err: DocsError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such directory").into();
        assert!(err.to_string().contains("no such directory"));
    }
}
