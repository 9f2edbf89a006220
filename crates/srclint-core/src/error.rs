//! Error types for srclint.
//!
//! Only fatal conditions are errors. Everything the audit discovers about a
//! document is reported as a [`Finding`](crate::Finding) instead, so a single
//! bad entry or a failed probe never aborts a run.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the srclint library.
#[derive(Debug, Error)]
pub enum AuditError {
    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Document not found: {0}")]
    DocumentNotFound(PathBuf),

    // Document errors
    #[error("YAML error: {message}")]
    Yaml {
        message: String,
        #[source]
        source: Option<serde_yaml::Error>,
    },

    #[error("Malformed document: {message}")]
    MalformedDocument { message: String },

    // Network errors
    #[error("Network error: {message}{}", cause.as_deref().map(|c| format!(" ({c})")).unwrap_or_default())]
    Network {
        message: String,
        /// Optional cause description
        cause: Option<String>,
    },

    // Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Result type alias for srclint operations.
pub type Result<T> = std::result::Result<T, AuditError>;

impl From<std::io::Error> for AuditError {
    fn from(err: std::io::Error) -> Self {
        AuditError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_yaml::Error> for AuditError {
    fn from(err: serde_yaml::Error) -> Self {
        AuditError::Yaml {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<reqwest::Error> for AuditError {
    fn from(err: reqwest::Error) -> Self {
        AuditError::Network {
            message: err.to_string(),
            cause: std::error::Error::source(&err).map(|s| s.to_string()),
        }
    }
}

impl AuditError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if err.kind() == std::io::ErrorKind::NotFound {
            return AuditError::DocumentNotFound(path);
        }
        AuditError::Io {
            message: err.to_string(),
            path: Some(path),
            source: Some(err),
        }
    }

    /// Create a malformed-document error.
    pub fn malformed(message: impl Into<String>) -> Self {
        AuditError::MalformedDocument {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AuditError::malformed("missing `sources` mapping");
        assert_eq!(
            err.to_string(),
            "Malformed document: missing `sources` mapping"
        );
    }

    #[test]
    fn test_not_found_maps_to_document_not_found() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = AuditError::io_with_path(io, "/tmp/conandata.yml");
        assert!(matches!(err, AuditError::DocumentNotFound(_)));
    }

    #[test]
    fn test_other_io_errors_keep_path() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err = AuditError::io_with_path(io, "/tmp/conandata.yml");
        match err {
            AuditError::Io { path, .. } => {
                assert_eq!(path, Some(PathBuf::from("/tmp/conandata.yml")))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_network_error_shows_cause() {
        let err = AuditError::Network {
            message: "error sending request".into(),
            cause: Some("dns error".into()),
        };
        assert_eq!(err.to_string(), "Network error: error sending request (dns error)");

        let err = AuditError::Network {
            message: "builder error".into(),
            cause: None,
        };
        assert_eq!(err.to_string(), "Network error: builder error");
    }

    #[test]
    fn test_yaml_conversion() {
        let err: AuditError = serde_yaml::from_str::<serde_yaml::Value>("a: [")
            .unwrap_err()
            .into();
        assert!(matches!(err, AuditError::Yaml { .. }));
    }
}
