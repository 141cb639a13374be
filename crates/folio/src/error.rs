//! Error types for folio.
//!
//! This module defines all error types used throughout the folio crate,
//! classifying low-level failures into the handful of kinds the sync
//! pipeline and the CLI care about.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for folio operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Import Errors ===
    /// Input is not valid JSON (import path).
    #[error("invalid JSON: {message}")]
    Parse {
        /// Description of the parse failure.
        message: String,
    },

    // === Remote Sync Errors ===
    /// The remote token is missing or was rejected.
    #[error("authentication failed: {message}")]
    Auth {
        /// Description of the authentication failure.
        message: String,
    },

    /// The remote file changed underneath us (stale revision marker).
    #[error("remote file changed concurrently: {message}")]
    Conflict {
        /// Description from the remote API.
        message: String,
    },

    /// The remote API throttled us and the backoff budget ran out.
    #[error("rate limited by remote API after {waits} wait(s)")]
    RateLimited {
        /// Number of backoff waits performed before giving up.
        waits: u32,
    },

    /// Transient connectivity or server failure, retries exhausted.
    #[error("network error: {message}")]
    Network {
        /// Description of the failure.
        message: String,
    },

    /// No token is configured, so the sync client is disabled.
    #[error("no remote token configured; use `folio token set` or export manually")]
    TokenMissing,

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for folio operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Network {
            message: err.to_string(),
        }
    }
}

impl Error {
    /// Create a new parse error.
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a new authentication error.
    #[must_use]
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create a new conflict error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create a new network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error is a remote conflict.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Check if this error is an authentication failure.
    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. } | Self::TokenMissing)
    }

    /// Check if this error is a rate-limit failure.
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    /// Check if this error is transient and worth retrying.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::TokenMissing;
        assert!(err.to_string().contains("no remote token"));

        let err = Error::parse("unexpected end of input");
        assert_eq!(err.to_string(), "invalid JSON: unexpected end of input");
    }

    #[test]
    fn test_error_is_conflict() {
        assert!(Error::conflict("sha mismatch").is_conflict());
        assert!(!Error::network("timeout").is_conflict());
    }

    #[test]
    fn test_error_is_auth() {
        assert!(Error::auth("bad credentials").is_auth());
        assert!(Error::TokenMissing.is_auth());
        assert!(!Error::conflict("sha mismatch").is_auth());
    }

    #[test]
    fn test_error_is_rate_limited() {
        assert!(Error::RateLimited { waits: 2 }.is_rate_limited());
        assert!(!Error::network("timeout").is_rate_limited());
    }

    #[test]
    fn test_error_is_transient() {
        assert!(Error::network("connection reset").is_transient());
        assert!(!Error::auth("bad credentials").is_transient());
        assert!(!Error::conflict("sha mismatch").is_transient());
    }

    #[test]
    fn test_rate_limited_display() {
        let err = Error::RateLimited { waits: 3 };
        let msg = err.to_string();
        assert!(msg.contains("rate limited"));
        assert!(msg.contains('3'));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "branch must not be empty".to_string(),
        };
        assert!(err.to_string().contains("branch must not be empty"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }

    #[test]
    fn test_internal_error() {
        let err = Error::internal("something went wrong");
        assert_eq!(err.to_string(), "internal error: something went wrong");
    }
}
