//! Error types for the Session Directory
//!
//! Provides structured error types for code handling, session creation,
//! the Node Directory port, and configuration loading.

use std::time::Duration;
use thiserror::Error;

/// Unified error type for the session directory
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Internal Errors
    // =========================================================================
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // =========================================================================
    // Code Errors
    // =========================================================================
    #[error("Invalid game code format: {code:?}")]
    InvalidCodeFormat { code: String },

    // =========================================================================
    // Registry Errors
    // =========================================================================
    #[error("Session creation failed after {attempts} attempt(s): {reason}")]
    CreationFailed { attempts: u32, reason: String },

    #[error("Session not found: {code}")]
    NotFound { code: String },

    // =========================================================================
    // Node Directory Errors
    // =========================================================================
    #[error("Node directory {operation} failed: {reason}")]
    NodeDirectory { operation: String, reason: String },

    #[error("Node directory {operation} timed out after {timeout:?}")]
    NodeDirectoryTimeout { operation: String, timeout: Duration },

    // =========================================================================
    // Parse / IO Errors
    // =========================================================================
    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a Node Directory failure for `operation`
    pub fn directory(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::NodeDirectory {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Check if the caller may reasonably retry the operation
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::CreationFailed { .. }
            | Error::NodeDirectory { .. }
            | Error::NodeDirectoryTimeout { .. }
            | Error::Io(_) => true,

            Error::InvalidCodeFormat { .. }
            | Error::NotFound { .. }
            | Error::Configuration(_)
            | Error::YamlParse(_)
            | Error::Internal(_) => false,
        }
    }

    /// Check if this error is caused by a transient external condition
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Error::NodeDirectory { .. } | Error::NodeDirectoryTimeout { .. }
        )
    }
}

/// Result type alias for the session directory
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_retryable() {
        let transient = Error::NodeDirectoryTimeout {
            operation: "claim".into(),
            timeout: Duration::from_millis(500),
        };
        assert!(transient.is_retryable());
        assert!(transient.is_transient());

        let creation = Error::CreationFailed {
            attempts: 5,
            reason: "code collision".into(),
        };
        assert!(creation.is_retryable());
        assert!(!creation.is_transient());

        let bad_code = Error::InvalidCodeFormat { code: "AB1".into() };
        assert!(!bad_code.is_retryable());
        assert!(!bad_code.is_transient());
    }

    #[test]
    fn test_error_display() {
        let err = Error::directory("save", "connection refused");
        assert_eq!(err.to_string(), "Node directory save failed: connection refused");

        let err = Error::NotFound { code: "ABCDEF".into() };
        assert_eq!(err.to_string(), "Session not found: ABCDEF");
    }
}
