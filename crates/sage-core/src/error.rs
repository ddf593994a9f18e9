//! Error types for the SAGE workspace.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire SAGE workspace.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait. Decode failures are never
/// represented here: reply decoding degrades through its fallback chain
/// instead of erroring, so the only error class that ever reaches the user
/// is a transport failure.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum SageError {
    /// Transport-level failure talking to the dialogue runtime.
    #[error("Dialogue request failed (status {}): {message}", .status_code.map_or_else(|| "n/a".to_string(), |c| c.to_string()))]
    Transport {
        /// HTTP status code, when the runtime answered at all.
        status_code: Option<u16>,
        message: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SageError {
    /// Creates a Transport error.
    pub fn transport(status_code: Option<u16>, message: impl Into<String>) -> Self {
        Self::Transport {
            status_code,
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a Transport error
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// The HTTP status code carried by a transport error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Transport { status_code, .. } => *status_code,
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for SageError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(format!("{} (kind: {:?})", err, err.kind()))
    }
}

/// Conversion from anyhow::Error (transitional, for binary edges)
impl From<anyhow::Error> for SageError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, SageError>`.
pub type Result<T> = std::result::Result<T, SageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_display_with_status() {
        let err = SageError::transport(Some(429), "rate limited");
        assert_eq!(
            err.to_string(),
            "Dialogue request failed (status 429): rate limited"
        );
        assert!(err.is_transport());
        assert_eq!(err.status_code(), Some(429));
    }

    #[test]
    fn test_transport_display_without_status() {
        let err = SageError::transport(None, "connection refused");
        assert_eq!(
            err.to_string(),
            "Dialogue request failed (status n/a): connection refused"
        );
        assert_eq!(err.status_code(), None);
    }

    #[test]
    fn test_from_serde_json() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: SageError = parse_err.into();
        assert!(matches!(err, SageError::Serialization { .. }));
    }

    #[test]
    fn test_config_predicate() {
        assert!(SageError::config("missing api key").is_config());
        assert!(!SageError::internal("boom").is_config());
    }
}
