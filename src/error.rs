//! Error types for the session and cache store
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Backend Error ==
/// Error reported by a [`KeyValueBackend`](crate::persist::KeyValueBackend)
/// implementation.
///
/// The store does not interpret the reason string; it only decides whether
/// the failure is surfaced (write paths) or swallowed (read paths).
#[derive(Error, Debug, Clone)]
#[error("backend {op} failed for '{key}': {reason}")]
pub struct BackendError {
    /// Operation that failed ("get", "set", "remove", "remove_many")
    pub op: &'static str,
    /// Key (or first key) involved in the failed call
    pub key: String,
    /// Backend-specific failure description
    pub reason: String,
}

impl BackendError {
    /// Creates a new BackendError.
    pub fn new(op: &'static str, key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            op,
            key: key.into(),
            reason: reason.into(),
        }
    }
}

// == Store Error Enum ==
/// Unified error type for the store's write paths.
///
/// Read paths never return an error: logical "not found" is an absent value,
/// and read/deserialize failures are logged and treated as absent because
/// everything the store holds is re-derivable from the backend service.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The underlying persistence primitive rejected a write
    #[error("storage write failed: {0}")]
    WriteFailed(#[from] BackendError),

    /// A record could not be serialized before writing
    #[error("serialization failed for '{key}': {source}")]
    Serialize {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Invalid argument on a write path
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

// == Result Type Alias ==
/// Convenience Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_display() {
        let err = BackendError::new("set", "auth_token", "disk full");
        let msg = err.to_string();
        assert!(msg.contains("set"));
        assert!(msg.contains("auth_token"));
        assert!(msg.contains("disk full"));
    }

    #[test]
    fn test_store_error_from_backend_error() {
        let err: StoreError = BackendError::new("remove", "user_data", "io error").into();
        assert!(matches!(err, StoreError::WriteFailed(_)));
        assert!(err.to_string().contains("user_data"));
    }
}
