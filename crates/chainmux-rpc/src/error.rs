//! Transport and call-level error types.

use thiserror::Error;

use chainmux_core::error::{ConfigError, DecodeError, EncodeError};

use crate::request::JsonRpcError;

/// Errors that can occur during an RPC transport operation.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed (connection refused, timeout, etc.).
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON-RPC protocol-level error returned by the node.
    #[error("RPC error {}: {}", .0.code, .0.message)]
    Rpc(JsonRpcError),

    /// Request timed out after the configured duration.
    #[error("Request timed out after {ms}ms")]
    Timeout { ms: u64 },

    /// Contract-level revert — semantically final, never retried.
    #[error("Execution reverted{}", .reason.as_deref().map(|r| format!(": {r}")).unwrap_or_default())]
    Reverted { reason: Option<String> },

    /// Response could not be deserialized.
    #[error("Deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// An unexpected error.
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Returns `true` if this error is transient and worth retrying.
    ///
    /// The inherited policy treats everything except a revert as
    /// transient.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Reverted { .. })
    }
}

/// Failure of a contract call, end to end.
#[derive(Debug, Error)]
pub enum CallError {
    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl CallError {
    /// Returns `true` if the underlying cause was a revert.
    pub fn is_revert(&self) -> bool {
        matches!(self, Self::Transport(TransportError::Reverted { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revert_is_not_retryable() {
        assert!(!TransportError::Reverted { reason: None }.is_retryable());
        assert!(TransportError::Http("connection refused".into()).is_retryable());
        assert!(TransportError::Timeout { ms: 5000 }.is_retryable());
        assert!(TransportError::Rpc(JsonRpcError {
            code: -32601,
            message: "method not found".into(),
            data: None,
        })
        .is_retryable());
    }

    #[test]
    fn revert_display_includes_reason() {
        let err = TransportError::Reverted {
            reason: Some("insufficient balance".into()),
        };
        assert_eq!(err.to_string(), "Execution reverted: insufficient balance");
        let bare = TransportError::Reverted { reason: None };
        assert_eq!(bare.to_string(), "Execution reverted");
    }
}
