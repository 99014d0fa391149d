//! Connection-layer errors.

use thiserror::Error;

use chainmux_core::error::ConfigError;
use chainmux_rpc::TransportError;

/// Errors from the connection layer: chain-list and ABI fetching,
/// wallet lifecycle.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// HTTP request failed (connection refused, timeout, etc.).
    #[error("HTTP error: {0}")]
    Http(String),

    /// Non-success HTTP status from an explorer or feed endpoint.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// The explorer has no verified source for the contract. Permanent
    /// — retrying cannot verify a contract.
    #[error("Contract not verified on explorer: {message}")]
    Unverified { message: String },

    /// Response body did not parse as expected.
    #[error("Invalid response from {url}: {reason}")]
    Parse { url: String, reason: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl ConnectError {
    /// Transient failures worth retrying. Everything reachable over the
    /// wire is transient; unverified contracts and malformed bodies are
    /// not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) | Self::Status { .. } => true,
            Self::Transport(t) => t.is_retryable(),
            Self::Unverified { .. } | Self::Parse { .. } | Self::Config(_) => false,
        }
    }
}
