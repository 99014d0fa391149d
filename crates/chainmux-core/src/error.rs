//! Error types shared across the ChainMux crates.

use thiserror::Error;

/// Errors that can occur while encoding a call.
///
/// Structural, never retried — wrong arity or a bad type will stay wrong.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("Function '{name}' not found in ABI")]
    UnknownFunction { name: String },

    #[error("Argument count mismatch: ABI has {expected}, got {got}")]
    ArityMismatch { expected: usize, got: usize },

    #[error("Type mismatch for parameter '{param}': {reason}")]
    TypeMismatch { param: String, reason: String },

    #[error("Invalid function signature '{signature}': {reason}")]
    InvalidSignature { signature: String, reason: String },

    #[error("Invalid ABI JSON: {0}")]
    InvalidAbi(String),
}

/// Errors that can occur while decoding returned bytes.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("ABI decode failed: {reason}")]
    AbiDecodeFailed { reason: String },

    #[error("Output count mismatch: expected {expected}, got {got}")]
    OutputArity { expected: usize, got: usize },

    #[error("Invalid type string '{0}'")]
    InvalidTypeString(String),

    #[error("Invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Configuration problems detected before any network I/O.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No multicall deployment known for chain {chain_id}; supply an address explicitly")]
    UnknownMulticallAddress { chain_id: u64 },

    #[error("No explorer endpoint configured for chain {chain_id}")]
    MissingExplorer { chain_id: u64 },

    #[error("Unknown chain id {chain_id}")]
    UnknownChain { chain_id: u64 },

    #[error("Operation requires a signer but none is bound")]
    MissingSigner,

    #[error("No active wallet connection")]
    NotConnected,
}

/// Errors while fetching and normalizing token metadata.
///
/// Fatal per item; bulk operations surface the first failure rather
/// than reporting partial success.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Metadata fetch returned HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Metadata fetch failed: {0}")]
    Http(String),

    #[error("Invalid metadata JSON from {url}: {reason}")]
    InvalidJson { url: String, reason: String },

    #[error("Token {token_id} has no metadata URI")]
    MissingUri { token_id: String },
}
