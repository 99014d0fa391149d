//! # chainmux-rpc
//!
//! JSON-RPC transport layer for ChainMux:
//!
//! - [`RpcTransport`] — the async trait every connection implements
//! - [`HttpRpcClient`] — reqwest-backed client with transient-failure
//!   retry and immediate revert propagation
//! - [`Signer`] — the write-path seam (never retried)
//! - revert classification: structured JSON-RPC codes first, text
//!   matching as fallback

pub mod error;
pub mod http;
pub mod request;
pub mod retry;
pub mod revert;
pub mod transport;

pub use error::{CallError, TransportError};
pub use http::{HttpClientConfig, HttpRpcClient};
pub use request::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RpcId, TransactionRequest};
pub use retry::with_retry;
pub use transport::{classify, RpcTransport, Signer};
