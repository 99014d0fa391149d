//! The `RpcTransport` trait — the seam every RPC connection implements.
//!
//! # Thread Safety
//! Implementations must be `Send + Sync` for use across Tokio tasks.
//!
//! # Object Safety
//! The trait is object-safe and is normally held as `Arc<dyn RpcTransport>`.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::TransportError;
use crate::request::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, TransactionRequest};
use crate::revert;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Monotonic request id for the convenience helpers.
pub fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Classify a JSON-RPC error object into a `TransportError`.
///
/// Reverts become `Reverted` (non-retryable); everything else stays a
/// plain `Rpc` error, which the retry policy treats as transient.
pub fn classify(err: JsonRpcError) -> TransportError {
    match revert::classify_revert(&err) {
        Some(reason) => TransportError::Reverted { reason },
        None => TransportError::Rpc(err),
    }
}

fn parse_quantity(value: &Value) -> Result<u64, TransportError> {
    let s = value
        .as_str()
        .ok_or_else(|| TransportError::Other(format!("expected quantity string, got {value}")))?;
    u64::from_str_radix(s.trim_start_matches("0x"), 16)
        .map_err(|e| TransportError::Other(format!("bad quantity '{s}': {e}")))
}

fn parse_bytes(value: &Value) -> Result<Vec<u8>, TransportError> {
    let s = value
        .as_str()
        .ok_or_else(|| TransportError::Other(format!("expected data string, got {value}")))?;
    hex::decode(s.trim_start_matches("0x"))
        .map_err(|e| TransportError::Other(format!("bad hex data: {e}")))
}

/// The central async trait every RPC connection implements.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    /// Send a single JSON-RPC request and return the response.
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError>;

    /// Send a batch of JSON-RPC requests.
    ///
    /// Default implementation sends them sequentially; override for true
    /// wire-level batching.
    async fn send_batch(
        &self,
        reqs: Vec<JsonRpcRequest>,
    ) -> Result<Vec<JsonRpcResponse>, TransportError> {
        let mut responses = Vec::with_capacity(reqs.len());
        for req in reqs {
            responses.push(self.send(req).await?);
        }
        Ok(responses)
    }

    /// Return the transport's identifier (URL or name).
    fn url(&self) -> &str;

    /// Call a method and return the raw result value.
    async fn request_value(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<Value, TransportError> {
        let req = JsonRpcRequest::new(next_id(), method, params);
        let resp = self.send(req).await?;
        resp.into_result().map_err(classify)
    }

    /// `eth_call` against `to` with raw calldata; returns the raw
    /// returned bytes at the latest block.
    async fn eth_call(&self, to: &str, data: &[u8]) -> Result<Vec<u8>, TransportError> {
        let params = vec![
            json!({ "to": to, "data": format!("0x{}", hex::encode(data)) }),
            json!("latest"),
        ];
        let result = self.request_value("eth_call", params).await?;
        parse_bytes(&result)
    }

    /// Current block number.
    async fn block_number(&self) -> Result<u64, TransportError> {
        let result = self.request_value("eth_blockNumber", vec![]).await?;
        parse_quantity(&result)
    }

    /// The chain id the node reports.
    async fn chain_id(&self) -> Result<u64, TransportError> {
        let result = self.request_value("eth_chainId", vec![]).await?;
        parse_quantity(&result)
    }
}

/// An entity able to authorize state-changing transactions.
///
/// Writes are never retried — a duplicate submission is unsafe — so the
/// single `send_transaction` call is the whole contract.
#[async_trait]
pub trait Signer: Send + Sync {
    /// The account this signer signs for (0x-prefixed hex).
    fn address(&self) -> String;

    /// Submit a transaction exactly once; returns the transaction hash.
    async fn send_transaction(&self, tx: TransactionRequest) -> Result<String, TransportError>;
}
