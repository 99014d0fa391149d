//! The `Multicall` engine — chunked call aggregation with
//! order-preserving demultiplexing.
//!
//! # Usage
//! ```ignore
//! let mc = Multicall::for_chain(transport, 1)?;
//! let results = mc.run(vec![call_a, call_b]).await?;
//! assert_eq!(results.len(), 2);
//! ```

use std::sync::Arc;

use chainmux_abi::codec;
use chainmux_core::{error::ConfigError, error::DecodeError, AbiValue, Call};
use chainmux_rpc::{CallError, RpcTransport};
use tracing::{debug, info};

use crate::deployments;

/// Default number of calls per aggregate submission.
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Canonical signature of the Multicall3 entry point.
const AGGREGATE_SIGNATURE: &str = "aggregate((address,bytes)[])";

/// The call aggregation engine.
///
/// Holds the aggregator contract address for one chain and a transport.
/// Read-only: every submission goes out as an `eth_call` through the
/// transport's retry policy.
#[derive(Clone)]
pub struct Multicall {
    transport: Arc<dyn RpcTransport>,
    address: String,
    batch_size: usize,
}

impl Multicall {
    /// Create an engine against an explicit aggregator address.
    pub fn new(transport: Arc<dyn RpcTransport>, address: impl Into<String>) -> Self {
        Self {
            transport,
            address: address.into(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Create an engine for a chain with a known Multicall3 deployment.
    ///
    /// Fails fast with `ConfigError::UnknownMulticallAddress` before any
    /// network I/O when the chain has no known deployment; supply the
    /// address explicitly via [`Multicall::new`] in that case.
    pub fn for_chain(transport: Arc<dyn RpcTransport>, chain_id: u64) -> Result<Self, ConfigError> {
        let address = deployments::address_for(chain_id)
            .ok_or(ConfigError::UnknownMulticallAddress { chain_id })?;
        Ok(Self::new(transport, address))
    }

    /// Override the aggregator address.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    /// Override the batch size (minimum 1).
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// The aggregator contract address in use.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// The number of calls per aggregate submission.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Execute a batch of read calls.
    ///
    /// The decoded result sequence preserves call order 1:1 — index `i`
    /// of the output corresponds to `calls[i]`, and the output length
    /// always equals the input length. Single-output calls unwrap to the
    /// scalar value; multi-output calls stay tuples.
    pub async fn run(&self, calls: Vec<Call>) -> Result<Vec<AbiValue>, CallError> {
        if calls.is_empty() {
            return Ok(Vec::new());
        }

        // Encode every payload up front: a structural error in any call
        // aborts the whole batch before the first submission.
        let mut payloads = Vec::with_capacity(calls.len());
        for call in &calls {
            payloads.push(codec::encode_call(&call.signature, &call.args)?);
        }

        let total = calls.len();
        let chunks = total.div_ceil(self.batch_size);
        debug!(total, chunks, batch_size = self.batch_size, "aggregating calls");

        let agg_outputs = ["uint256".to_string(), "bytes[]".to_string()];
        let mut results = Vec::with_capacity(total);

        for (chunk_calls, chunk_payloads) in calls
            .chunks(self.batch_size)
            .zip(payloads.chunks(self.batch_size))
        {
            let entries: Vec<AbiValue> = chunk_calls
                .iter()
                .zip(chunk_payloads.iter())
                .map(|(call, payload)| {
                    AbiValue::Tuple(vec![
                        AbiValue::Address(call.target.clone()),
                        AbiValue::Bytes(payload.clone()),
                    ])
                })
                .collect();

            let calldata =
                codec::encode_call(AGGREGATE_SIGNATURE, &[AbiValue::Array(entries)])?;

            let raw = self.transport.eth_call(&self.address, &calldata).await?;

            let decoded = codec::decode_outputs(&agg_outputs, &raw)?;
            let returned = match decoded.into_iter().nth(1) {
                Some(AbiValue::Array(items)) => items,
                other => {
                    return Err(DecodeError::AbiDecodeFailed {
                        reason: format!("aggregate returned unexpected shape: {other:?}"),
                    }
                    .into())
                }
            };

            if returned.len() != chunk_calls.len() {
                return Err(DecodeError::OutputArity {
                    expected: chunk_calls.len(),
                    got: returned.len(),
                }
                .into());
            }

            for (call, item) in chunk_calls.iter().zip(returned) {
                let bytes = match item {
                    AbiValue::Bytes(b) => b,
                    other => {
                        return Err(DecodeError::AbiDecodeFailed {
                            reason: format!("aggregate entry is not bytes: {other:?}"),
                        }
                        .into())
                    }
                };
                let values = codec::decode_outputs(&call.outputs, &bytes)?;
                results.push(codec::collapse(values));
            }
        }

        if results.len() != total {
            return Err(DecodeError::OutputArity {
                expected: total,
                got: results.len(),
            }
            .into());
        }

        info!(total, chunks, "aggregate complete");
        Ok(results)
    }
}
