//! `ContractBinding` — one contract address bound to an ABI and a
//! connection.

use std::sync::Arc;

use chainmux_abi::{codec, AbiInterface};
use chainmux_core::{error::ConfigError, AbiValue, Call};
use chainmux_rpc::{CallError, RpcTransport, Signer, TransactionRequest};
use tracing::debug;

use crate::builder::CallBuilder;

/// A contract bound to an address, an ABI, and a connection.
///
/// Reads go through the transport (which carries the retry policy);
/// writes go through the signer exactly once. The connection can be
/// swapped without invalidating the address or ABI.
#[derive(Clone)]
pub struct ContractBinding {
    address: String,
    abi: AbiInterface,
    transport: Arc<dyn RpcTransport>,
    signer: Option<Arc<dyn Signer>>,
}

impl ContractBinding {
    pub fn new(
        address: impl Into<String>,
        abi: AbiInterface,
        transport: Arc<dyn RpcTransport>,
    ) -> Self {
        Self {
            address: address.into(),
            abi,
            transport,
            signer: None,
        }
    }

    /// Rebind to a different transport, keeping address and ABI.
    pub fn with_transport(mut self, transport: Arc<dyn RpcTransport>) -> Self {
        self.transport = transport;
        self
    }

    /// Attach a signer for write operations.
    pub fn with_signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn abi(&self) -> &AbiInterface {
        &self.abi
    }

    pub fn transport(&self) -> &Arc<dyn RpcTransport> {
        &self.transport
    }

    /// Invoke a read-only method and decode the result.
    ///
    /// Single-output functions unwrap to the scalar value; multi-output
    /// functions return a tuple. Transient transport failures are
    /// retried by the transport; reverts propagate immediately.
    pub async fn call(&self, function: &str, args: Vec<AbiValue>) -> Result<AbiValue, CallError> {
        let calldata = self.abi.encode(function, &args)?;
        debug!(contract = %self.address, function, "read call");
        let raw = self.transport.eth_call(&self.address, &calldata).await?;
        let values = self.abi.decode(function, &raw)?;
        Ok(codec::collapse(values))
    }

    /// Submit a state-changing transaction; returns the transaction
    /// hash.
    ///
    /// Requires a bound signer. Submitted exactly once — writes are
    /// never retried, a duplicate submission is unsafe.
    pub async fn send(&self, function: &str, args: Vec<AbiValue>) -> Result<String, CallError> {
        let signer = self
            .signer
            .as_ref()
            .ok_or(ConfigError::MissingSigner)?;

        let calldata = self.abi.encode(function, &args)?;
        let mut tx = TransactionRequest::call(&self.address, &calldata);
        tx.from = Some(signer.address());

        debug!(contract = %self.address, function, from = %signer.address(), "submitting transaction");
        Ok(signer.send_transaction(tx).await?)
    }

    /// Build a validated [`Call`] against this contract for the
    /// aggregation engine.
    pub fn prepare(&self, function: &str, args: Vec<AbiValue>) -> Result<Call, CallError> {
        Ok(self.abi.call(&self.address, function, args)?)
    }

    /// Start accumulating calls for a batched submission.
    pub fn batch(&self) -> CallBuilder<'_> {
        CallBuilder::new(self)
    }
}
