//! The bulk fan-out policy shared by all wrappers: prefer the
//! aggregation engine whenever one is configured, otherwise issue the
//! calls as N concurrently-pending proxy reads.

use chainmux_abi::codec;
use chainmux_contract::ContractBinding;
use chainmux_core::{AbiValue, Call};
use chainmux_multicall::Multicall;
use chainmux_rpc::CallError;
use futures::future::try_join_all;
use tracing::debug;

pub(crate) async fn run_calls(
    binding: &ContractBinding,
    multicall: Option<&Multicall>,
    calls: Vec<Call>,
) -> Result<Vec<AbiValue>, CallError> {
    match multicall {
        Some(mc) => mc.run(calls).await,
        None => {
            debug!(count = calls.len(), "no aggregator bound, falling back to concurrent reads");
            let transport = binding.transport();
            try_join_all(calls.iter().map(|call| async move {
                let calldata = codec::encode_call(&call.signature, &call.args)?;
                let raw = transport.eth_call(&call.target, &calldata).await?;
                let values = codec::decode_outputs(&call.outputs, &raw)?;
                Ok::<_, CallError>(codec::collapse(values))
            }))
            .await
        }
    }
}
