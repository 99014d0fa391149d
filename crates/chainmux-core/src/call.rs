//! The `Call` type — one read-only contract invocation, ready to be
//! encoded and queued into an aggregate batch.

use crate::value::AbiValue;
use serde::{Deserialize, Serialize};

/// A single read-only contract call.
///
/// Immutable once constructed. The signature is the canonical Solidity
/// form (`"balanceOf(address)"`); `outputs` holds the return type
/// strings the raw result will be decoded against (`["uint256"]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    /// Target contract address, 0x-prefixed hex
    pub target: String,
    /// Canonical function signature, e.g. "balanceOf(address)"
    pub signature: String,
    /// Input values in declaration order
    pub args: Vec<AbiValue>,
    /// Solidity type strings of the return values, e.g. ["uint256"]
    pub outputs: Vec<String>,
}

impl Call {
    pub fn new(
        target: impl Into<String>,
        signature: impl Into<String>,
        args: Vec<AbiValue>,
        outputs: Vec<String>,
    ) -> Self {
        Self {
            target: target.into(),
            signature: signature.into(),
            args,
            outputs,
        }
    }

    /// The bare function name, without the parameter list.
    pub fn function_name(&self) -> &str {
        self.signature
            .split_once('(')
            .map(|(name, _)| name)
            .unwrap_or(&self.signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_name_strips_params() {
        let call = Call::new(
            "0x0000000000000000000000000000000000000001",
            "balanceOf(address)",
            vec![AbiValue::Address("0x0000000000000000000000000000000000000002".into())],
            vec!["uint256".into()],
        );
        assert_eq!(call.function_name(), "balanceOf");
    }

    #[test]
    fn call_serde_roundtrip() {
        let call = Call::new("0xabc", "totalSupply()", vec![], vec!["uint256".into()]);
        let json = serde_json::to_string(&call).unwrap();
        let back: Call = serde_json::from_str(&json).unwrap();
        assert_eq!(call, back);
    }
}
