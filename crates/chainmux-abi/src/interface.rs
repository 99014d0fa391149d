//! `AbiInterface` — a parsed contract ABI that resolves function names
//! to canonical signatures and output types, and builds [`Call`]s for
//! the aggregation layer.

use alloy_dyn_abi::Specifier;
use alloy_json_abi::{Function, JsonAbi};
use chainmux_core::{error::DecodeError, error::EncodeError, AbiValue, Call};

use crate::codec;

/// A contract interface parsed from standard Ethereum ABI JSON.
#[derive(Debug, Clone)]
pub struct AbiInterface {
    abi: JsonAbi,
}

impl AbiInterface {
    /// Parse a standard Ethereum ABI JSON string.
    pub fn from_json(abi_json: &str) -> Result<Self, EncodeError> {
        let abi: JsonAbi =
            serde_json::from_str(abi_json).map_err(|e| EncodeError::InvalidAbi(e.to_string()))?;
        Ok(Self { abi })
    }

    fn function(&self, name: &str) -> Result<&Function, EncodeError> {
        self.abi
            .functions()
            .find(|f| f.name == name)
            .ok_or_else(|| EncodeError::UnknownFunction { name: name.into() })
    }

    /// The canonical signature of a function, e.g. `"transfer(address,uint256)"`.
    pub fn signature_of(&self, name: &str) -> Result<String, EncodeError> {
        Ok(self.function(name)?.signature())
    }

    /// The solidity type strings of a function's return values.
    pub fn outputs_of(&self, name: &str) -> Result<Vec<String>, EncodeError> {
        let func = self.function(name)?;
        func.outputs
            .iter()
            .map(|p| {
                p.resolve()
                    .map(|t| t.sol_type_name().into_owned())
                    .map_err(|e| EncodeError::InvalidAbi(format!("output '{}': {e}", p.name)))
            })
            .collect()
    }

    /// Encode a call to `name` with `args` into calldata bytes.
    pub fn encode(&self, name: &str, args: &[AbiValue]) -> Result<Vec<u8>, EncodeError> {
        let func = self.function(name)?;
        if args.len() != func.inputs.len() {
            return Err(EncodeError::ArityMismatch {
                expected: func.inputs.len(),
                got: args.len(),
            });
        }
        codec::encode_call(&func.signature(), args)
    }

    /// Decode returned bytes from a call to `name`.
    pub fn decode(&self, name: &str, data: &[u8]) -> Result<Vec<AbiValue>, DecodeError> {
        let outputs = self.outputs_of(name).map_err(|e| DecodeError::AbiDecodeFailed {
            reason: e.to_string(),
        })?;
        codec::decode_outputs(&outputs, data)
    }

    /// Build a [`Call`] against `target`, validated against this interface.
    ///
    /// Arity and unknown-function errors surface here, before anything
    /// is queued.
    pub fn call(
        &self,
        target: impl Into<String>,
        name: &str,
        args: Vec<AbiValue>,
    ) -> Result<Call, EncodeError> {
        let func = self.function(name)?;
        if args.len() != func.inputs.len() {
            return Err(EncodeError::ArityMismatch {
                expected: func.inputs.len(),
                got: args.len(),
            });
        }
        let outputs = self.outputs_of(name)?;
        Ok(Call::new(target, func.signature(), args, outputs))
    }

    /// All function names in the interface.
    pub fn function_names(&self) -> Vec<&str> {
        self.abi.functions().map(|f| f.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ERC20_ABI: &str = r#"[
        {
            "name": "transfer",
            "type": "function",
            "inputs": [
                {"name": "to", "type": "address"},
                {"name": "amount", "type": "uint256"}
            ],
            "outputs": [{"name": "", "type": "bool"}],
            "stateMutability": "nonpayable"
        },
        {
            "name": "balanceOf",
            "type": "function",
            "inputs": [{"name": "owner", "type": "address"}],
            "outputs": [{"name": "", "type": "uint256"}],
            "stateMutability": "view"
        }
    ]"#;

    #[test]
    fn signature_and_outputs_resolution() {
        let iface = AbiInterface::from_json(ERC20_ABI).unwrap();
        assert_eq!(
            iface.signature_of("transfer").unwrap(),
            "transfer(address,uint256)"
        );
        assert_eq!(iface.outputs_of("balanceOf").unwrap(), vec!["uint256"]);
    }

    #[test]
    fn unknown_function_rejected() {
        let iface = AbiInterface::from_json(ERC20_ABI).unwrap();
        assert!(matches!(
            iface.signature_of("mint"),
            Err(EncodeError::UnknownFunction { .. })
        ));
    }

    #[test]
    fn call_builder_validates_arity() {
        let iface = AbiInterface::from_json(ERC20_ABI).unwrap();
        let err = iface
            .call("0xabc", "balanceOf", vec![])
            .unwrap_err();
        assert!(matches!(err, EncodeError::ArityMismatch { expected: 1, got: 0 }));

        let call = iface
            .call(
                "0xabc",
                "balanceOf",
                vec![AbiValue::Address(
                    "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045".into(),
                )],
            )
            .unwrap();
        assert_eq!(call.signature, "balanceOf(address)");
        assert_eq!(call.outputs, vec!["uint256"]);
    }

    #[test]
    fn encode_matches_signature_path() {
        let iface = AbiInterface::from_json(ERC20_ABI).unwrap();
        let args = vec![
            AbiValue::Address("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045".into()),
            AbiValue::Uint(1),
        ];
        let a = iface.encode("transfer", &args).unwrap();
        let b = codec::encode_call("transfer(address,uint256)", &args).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn invalid_abi_json_rejected() {
        assert!(matches!(
            AbiInterface::from_json("not json"),
            Err(EncodeError::InvalidAbi(_))
        ));
    }
}
