//! Signature-driven ABI encode/decode.
//!
//! Pure and deterministic: identical inputs always produce identical
//! bytes. Encoding failures are `EncodeError`, decode failures are
//! `DecodeError`; neither is ever retried.
//!
//! # Usage
//! ```ignore
//! let calldata = encode_call("balanceOf(address)", &[
//!     AbiValue::Address("0xd8dA...".into()),
//! ])?;
//! let values = decode_outputs(&["uint256".into()], &ret)?;
//! ```

use alloy_core::dyn_abi::{DynSolType, DynSolValue};
use chainmux_core::{error::DecodeError, error::EncodeError, AbiValue};
use tiny_keccak::{Hasher, Keccak};

use crate::normalizer;

/// The 4-byte function selector: keccak-256 of the canonical signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let mut k = Keccak::v256();
    k.update(signature.as_bytes());
    let mut out = [0u8; 32];
    k.finalize(&mut out);
    [out[0], out[1], out[2], out[3]]
}

/// Split a canonical signature into its name and parameter types.
///
/// `"transfer(address,uint256)"` → `("transfer", [Address, Uint(256)])`.
pub fn parse_signature(signature: &str) -> Result<(String, Vec<DynSolType>), EncodeError> {
    let open = signature.find('(').ok_or_else(|| EncodeError::InvalidSignature {
        signature: signature.into(),
        reason: "missing parameter list".into(),
    })?;
    if !signature.ends_with(')') {
        return Err(EncodeError::InvalidSignature {
            signature: signature.into(),
            reason: "missing closing parenthesis".into(),
        });
    }
    let name = &signature[..open];
    if name.is_empty() {
        return Err(EncodeError::InvalidSignature {
            signature: signature.into(),
            reason: "missing function name".into(),
        });
    }
    let params = &signature[open..];
    // The parameter list parses as a solidity tuple type.
    let tuple: DynSolType = params.parse().map_err(|e: alloy_core::dyn_abi::Error| {
        EncodeError::InvalidSignature {
            signature: signature.into(),
            reason: e.to_string(),
        }
    })?;
    match tuple {
        DynSolType::Tuple(types) => Ok((name.to_string(), types)),
        other => Ok((name.to_string(), vec![other])),
    }
}

/// Encode a function call to calldata bytes: `selector ++ abi(args...)`.
pub fn encode_call(signature: &str, args: &[AbiValue]) -> Result<Vec<u8>, EncodeError> {
    let (_, param_types) = parse_signature(signature)?;

    if args.len() != param_types.len() {
        return Err(EncodeError::ArityMismatch {
            expected: param_types.len(),
            got: args.len(),
        });
    }

    let mut dyn_values = Vec::with_capacity(args.len());
    for (i, (ty, arg)) in param_types.iter().zip(args.iter()).enumerate() {
        let dyn_val =
            normalizer::to_dyn_value(arg, ty).map_err(|reason| EncodeError::TypeMismatch {
                param: i.to_string(),
                reason,
            })?;
        dyn_values.push(dyn_val);
    }

    let mut calldata = selector(signature).to_vec();
    calldata.extend_from_slice(&DynSolValue::Tuple(dyn_values).abi_encode_params());
    Ok(calldata)
}

/// Parse a list of solidity type strings.
pub fn parse_types(types: &[String]) -> Result<Vec<DynSolType>, DecodeError> {
    types
        .iter()
        .map(|t| {
            t.parse::<DynSolType>()
                .map_err(|_| DecodeError::InvalidTypeString(t.clone()))
        })
        .collect()
}

/// Decode returned bytes against the declared output types.
///
/// The result always has exactly `types.len()` values.
pub fn decode_outputs(types: &[String], data: &[u8]) -> Result<Vec<AbiValue>, DecodeError> {
    let parsed = parse_types(types)?;
    decode_outputs_dyn(&parsed, data)
}

/// Same as [`decode_outputs`], for pre-parsed types.
pub fn decode_outputs_dyn(types: &[DynSolType], data: &[u8]) -> Result<Vec<AbiValue>, DecodeError> {
    if types.is_empty() {
        return Ok(Vec::new());
    }
    let tuple = DynSolType::Tuple(types.to_vec());
    let decoded = tuple
        .abi_decode_params(data)
        .map_err(|e| DecodeError::AbiDecodeFailed {
            reason: e.to_string(),
        })?;
    let values = match decoded {
        DynSolValue::Tuple(vals) => vals,
        other => vec![other],
    };
    if values.len() != types.len() {
        return Err(DecodeError::OutputArity {
            expected: types.len(),
            got: values.len(),
        });
    }
    Ok(values.into_iter().map(normalizer::normalize).collect())
}

/// Collapse a decoded output sequence: a single value unwraps to the
/// scalar, anything else stays a tuple.
pub fn collapse(mut values: Vec<AbiValue>) -> AbiValue {
    match values.len() {
        0 => AbiValue::Null,
        1 => values.remove(0),
        _ => AbiValue::Tuple(values),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_matches_known_erc20_transfer() {
        assert_eq!(selector("transfer(address,uint256)"), [0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(selector("balanceOf(address)"), [0x70, 0xa0, 0x82, 0x31]);
    }

    #[test]
    fn encode_transfer() {
        let calldata = encode_call(
            "transfer(address,uint256)",
            &[
                AbiValue::Address("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045".into()),
                AbiValue::Uint(1_000_000),
            ],
        )
        .unwrap();
        assert_eq!(&calldata[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
        // selector + 2 static words
        assert_eq!(calldata.len(), 68);
    }

    #[test]
    fn encode_no_params() {
        let calldata = encode_call("totalSupply()", &[]).unwrap();
        assert_eq!(calldata.len(), 4);
    }

    #[test]
    fn wrong_arity_is_encode_error() {
        let err = encode_call("transfer(address,uint256)", &[AbiValue::Uint(1)]).unwrap_err();
        assert!(matches!(err, EncodeError::ArityMismatch { expected: 2, got: 1 }));
    }

    #[test]
    fn wrong_type_is_encode_error() {
        let err = encode_call("balanceOf(address)", &[AbiValue::Bool(true)]).unwrap_err();
        assert!(matches!(err, EncodeError::TypeMismatch { .. }));
    }

    #[test]
    fn bad_signature_rejected() {
        assert!(matches!(
            encode_call("transfer", &[]),
            Err(EncodeError::InvalidSignature { .. })
        ));
        assert!(matches!(
            encode_call("(address)", &[]),
            Err(EncodeError::InvalidSignature { .. })
        ));
    }

    #[test]
    fn decode_single_uint() {
        let mut word = vec![0u8; 32];
        word[31] = 7;
        let vals = decode_outputs(&["uint256".into()], &word).unwrap();
        assert_eq!(vals, vec![AbiValue::Uint(7)]);
    }

    #[test]
    fn decode_string_output() {
        // abi.encode("USDC") as a single string return value
        let data = hex::decode(
            "0000000000000000000000000000000000000000000000000000000000000020\
             0000000000000000000000000000000000000000000000000000000000000004\
             5553444300000000000000000000000000000000000000000000000000000000",
        )
        .unwrap();
        let vals = decode_outputs(&["string".into()], &data).unwrap();
        assert_eq!(vals, vec![AbiValue::Str("USDC".into())]);
    }

    #[test]
    fn decode_malformed_data_is_decode_error() {
        let err = decode_outputs(&["uint256".into()], &[0u8; 3]).unwrap_err();
        assert!(matches!(err, DecodeError::AbiDecodeFailed { .. }));
    }

    #[test]
    fn decode_bad_type_string() {
        let err = decode_outputs(&["uint257x".into()], &[0u8; 32]).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidTypeString(_)));
    }

    #[test]
    fn collapse_unwraps_single_output() {
        assert_eq!(collapse(vec![AbiValue::Uint(5)]), AbiValue::Uint(5));
        assert_eq!(
            collapse(vec![AbiValue::Uint(5), AbiValue::Bool(true)]),
            AbiValue::Tuple(vec![AbiValue::Uint(5), AbiValue::Bool(true)])
        );
        assert_eq!(collapse(vec![]), AbiValue::Null);
    }

    #[test]
    fn roundtrip_encode_decode() {
        let args = vec![
            AbiValue::Address("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045".into()),
            AbiValue::Uint(999_888),
        ];
        let calldata = encode_call("transfer(address,uint256)", &args).unwrap();
        // Strip the selector and decode the params back
        let vals =
            decode_outputs(&["address".into(), "uint256".into()], &calldata[4..]).unwrap();
        assert_eq!(vals, args);
    }
}
