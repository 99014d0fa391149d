//! Conversions between alloy `DynSolValue` and the canonical `AbiValue`.
//!
//! Decoding normalizes alloy values into `AbiValue`; encoding converts
//! an `AbiValue` back into the `DynSolValue` the target parameter type
//! expects.

use alloy_core::dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::{Address, FixedBytes, I256, U256};
use chainmux_core::AbiValue;
use std::str::FromStr;

/// Convert a decoded `DynSolValue` into an `AbiValue`.
pub fn normalize(val: DynSolValue) -> AbiValue {
    match val {
        DynSolValue::Bool(b) => AbiValue::Bool(b),

        DynSolValue::Int(i, bits) => {
            if bits <= 128 {
                match i128::try_from(i) {
                    Ok(v) => AbiValue::Int(v),
                    Err(_) => AbiValue::BigInt(i.to_string()),
                }
            } else {
                AbiValue::BigInt(i.to_string())
            }
        }

        DynSolValue::Uint(u, bits) => {
            if bits <= 128 {
                match u128::try_from(u) {
                    Ok(v) => AbiValue::Uint(v),
                    Err(_) => AbiValue::BigUint(u.to_string()),
                }
            } else {
                AbiValue::BigUint(u.to_string())
            }
        }

        DynSolValue::FixedBytes(bytes, size) => AbiValue::Bytes(bytes[..size].to_vec()),

        DynSolValue::Bytes(b) => AbiValue::Bytes(b),

        DynSolValue::String(s) => AbiValue::Str(s),

        // EIP-55 checksum encoding
        DynSolValue::Address(a) => AbiValue::Address(a.to_checksum(None)),

        DynSolValue::Array(vals) | DynSolValue::FixedArray(vals) => {
            AbiValue::Array(vals.into_iter().map(normalize).collect())
        }

        DynSolValue::Tuple(fields) => {
            AbiValue::Tuple(fields.into_iter().map(normalize).collect())
        }

        // Function selectors — fall back to bytes
        DynSolValue::Function(f) => AbiValue::Bytes(f.to_vec()),
    }
}

/// Convert an `AbiValue` to the `DynSolValue` for the given expected type.
pub fn to_dyn_value(val: &AbiValue, expected: &DynSolType) -> Result<DynSolValue, String> {
    match (val, expected) {
        (AbiValue::Bool(b), DynSolType::Bool) => Ok(DynSolValue::Bool(*b)),

        (AbiValue::Uint(u), DynSolType::Uint(bits)) => {
            Ok(DynSolValue::Uint(U256::from(*u), *bits))
        }
        (AbiValue::BigUint(s), DynSolType::Uint(bits)) => {
            let u = U256::from_str(s).map_err(|e| format!("uint parse: {e}"))?;
            Ok(DynSolValue::Uint(u, *bits))
        }

        (AbiValue::Int(i), DynSolType::Int(bits)) => Ok(DynSolValue::Int(
            I256::try_from(*i).map_err(|e| e.to_string())?,
            *bits,
        )),
        (AbiValue::BigInt(s), DynSolType::Int(bits)) => {
            let i = I256::from_str(s).map_err(|e| format!("int parse: {e}"))?;
            Ok(DynSolValue::Int(i, *bits))
        }

        (AbiValue::Address(s), DynSolType::Address) => {
            let addr = Address::from_str(s).map_err(|e| format!("address parse: {e}"))?;
            Ok(DynSolValue::Address(addr))
        }

        (AbiValue::Bytes(b), DynSolType::Bytes) => Ok(DynSolValue::Bytes(b.clone())),

        (AbiValue::Bytes(b), DynSolType::FixedBytes(n)) => {
            if b.len() > *n {
                return Err(format!("bytes{n}: got {} bytes", b.len()));
            }
            let mut arr = [0u8; 32];
            arr[..b.len()].copy_from_slice(b);
            Ok(DynSolValue::FixedBytes(FixedBytes::from_slice(&arr), *n))
        }

        (AbiValue::Str(s), DynSolType::String) => Ok(DynSolValue::String(s.clone())),

        (AbiValue::Array(elems), DynSolType::Array(inner)) => {
            let dyn_elems: Result<Vec<_>, _> =
                elems.iter().map(|e| to_dyn_value(e, inner)).collect();
            Ok(DynSolValue::Array(dyn_elems?))
        }

        (AbiValue::Array(elems), DynSolType::FixedArray(inner, len)) => {
            if elems.len() != *len {
                return Err(format!(
                    "fixed array length mismatch: expected {len}, got {}",
                    elems.len()
                ));
            }
            let dyn_elems: Result<Vec<_>, _> =
                elems.iter().map(|e| to_dyn_value(e, inner)).collect();
            Ok(DynSolValue::FixedArray(dyn_elems?))
        }

        (AbiValue::Tuple(fields), DynSolType::Tuple(types)) => {
            if fields.len() != types.len() {
                return Err(format!(
                    "tuple arity mismatch: expected {}, got {}",
                    types.len(),
                    fields.len()
                ));
            }
            let dyn_elems: Result<Vec<_>, _> = fields
                .iter()
                .zip(types.iter())
                .map(|(v, t)| to_dyn_value(v, t))
                .collect();
            Ok(DynSolValue::Tuple(dyn_elems?))
        }

        _ => Err(format!(
            "cannot convert {val} to {}",
            expected.sol_type_name()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_uint256_small() {
        let v = normalize(DynSolValue::Uint(U256::from(42u64), 256));
        assert_eq!(v, AbiValue::Uint(42));
    }

    #[test]
    fn normalize_uint256_wide() {
        let wide = U256::MAX;
        let v = normalize(DynSolValue::Uint(wide, 256));
        assert_eq!(v, AbiValue::BigUint(wide.to_string()));
    }

    #[test]
    fn normalize_address_checksummed() {
        let addr: Address = "0xd8da6bf26964af9d7eed9e03e53415d37aa96045".parse().unwrap();
        let v = normalize(DynSolValue::Address(addr));
        assert_eq!(
            v,
            AbiValue::Address("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045".into())
        );
    }

    #[test]
    fn normalize_fixed_bytes_truncates_to_width() {
        let v = normalize(DynSolValue::FixedBytes(FixedBytes::from([0xab; 32]), 4));
        assert_eq!(v, AbiValue::Bytes(vec![0xab; 4]));
    }

    #[test]
    fn to_dyn_rejects_mismatched_type() {
        let err = to_dyn_value(&AbiValue::Bool(true), &DynSolType::Address).unwrap_err();
        assert!(err.contains("cannot convert"));
    }

    #[test]
    fn roundtrip_array_of_addresses() {
        let ty = DynSolType::Array(Box::new(DynSolType::Address));
        let original = AbiValue::Array(vec![
            AbiValue::Address("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045".into()),
            AbiValue::Address("0xAb5801a7D398351b8bE11C439e05C5B3259aeC9B".into()),
        ]);
        let dyn_val = to_dyn_value(&original, &ty).unwrap();
        assert_eq!(normalize(dyn_val), original);
    }
}
