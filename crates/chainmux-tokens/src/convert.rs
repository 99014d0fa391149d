//! Coercions from decoded `AbiValue`s into the native types the token
//! wrappers return.

use chainmux_core::{error::DecodeError, AbiValue};
use chainmux_rpc::CallError;

fn mismatch(expected: &str, got: &AbiValue) -> CallError {
    DecodeError::AbiDecodeFailed {
        reason: format!("expected {expected}, got {got}"),
    }
    .into()
}

pub(crate) fn as_string(value: AbiValue) -> Result<String, CallError> {
    match value {
        AbiValue::Str(s) => Ok(s),
        other => Err(mismatch("string", &other)),
    }
}

/// Any integer variant, as a decimal string. Balances and supplies are
/// uint256 on the wire, so callers always get the wide representation.
pub(crate) fn as_decimal(value: AbiValue) -> Result<String, CallError> {
    value
        .as_decimal()
        .ok_or_else(|| mismatch("integer", &value))
}

pub(crate) fn as_u8(value: AbiValue) -> Result<u8, CallError> {
    match value {
        AbiValue::Uint(v) => u8::try_from(v).map_err(|_| mismatch("uint8", &AbiValue::Uint(v))),
        other => Err(mismatch("uint8", &other)),
    }
}

pub(crate) fn as_u64(value: AbiValue) -> Result<u64, CallError> {
    value.as_u64().ok_or_else(|| mismatch("uint64", &value))
}

pub(crate) fn as_bool(value: AbiValue) -> Result<bool, CallError> {
    value.as_bool().ok_or_else(|| mismatch("bool", &value))
}

pub(crate) fn as_address(value: AbiValue) -> Result<String, CallError> {
    match value {
        AbiValue::Address(a) => Ok(a),
        other => Err(mismatch("address", &other)),
    }
}

pub(crate) fn as_address_array(value: AbiValue) -> Result<Vec<String>, CallError> {
    match value {
        AbiValue::Array(items) => items.into_iter().map(as_address).collect(),
        other => Err(mismatch("address[]", &other)),
    }
}

pub(crate) fn as_decimal_array(value: AbiValue) -> Result<Vec<String>, CallError> {
    match value {
        AbiValue::Array(items) => items.into_iter().map(as_decimal).collect(),
        other => Err(mismatch("uint256[]", &other)),
    }
}

/// A decimal amount string as the narrowest `AbiValue` integer that
/// holds it. Anything wider than u128 rides as `BigUint` and is parsed
/// by the encoder.
pub(crate) fn amount(s: &str) -> AbiValue {
    match s.parse::<u128>() {
        Ok(v) => AbiValue::Uint(v),
        Err(_) => AbiValue::BigUint(s.to_string()),
    }
}

/// Sort key giving numeric order for decimal strings of any width.
pub(crate) fn decimal_key(s: &str) -> (usize, &str) {
    (s.len(), s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_widens_past_u128() {
        assert_eq!(amount("42"), AbiValue::Uint(42));
        let wide = "340282366920938463463374607431768211456"; // 2^128
        assert_eq!(amount(wide), AbiValue::BigUint(wide.into()));
    }

    #[test]
    fn decimal_key_orders_numerically() {
        let mut ids = vec!["100", "9", "23", "101"];
        ids.sort_by_key(|s| decimal_key(s));
        assert_eq!(ids, vec!["9", "23", "100", "101"]);
    }

    #[test]
    fn coercion_failures_are_decode_errors() {
        assert!(as_string(AbiValue::Bool(true)).is_err());
        assert!(as_u8(AbiValue::Uint(300)).is_err());
        assert_eq!(as_u8(AbiValue::Uint(18)).unwrap(), 18);
        assert_eq!(as_decimal(AbiValue::BigUint("99".into())).unwrap(), "99");
    }
}
