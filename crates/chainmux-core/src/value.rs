//! Canonical decoded-value representation.
//!
//! Every decoded contract-call result is normalized into `AbiValue` so
//! consumers never handle raw ABI words. Small integers use native Rust
//! types; anything wider than 128 bits is carried as a decimal string.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A decoded, normalized EVM value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum AbiValue {
    Uint(u128),
    /// Large uints (> u128) stored as decimal string
    BigUint(String),
    Int(i128),
    /// Large ints (> i128) stored as decimal string
    BigInt(String),
    Bool(bool),
    Bytes(Vec<u8>),
    Str(String),
    /// EVM address — 20 bytes, hex with 0x prefix (EIP-55 checksummed)
    Address(String),
    Array(Vec<AbiValue>),
    Tuple(Vec<AbiValue>),
    Null,
}

impl AbiValue {
    /// Returns `true` if this value is logically null/absent.
    pub fn is_null(&self) -> bool {
        matches!(self, AbiValue::Null)
    }

    /// Returns the inner string if this is an Address value.
    pub fn as_address(&self) -> Option<&str> {
        match self {
            AbiValue::Address(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Coerce to a u128 if this is a small Uint.
    pub fn as_u128(&self) -> Option<u128> {
        match self {
            AbiValue::Uint(v) => Some(*v),
            _ => None,
        }
    }

    /// Coerce to a u64 if this is a small Uint that fits.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            AbiValue::Uint(v) => u64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Returns the inner string if this is a Str value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AbiValue::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns the inner bool if this is a Bool value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AbiValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The decimal string form of any integer variant.
    ///
    /// Covers both narrow (`Uint`/`Int`) and wide (`BigUint`/`BigInt`)
    /// representations, which callers dealing in uint256 balances need
    /// to treat uniformly.
    pub fn as_decimal(&self) -> Option<String> {
        match self {
            AbiValue::Uint(v) => Some(v.to_string()),
            AbiValue::Int(v) => Some(v.to_string()),
            AbiValue::BigUint(s) | AbiValue::BigInt(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl fmt::Display for AbiValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbiValue::Uint(v) => write!(f, "{v}"),
            AbiValue::BigUint(v) => write!(f, "{v}"),
            AbiValue::Int(v) => write!(f, "{v}"),
            AbiValue::BigInt(v) => write!(f, "{v}"),
            AbiValue::Bool(v) => write!(f, "{v}"),
            AbiValue::Bytes(b) => write!(f, "0x{}", hex::encode(b)),
            AbiValue::Str(s) => write!(f, "{s}"),
            AbiValue::Address(a) => write!(f, "{a}"),
            AbiValue::Array(v) => {
                let parts: Vec<_> = v.iter().map(|x| x.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            AbiValue::Tuple(fields) => {
                let parts: Vec<_> = fields.iter().map(|v| v.to_string()).collect();
                write!(f, "({})", parts.join(", "))
            }
            AbiValue::Null => write!(f, "null"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_roundtrip() {
        let val = AbiValue::Address("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045".into());
        let json = serde_json::to_string(&val).unwrap();
        let back: AbiValue = serde_json::from_str(&json).unwrap();
        assert_eq!(val, back);
    }

    #[test]
    fn decimal_covers_wide_and_narrow() {
        assert_eq!(AbiValue::Uint(42).as_decimal().unwrap(), "42");
        assert_eq!(
            AbiValue::BigUint("340282366920938463463374607431768211456".into())
                .as_decimal()
                .unwrap(),
            "340282366920938463463374607431768211456"
        );
        assert!(AbiValue::Bool(true).as_decimal().is_none());
    }

    #[test]
    fn display_tuple() {
        let v = AbiValue::Tuple(vec![AbiValue::Uint(1), AbiValue::Bool(false)]);
        assert_eq!(v.to_string(), "(1, false)");
    }
}
