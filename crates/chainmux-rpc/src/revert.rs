//! Revert payload decoding and error classification.
//!
//! A revert is a contract-level rejection — semantically final, never a
//! transient network condition. Classification prefers the structured
//! JSON-RPC error (code 3 per EIP-1474, or a server-error code carrying
//! revert bytes in `data`) and only falls back to matching the error
//! text when no structured signal is present.

use alloy_core::dyn_abi::{DynSolType, DynSolValue};
use serde_json::Value;

use crate::request::JsonRpcError;

/// The 4-byte selector for `Error(string)` — `require(cond, "message")`.
pub const ERROR_STRING_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];

/// The 4-byte selector for `Panic(uint256)` (Solidity >= 0.8).
pub const PANIC_SELECTOR: [u8; 4] = [0x4e, 0x48, 0x7b, 0x71];

/// JSON-RPC error code for execution errors (EIP-1474).
const EXECUTION_ERROR_CODE: i64 = 3;

/// Try to decode revert data as an `Error(string)` payload.
pub fn decode_error_string(data: &[u8]) -> Option<String> {
    if data.len() < 4 || data[..4] != ERROR_STRING_SELECTOR {
        return None;
    }
    match DynSolType::String.abi_decode(&data[4..]) {
        Ok(DynSolValue::String(s)) => Some(s),
        _ => None,
    }
}

/// Try to decode revert data as a `Panic(uint256)` payload.
pub fn decode_panic(data: &[u8]) -> Option<(u64, &'static str)> {
    if data.len() < 4 || data[..4] != PANIC_SELECTOR {
        return None;
    }
    match DynSolType::Uint(256).abi_decode(&data[4..]) {
        Ok(DynSolValue::Uint(v, _)) => {
            let code = v.to::<u64>();
            Some((code, panic_meaning(code)))
        }
        _ => None,
    }
}

/// Map a Solidity panic code to a description.
pub fn panic_meaning(code: u64) -> &'static str {
    match code {
        0x00 => "generic compiler-inserted panic",
        0x01 => "assert() called with false condition",
        0x11 => "arithmetic overflow or underflow",
        0x12 => "division or modulo by zero",
        0x21 => "invalid enum value",
        0x31 => ".pop() on empty array",
        0x32 => "out-of-bounds array access",
        0x41 => "too much memory allocated",
        _ => "unknown panic code",
    }
}

/// Human-readable reason from raw revert bytes, if recognizable.
pub fn revert_reason(data: &[u8]) -> Option<String> {
    if let Some(msg) = decode_error_string(data) {
        return Some(msg);
    }
    if let Some((code, meaning)) = decode_panic(data) {
        return Some(format!("panic 0x{code:02x}: {meaning}"));
    }
    None
}

/// Pull revert bytes out of a JSON-RPC error's `data` field.
///
/// Nodes ship this either as a bare hex string or nested under a
/// `"data"` key.
fn revert_bytes(data: &Value) -> Option<Vec<u8>> {
    let hex_str = match data {
        Value::String(s) => s.as_str(),
        Value::Object(map) => map.get("data")?.as_str()?,
        _ => return None,
    };
    let stripped = hex_str.strip_prefix("0x")?;
    hex::decode(stripped).ok()
}

/// Classify a JSON-RPC error: `Some(reason)` if it is a revert.
///
/// Returns `None` for everything else — those are treated as transient.
pub fn classify_revert(err: &JsonRpcError) -> Option<Option<String>> {
    // Structured: execution-error code always means a revert
    if err.code == EXECUTION_ERROR_CODE {
        let reason = err.data.as_ref().and_then(|d| revert_bytes(d)).and_then(|b| revert_reason(&b));
        return Some(reason.or_else(|| message_reason(&err.message)));
    }
    // Structured: server-error range carrying decodable revert bytes
    if (-32099..=-32000).contains(&err.code) {
        if let Some(bytes) = err.data.as_ref().and_then(revert_bytes) {
            if let Some(reason) = revert_reason(&bytes) {
                return Some(Some(reason));
            }
        }
    }
    // Fallback: text matching
    let lower = err.message.to_ascii_lowercase();
    if lower.contains("revert") {
        return Some(message_reason(&err.message));
    }
    None
}

/// Extract the reason string from `"execution reverted: <reason>"`.
fn message_reason(message: &str) -> Option<String> {
    message
        .split_once("reverted:")
        .map(|(_, r)| r.trim().to_string())
        .filter(|r| !r.is_empty())
}
