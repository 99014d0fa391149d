//! # chainmux-abi
//!
//! The ABI codec: signature-driven encode/decode of contract calls,
//! built on alloy's dynamic ABI machinery. Stateless and deterministic.

pub mod codec;
pub mod interface;
pub mod normalizer;

pub use codec::{collapse, decode_outputs, encode_call, parse_signature, selector};
pub use interface::AbiInterface;
