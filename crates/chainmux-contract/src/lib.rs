//! # chainmux-contract
//!
//! The contract proxy: binds an address, a parsed ABI, and a connection
//! (transport, optionally a signer) and exposes typed per-method reads
//! and writes, plus a builder that accumulates calls for the
//! aggregation engine.

pub mod binding;
pub mod builder;

pub use binding::ContractBinding;
pub use builder::CallBuilder;
