//! # chainmux-multicall
//!
//! The call aggregation engine: turns N independent read calls into
//! ceil(N / batch_size) on-chain `aggregate` submissions against the
//! Multicall3 contract, preserving per-call result identity.

pub mod deployments;
pub mod engine;

pub use deployments::{address_for, MULTICALL3_ADDRESS};
pub use engine::{Multicall, DEFAULT_BATCH_SIZE};
