//! # chainmux-core
//!
//! Core types and primitives shared across all ChainMux crates: the
//! `Call` unit, the normalized `AbiValue` type, chain descriptors,
//! the retry policy, and the persistence trait.

pub mod call;
pub mod chain;
pub mod error;
pub mod retry;
pub mod store;
pub mod value;

pub use call::Call;
pub use chain::{ChainDescriptor, Explorer, NativeCurrency};
pub use error::{ConfigError, DecodeError, EncodeError, MetadataError};
pub use retry::{RetryConfig, RetryPolicy};
pub use store::{abi_cache_key, KvStore, MemoryStore};
pub use value::AbiValue;
