//! # chainmux-connect
//!
//! The connection layer: wallet lifecycle as an explicit context
//! object, the chain-list registry, and explorer ABI fetching with
//! pluggable persistence.

mod backoff;

pub mod abi_cache;
pub mod controller;
pub mod error;
pub mod registry;
pub mod wallet;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use abi_cache::AbiCache;
pub use controller::{
    ConnectionController, ConnectionEvent, ConnectionState, DEFAULT_POLL_INTERVAL,
};
pub use error::ConnectError;
pub use registry::{ChainRegistry, CHAIN_LIST_URL};
pub use wallet::{WalletEvent, WalletProvider, WalletTransport};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
