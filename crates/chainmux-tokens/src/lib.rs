//! # chainmux-tokens
//!
//! Typed wrappers over the token standards: ERC-20, ERC-721, ERC-777,
//! and ERC-1155. Bulk operations prefer the aggregation engine when one
//! is bound and fall back to concurrent per-call reads; metadata
//! retrieval normalizes IPFS links and attaches token identity.

use thiserror::Error;

use chainmux_core::error::MetadataError;
use chainmux_rpc::CallError;

pub mod abis;
mod bulk;
mod convert;
pub mod erc1155;
pub mod erc20;
pub mod erc721;
pub mod erc777;
pub mod metadata;

pub use erc1155::{Erc1155, OwnerBalance};
pub use erc20::{Erc20, TokenSummary};
pub use erc721::Erc721;
pub use erc777::Erc777;
pub use metadata::{MetadataFetcher, TokenMetadata, DEFAULT_IPFS_GATEWAY};

/// Failure of a token operation that mixes contract reads with
/// metadata retrieval.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error(transparent)]
    Call(#[from] CallError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),
}
