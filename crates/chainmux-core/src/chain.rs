//! Chain descriptors.
//!
//! The serde layout matches the public chain-list JSON feed
//! (chainid.network), so descriptors deserialize straight out of it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker for template-variable RPC URLs in the chain-list feed,
/// e.g. `https://mainnet.infura.io/v3/${INFURA_API_KEY}`.
pub const RPC_TEMPLATE_MARKER: &str = "${";

/// The chain's native currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// One block-explorer endpoint for a chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explorer {
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard: Option<String>,
}

/// A chain descriptor: id, RPC endpoints, currency, explorers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainDescriptor {
    pub name: String,
    pub chain_id: u64,
    #[serde(default)]
    pub rpc: Vec<String>,
    pub native_currency: NativeCurrency,
    #[serde(default)]
    pub explorers: Vec<Explorer>,
}

impl ChainDescriptor {
    /// RPC endpoints with template-variable entries filtered out.
    pub fn usable_rpc(&self) -> Vec<&str> {
        self.rpc
            .iter()
            .filter(|u| !u.contains(RPC_TEMPLATE_MARKER))
            .map(|u| u.as_str())
            .collect()
    }

    /// The first explorer base URL, if any.
    pub fn explorer_url(&self) -> Option<&str> {
        self.explorers.first().map(|e| e.url.as_str())
    }
}

impl fmt::Display for ChainDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (chain {})", self.name, self.chain_id)
    }
}

/// Well-known chain descriptors for convenience.
pub mod chains {
    use super::*;

    fn descriptor(
        name: &str,
        chain_id: u64,
        rpc: &str,
        symbol: &str,
        explorer_name: &str,
        explorer: &str,
    ) -> ChainDescriptor {
        ChainDescriptor {
            name: name.into(),
            chain_id,
            rpc: vec![rpc.into()],
            native_currency: NativeCurrency {
                name: symbol.into(),
                symbol: symbol.into(),
                decimals: 18,
            },
            explorers: vec![Explorer {
                name: explorer_name.into(),
                url: explorer.into(),
                standard: Some("EIP3091".into()),
            }],
        }
    }

    pub fn ethereum() -> ChainDescriptor {
        descriptor("Ethereum Mainnet", 1, "https://cloudflare-eth.com", "ETH", "etherscan", "https://api.etherscan.io")
    }
    pub fn polygon() -> ChainDescriptor {
        descriptor("Polygon Mainnet", 137, "https://polygon-rpc.com", "POL", "polygonscan", "https://api.polygonscan.com")
    }
    pub fn arbitrum() -> ChainDescriptor {
        descriptor("Arbitrum One", 42161, "https://arb1.arbitrum.io/rpc", "ETH", "arbiscan", "https://api.arbiscan.io")
    }
    pub fn base() -> ChainDescriptor {
        descriptor("Base", 8453, "https://mainnet.base.org", "ETH", "basescan", "https://api.basescan.org")
    }
    pub fn optimism() -> ChainDescriptor {
        descriptor("OP Mainnet", 10, "https://mainnet.optimism.io", "ETH", "optimistic-etherscan", "https://api-optimistic.etherscan.io")
    }
    pub fn bsc() -> ChainDescriptor {
        descriptor("BNB Smart Chain", 56, "https://bsc-dataseed.binance.org", "BNB", "bscscan", "https://api.bscscan.com")
    }
}
