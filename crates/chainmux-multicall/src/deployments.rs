//! Known Multicall3 deployments.
//!
//! Multicall3 is deployed at the same address on effectively every
//! mainstream EVM chain via a deterministic deployer. Chains not in
//! this table need an explicit address override.

/// The canonical Multicall3 address shared across mainstream chains.
pub const MULTICALL3_ADDRESS: &str = "0xcA11bde05977b3631167028862bE2a173976CA11";

/// Chain ids known to carry the canonical Multicall3 deployment.
const DEPLOYED_CHAINS: &[u64] = &[
    1,        // Ethereum Mainnet
    10,       // OP Mainnet
    56,       // BNB Smart Chain
    100,      // Gnosis
    137,      // Polygon
    250,      // Fantom
    324,      // zkSync Era
    8453,     // Base
    42161,    // Arbitrum One
    42220,    // Celo
    43114,    // Avalanche C-Chain
    59144,    // Linea
    534352,   // Scroll
    11155111, // Sepolia
];

/// The Multicall3 address for a chain, if a deployment is known.
pub fn address_for(chain_id: u64) -> Option<&'static str> {
    DEPLOYED_CHAINS
        .contains(&chain_id)
        .then_some(MULTICALL3_ADDRESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mainstream_chains_covered() {
        for id in [1, 10, 56, 137, 8453, 42161] {
            assert_eq!(address_for(id), Some(MULTICALL3_ADDRESS));
        }
    }

    #[test]
    fn unknown_chain_has_no_address() {
        assert!(address_for(424242).is_none());
    }
}
