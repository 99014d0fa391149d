//! Bundled minimal ABIs for the supported token standards.
//!
//! Only the functions the wrappers actually invoke; anything beyond
//! that comes from an explorer-fetched ABI and a raw `ContractBinding`.

/// ERC-20 fungible token.
pub const ERC20: &str = r#"[
    {"name": "name", "type": "function", "inputs": [], "outputs": [{"name": "", "type": "string"}], "stateMutability": "view"},
    {"name": "symbol", "type": "function", "inputs": [], "outputs": [{"name": "", "type": "string"}], "stateMutability": "view"},
    {"name": "decimals", "type": "function", "inputs": [], "outputs": [{"name": "", "type": "uint8"}], "stateMutability": "view"},
    {"name": "totalSupply", "type": "function", "inputs": [], "outputs": [{"name": "", "type": "uint256"}], "stateMutability": "view"},
    {"name": "balanceOf", "type": "function", "inputs": [{"name": "owner", "type": "address"}], "outputs": [{"name": "", "type": "uint256"}], "stateMutability": "view"},
    {"name": "allowance", "type": "function", "inputs": [{"name": "owner", "type": "address"}, {"name": "spender", "type": "address"}], "outputs": [{"name": "", "type": "uint256"}], "stateMutability": "view"},
    {"name": "transfer", "type": "function", "inputs": [{"name": "to", "type": "address"}, {"name": "amount", "type": "uint256"}], "outputs": [{"name": "", "type": "bool"}], "stateMutability": "nonpayable"},
    {"name": "approve", "type": "function", "inputs": [{"name": "spender", "type": "address"}, {"name": "amount", "type": "uint256"}], "outputs": [{"name": "", "type": "bool"}], "stateMutability": "nonpayable"},
    {"name": "transferFrom", "type": "function", "inputs": [{"name": "from", "type": "address"}, {"name": "to", "type": "address"}, {"name": "amount", "type": "uint256"}], "outputs": [{"name": "", "type": "bool"}], "stateMutability": "nonpayable"}
]"#;

/// ERC-721 non-fungible token, including the enumeration extension.
pub const ERC721: &str = r#"[
    {"name": "balanceOf", "type": "function", "inputs": [{"name": "owner", "type": "address"}], "outputs": [{"name": "", "type": "uint256"}], "stateMutability": "view"},
    {"name": "ownerOf", "type": "function", "inputs": [{"name": "tokenId", "type": "uint256"}], "outputs": [{"name": "", "type": "address"}], "stateMutability": "view"},
    {"name": "tokenOfOwnerByIndex", "type": "function", "inputs": [{"name": "owner", "type": "address"}, {"name": "index", "type": "uint256"}], "outputs": [{"name": "", "type": "uint256"}], "stateMutability": "view"},
    {"name": "tokenURI", "type": "function", "inputs": [{"name": "tokenId", "type": "uint256"}], "outputs": [{"name": "", "type": "string"}], "stateMutability": "view"},
    {"name": "transferFrom", "type": "function", "inputs": [{"name": "from", "type": "address"}, {"name": "to", "type": "address"}, {"name": "tokenId", "type": "uint256"}], "outputs": [], "stateMutability": "nonpayable"},
    {"name": "approve", "type": "function", "inputs": [{"name": "to", "type": "address"}, {"name": "tokenId", "type": "uint256"}], "outputs": [], "stateMutability": "nonpayable"},
    {"name": "setApprovalForAll", "type": "function", "inputs": [{"name": "operator", "type": "address"}, {"name": "approved", "type": "bool"}], "outputs": [], "stateMutability": "nonpayable"},
    {"name": "isApprovedForAll", "type": "function", "inputs": [{"name": "owner", "type": "address"}, {"name": "operator", "type": "address"}], "outputs": [{"name": "", "type": "bool"}], "stateMutability": "view"}
]"#;

/// ERC-777 advanced fungible token.
pub const ERC777: &str = r#"[
    {"name": "name", "type": "function", "inputs": [], "outputs": [{"name": "", "type": "string"}], "stateMutability": "view"},
    {"name": "symbol", "type": "function", "inputs": [], "outputs": [{"name": "", "type": "string"}], "stateMutability": "view"},
    {"name": "granularity", "type": "function", "inputs": [], "outputs": [{"name": "", "type": "uint256"}], "stateMutability": "view"},
    {"name": "totalSupply", "type": "function", "inputs": [], "outputs": [{"name": "", "type": "uint256"}], "stateMutability": "view"},
    {"name": "balanceOf", "type": "function", "inputs": [{"name": "owner", "type": "address"}], "outputs": [{"name": "", "type": "uint256"}], "stateMutability": "view"},
    {"name": "defaultOperators", "type": "function", "inputs": [], "outputs": [{"name": "", "type": "address[]"}], "stateMutability": "view"},
    {"name": "isOperatorFor", "type": "function", "inputs": [{"name": "operator", "type": "address"}, {"name": "holder", "type": "address"}], "outputs": [{"name": "", "type": "bool"}], "stateMutability": "view"},
    {"name": "authorizeOperator", "type": "function", "inputs": [{"name": "operator", "type": "address"}], "outputs": [], "stateMutability": "nonpayable"},
    {"name": "revokeOperator", "type": "function", "inputs": [{"name": "operator", "type": "address"}], "outputs": [], "stateMutability": "nonpayable"},
    {"name": "send", "type": "function", "inputs": [{"name": "to", "type": "address"}, {"name": "amount", "type": "uint256"}, {"name": "data", "type": "bytes"}], "outputs": [], "stateMutability": "nonpayable"},
    {"name": "burn", "type": "function", "inputs": [{"name": "amount", "type": "uint256"}, {"name": "data", "type": "bytes"}], "outputs": [], "stateMutability": "nonpayable"}
]"#;

/// ERC-1155 multi-token.
pub const ERC1155: &str = r#"[
    {"name": "balanceOf", "type": "function", "inputs": [{"name": "owner", "type": "address"}, {"name": "id", "type": "uint256"}], "outputs": [{"name": "", "type": "uint256"}], "stateMutability": "view"},
    {"name": "balanceOfBatch", "type": "function", "inputs": [{"name": "owners", "type": "address[]"}, {"name": "ids", "type": "uint256[]"}], "outputs": [{"name": "", "type": "uint256[]"}], "stateMutability": "view"},
    {"name": "uri", "type": "function", "inputs": [{"name": "id", "type": "uint256"}], "outputs": [{"name": "", "type": "string"}], "stateMutability": "view"},
    {"name": "safeTransferFrom", "type": "function", "inputs": [{"name": "from", "type": "address"}, {"name": "to", "type": "address"}, {"name": "id", "type": "uint256"}, {"name": "amount", "type": "uint256"}, {"name": "data", "type": "bytes"}], "outputs": [], "stateMutability": "nonpayable"},
    {"name": "setApprovalForAll", "type": "function", "inputs": [{"name": "operator", "type": "address"}, {"name": "approved", "type": "bool"}], "outputs": [], "stateMutability": "nonpayable"},
    {"name": "isApprovedForAll", "type": "function", "inputs": [{"name": "owner", "type": "address"}, {"name": "operator", "type": "address"}], "outputs": [{"name": "", "type": "bool"}], "stateMutability": "view"}
]"#;
