//! Token metadata retrieval and normalization.
//!
//! Resolves a token URI over HTTP, rewrites `ipfs://` links to a
//! configurable gateway, and attaches the token id and source contract
//! to the parsed document.

use alloy_primitives::U256;
use chainmux_core::error::MetadataError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Default public IPFS gateway prefix.
pub const DEFAULT_IPFS_GATEWAY: &str = "https://ipfs.io/ipfs/";

/// ERC-1155 URI placeholder, substituted with the 64-hex token id.
const ID_PLACEHOLDER: &str = "{id}";

/// Normalized token metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenMetadata {
    /// Decimal token id
    pub token_id: String,
    /// Source contract address
    pub contract: String,
    pub name: Option<String>,
    pub description: Option<String>,
    /// Image URL, `ipfs://` already rewritten to the gateway
    pub image: Option<String>,
    /// The full document as returned by the server
    pub raw: Value,
}

/// Rewrite an `ipfs://` URI to a gateway URL. Other schemes pass
/// through untouched.
pub fn rewrite_ipfs(url: &str, gateway: &str) -> String {
    match url.strip_prefix("ipfs://") {
        // Some URIs carry a redundant "ipfs/" path segment after the scheme
        Some(rest) => format!("{gateway}{}", rest.strip_prefix("ipfs/").unwrap_or(rest)),
        None => url.to_string(),
    }
}

/// Substitute the ERC-1155 `{id}` placeholder with the token id as
/// 64 lowercase hex digits, per the standard's metadata URI rules.
pub fn substitute_id(uri: &str, token_id: &str) -> String {
    if !uri.contains(ID_PLACEHOLDER) {
        return uri.to_string();
    }
    let id = U256::from_str_radix(token_id, 10).unwrap_or(U256::ZERO);
    uri.replace(ID_PLACEHOLDER, &format!("{id:064x}"))
}

/// HTTP fetcher for token metadata documents.
#[derive(Clone)]
pub struct MetadataFetcher {
    http: reqwest::Client,
    gateway: String,
}

impl MetadataFetcher {
    pub fn new() -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .expect("failed to build HTTP client");
        Self {
            http,
            gateway: DEFAULT_IPFS_GATEWAY.into(),
        }
    }

    /// Override the IPFS gateway prefix, e.g. `"https://gw/ipfs/"`.
    pub fn with_gateway(mut self, prefix: impl Into<String>) -> Self {
        self.gateway = prefix.into();
        self
    }

    pub fn gateway(&self) -> &str {
        &self.gateway
    }

    /// Fetch and normalize the metadata document at `uri`.
    ///
    /// A non-success HTTP status is a `MetadataError::HttpStatus`; bulk
    /// callers surface the first failure rather than reporting partial
    /// success.
    pub async fn fetch(
        &self,
        contract: &str,
        token_id: &str,
        uri: &str,
    ) -> Result<TokenMetadata, MetadataError> {
        if uri.is_empty() {
            return Err(MetadataError::MissingUri {
                token_id: token_id.to_string(),
            });
        }
        let url = rewrite_ipfs(uri, &self.gateway);

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| MetadataError::Http(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(MetadataError::HttpStatus {
                status: status.as_u16(),
                url,
            });
        }

        let raw: Value = resp.json().await.map_err(|e| MetadataError::InvalidJson {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        Ok(self.normalize(contract, token_id, raw))
    }

    /// Attach identity fields and rewrite embedded IPFS links.
    pub fn normalize(&self, contract: &str, token_id: &str, raw: Value) -> TokenMetadata {
        let field = |key: &str| raw.get(key).and_then(Value::as_str).map(str::to_string);
        TokenMetadata {
            token_id: token_id.to_string(),
            contract: contract.to_string(),
            name: field("name"),
            description: field("description"),
            image: field("image").map(|u| rewrite_ipfs(&u, &self.gateway)),
            raw,
        }
    }
}

impl Default for MetadataFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ipfs_scheme_rewritten_to_gateway() {
        assert_eq!(
            rewrite_ipfs("ipfs://Qm123", "https://gw/ipfs/"),
            "https://gw/ipfs/Qm123"
        );
        assert_eq!(
            rewrite_ipfs("ipfs://ipfs/Qm123", "https://gw/ipfs/"),
            "https://gw/ipfs/Qm123"
        );
        assert_eq!(
            rewrite_ipfs("https://example.com/1.json", "https://gw/ipfs/"),
            "https://example.com/1.json"
        );
    }

    #[test]
    fn id_placeholder_substituted_as_64_hex() {
        assert_eq!(
            substitute_id("https://example.com/{id}.json", "255"),
            format!("https://example.com/{:064x}.json", 255)
        );
        // No placeholder: untouched
        assert_eq!(
            substitute_id("https://example.com/1.json", "255"),
            "https://example.com/1.json"
        );
    }

    #[test]
    fn normalize_rewrites_embedded_image() {
        let fetcher = MetadataFetcher::new().with_gateway("https://gw/ipfs/");
        let meta = fetcher.normalize(
            "0xabc",
            "7",
            json!({
                "name": "Token #7",
                "description": "test token",
                "image": "ipfs://Qm123"
            }),
        );
        assert_eq!(meta.token_id, "7");
        assert_eq!(meta.contract, "0xabc");
        assert_eq!(meta.name.as_deref(), Some("Token #7"));
        assert_eq!(meta.image.as_deref(), Some("https://gw/ipfs/Qm123"));
    }

    #[test]
    fn normalize_tolerates_missing_fields() {
        let meta = MetadataFetcher::new().normalize("0xabc", "1", json!({}));
        assert!(meta.name.is_none());
        assert!(meta.image.is_none());
    }

    #[tokio::test]
    async fn empty_uri_is_missing_uri() {
        let err = MetadataFetcher::new()
            .fetch("0xabc", "9", "")
            .await
            .unwrap_err();
        assert!(matches!(err, MetadataError::MissingUri { .. }));
    }
}
