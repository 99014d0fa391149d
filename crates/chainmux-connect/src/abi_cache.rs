//! `AbiCache` — explorer ABI fetching with key-value persistence.
//!
//! Entries are keyed `"{chainId}_{contractAddress}"` and invalidated
//! only by a forced refresh. Transport failures retry per policy
//! (unbounded fixed backoff by default); an unverified contract is a
//! permanent failure and surfaces immediately.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};

use chainmux_core::{
    error::ConfigError, store::abi_cache_key, ChainDescriptor, KvStore, RetryConfig, RetryPolicy,
};

use crate::backoff;
use crate::error::ConnectError;

/// The Etherscan-style `getabi` query for an explorer base URL.
pub fn getabi_url(explorer_base: &str, address: &str) -> String {
    format!(
        "{}/api?module=contract&action=getabi&address={}",
        explorer_base.trim_end_matches('/'),
        address
    )
}

#[derive(Debug, Deserialize)]
struct ExplorerResponse {
    status: String,
    #[serde(default)]
    message: String,
    result: String,
}

/// Parse an explorer `getabi` body: status `"1"` carries the ABI text
/// in `result`; anything else means the contract is not verified.
fn parse_getabi_response(url: &str, body: &str) -> Result<String, ConnectError> {
    let resp: ExplorerResponse =
        serde_json::from_str(body).map_err(|e| ConnectError::Parse {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    if resp.status != "1" {
        let message = if resp.message.is_empty() {
            resp.result
        } else {
            resp.message
        };
        return Err(ConnectError::Unverified { message });
    }

    // The result must itself be ABI JSON
    serde_json::from_str::<serde_json::Value>(&resp.result).map_err(|e| ConnectError::Parse {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    Ok(resp.result)
}

/// ABI fetcher with pluggable persistence.
pub struct AbiCache {
    http: reqwest::Client,
    store: Arc<dyn KvStore>,
    retry: RetryPolicy,
}

impl AbiCache {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .expect("failed to build HTTP client");
        Self {
            http,
            store,
            retry: RetryPolicy::default(),
        }
    }

    /// Override the fetch retry policy (unbounded fixed backoff by
    /// default).
    pub fn with_retry(mut self, config: RetryConfig) -> Self {
        self.retry = RetryPolicy::new(config);
        self
    }

    /// The ABI text for `address` on `chain`.
    ///
    /// Consults the store first unless `force` is set; a successful
    /// fetch is persisted (overwriting on forced refresh). A chain
    /// without an explorer endpoint fails fast before any I/O.
    pub async fn abi(
        &self,
        chain: &ChainDescriptor,
        address: &str,
        force: bool,
    ) -> Result<String, ConnectError> {
        let key = abi_cache_key(chain.chain_id, address);

        if !force {
            if let Some(cached) = self.store.get(&key) {
                debug!(key, "ABI cache hit");
                return Ok(cached);
            }
        }

        let explorer = chain
            .explorer_url()
            .ok_or(ConfigError::MissingExplorer {
                chain_id: chain.chain_id,
            })?;
        let url = getabi_url(explorer, address);

        let body = backoff::with_retry(&self.retry, "getabi", || self.fetch(&url)).await?;
        let abi = parse_getabi_response(&url, &body)?;

        self.store.put(&key, &abi);
        info!(chain_id = chain.chain_id, address, "ABI fetched and cached");
        Ok(abi)
    }

    async fn fetch(&self, url: &str) -> Result<String, ConnectError> {
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ConnectError::Http(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ConnectError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        resp.text().await.map_err(|e| ConnectError::Http(e.to_string()))
    }
}
