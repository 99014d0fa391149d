//! `ChainRegistry` — load-once cache of the public chain-list feed.
//!
//! Descriptors load from the chainid.network JSON feed on first use and
//! stay cached until an explicit [`ChainRegistry::refresh`]. Template
//! RPC URLs (the `${API_KEY}` kind) are stripped at load time.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use tracing::{debug, info};

use chainmux_core::{
    chain::RPC_TEMPLATE_MARKER, error::ConfigError, ChainDescriptor, RetryConfig, RetryPolicy,
};

use crate::backoff;
use crate::error::ConnectError;

/// The public chain-list feed.
pub const CHAIN_LIST_URL: &str = "https://chainid.network/chains.json";

/// Strip template-variable RPC URLs from every descriptor.
fn sanitize(mut descriptors: Vec<ChainDescriptor>) -> Vec<ChainDescriptor> {
    for descriptor in &mut descriptors {
        descriptor.rpc.retain(|url| !url.contains(RPC_TEMPLATE_MARKER));
    }
    descriptors
}

/// Cache of chain descriptors keyed by chain id.
pub struct ChainRegistry {
    http: reqwest::Client,
    feed_url: String,
    cache: Arc<RwLock<HashMap<u64, ChainDescriptor>>>,
    loaded: AtomicBool,
    retry: RetryPolicy,
}

impl ChainRegistry {
    pub fn new() -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");
        Self {
            http,
            feed_url: CHAIN_LIST_URL.into(),
            cache: Arc::new(RwLock::new(HashMap::new())),
            loaded: AtomicBool::new(false),
            retry: RetryPolicy::default(),
        }
    }

    /// Point at a different feed (tests, mirrors).
    pub fn with_feed_url(mut self, url: impl Into<String>) -> Self {
        self.feed_url = url.into();
        self
    }

    /// Override the fetch retry policy (unbounded fixed backoff by
    /// default).
    pub fn with_retry(mut self, config: RetryConfig) -> Self {
        self.retry = RetryPolicy::new(config);
        self
    }

    /// Preload descriptors. A preloaded registry counts as loaded;
    /// call [`ChainRegistry::refresh`] to pull the live feed anyway.
    pub fn with_descriptors(self, descriptors: impl IntoIterator<Item = ChainDescriptor>) -> Self {
        {
            let mut cache = self.cache.write().unwrap();
            for descriptor in sanitize(descriptors.into_iter().collect()) {
                cache.insert(descriptor.chain_id, descriptor);
            }
        }
        self.loaded.store(true, Ordering::SeqCst);
        self
    }

    /// Number of cached descriptors.
    pub fn len(&self) -> usize {
        self.cache.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a chain descriptor, loading the feed once if the cache
    /// has never been filled.
    pub async fn descriptor(&self, chain_id: u64) -> Result<ChainDescriptor, ConnectError> {
        if let Some(descriptor) = self.cache.read().unwrap().get(&chain_id) {
            return Ok(descriptor.clone());
        }
        if !self.loaded.load(Ordering::SeqCst) {
            self.refresh().await?;
            if let Some(descriptor) = self.cache.read().unwrap().get(&chain_id) {
                return Ok(descriptor.clone());
            }
        }
        Err(ConfigError::UnknownChain { chain_id }.into())
    }

    /// Re-fetch the feed, replacing the cache. Returns the number of
    /// descriptors loaded.
    pub async fn refresh(&self) -> Result<usize, ConnectError> {
        let descriptors =
            backoff::with_retry(&self.retry, "chain-list", || self.fetch_feed()).await?;
        let descriptors = sanitize(descriptors);
        let count = descriptors.len();

        let mut cache = self.cache.write().unwrap();
        cache.clear();
        for descriptor in descriptors {
            cache.insert(descriptor.chain_id, descriptor);
        }
        drop(cache);

        self.loaded.store(true, Ordering::SeqCst);
        info!(count, "chain list loaded");
        Ok(count)
    }

    async fn fetch_feed(&self) -> Result<Vec<ChainDescriptor>, ConnectError> {
        debug!(url = %self.feed_url, "fetching chain list");
        let resp = self
            .http
            .get(&self.feed_url)
            .send()
            .await
            .map_err(|e| ConnectError::Http(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ConnectError::Status {
                status: status.as_u16(),
                url: self.feed_url.clone(),
            });
        }

        resp.json::<Vec<ChainDescriptor>>()
            .await
            .map_err(|e| ConnectError::Parse {
                url: self.feed_url.clone(),
                reason: e.to_string(),
            })
    }
}

impl Default for ChainRegistry {
    fn default() -> Self {
        Self::new()
    }
}
