//! HTTP JSON-RPC client backed by `reqwest`.
//!
//! Features:
//! - Automatic retry with fixed backoff for transient errors
//!   (unbounded by default, bounded via `RetryConfig`)
//! - Reverts surfaced immediately, never retried
//! - Transaction submission methods sent exactly once

use async_trait::async_trait;
use std::time::Duration;

use chainmux_core::{RetryConfig, RetryPolicy};

use crate::error::TransportError;
use crate::request::{JsonRpcRequest, JsonRpcResponse};
use crate::retry::with_retry;
use crate::transport::{classify, RpcTransport};

/// Configuration for `HttpRpcClient`.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub retry: RetryConfig,
    pub request_timeout: Duration,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            retry: RetryConfig::default(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Methods that change chain state. Submitted exactly once — a
/// duplicate submission is unsafe.
fn is_write_method(method: &str) -> bool {
    matches!(method, "eth_sendTransaction" | "eth_sendRawTransaction")
}

/// HTTP JSON-RPC client with built-in retry.
pub struct HttpRpcClient {
    url: String,
    http: reqwest::Client,
    retry: RetryPolicy,
}

impl HttpRpcClient {
    /// Create a new client for the given JSON-RPC endpoint URL.
    pub fn new(url: impl Into<String>, config: HttpClientConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .expect("failed to build reqwest client");

        Self {
            url: url.into(),
            http,
            retry: RetryPolicy::new(config.retry),
        }
    }

    /// Create with default configuration (retry forever, 1s backoff).
    pub fn default_for(url: impl Into<String>) -> Self {
        Self::new(url, HttpClientConfig::default())
    }

    async fn send_once(&self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
        let resp = self
            .http
            .post(&self.url)
            .json(req)
            .send()
            .await
            .map_err(|e| TransportError::Http(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(TransportError::Http(format!("HTTP {status}: {body}")));
        }

        let mut resp: JsonRpcResponse = resp
            .json()
            .await
            .map_err(|e| TransportError::Http(e.to_string()))?;

        // A well-formed error response is classified here so reverts
        // escape the retry loop below.
        if let Some(err) = resp.error.take() {
            return Err(classify(err));
        }
        Ok(resp)
    }
}

#[async_trait]
impl RpcTransport for HttpRpcClient {
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
        if is_write_method(&req.method) {
            return self.send_once(&req).await;
        }

        with_retry(&self.retry, &req.method, || self.send_once(&req)).await
    }

    /// True HTTP batch: all requests as a JSON array in one round trip.
    async fn send_batch(
        &self,
        reqs: Vec<JsonRpcRequest>,
    ) -> Result<Vec<JsonRpcResponse>, TransportError> {
        if reqs.is_empty() {
            return Ok(vec![]);
        }

        let resp = self
            .http
            .post(&self.url)
            .json(&reqs)
            .send()
            .await
            .map_err(|e| TransportError::Http(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            return Err(TransportError::Http(format!("HTTP {status}")));
        }

        resp.json::<Vec<JsonRpcResponse>>()
            .await
            .map_err(|e| TransportError::Http(e.to_string()))
    }

    fn url(&self) -> &str {
        &self.url
    }
}
