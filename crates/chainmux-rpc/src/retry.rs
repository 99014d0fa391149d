//! The async retry driver for transport operations.
//!
//! Drives any fallible async operation through a [`RetryPolicy`]:
//! transient failures sleep and retry, reverts propagate immediately.
//! Both the HTTP client and the connection layer's fetchers run their
//! network calls through this.

use std::future::Future;

use chainmux_core::RetryPolicy;

use crate::error::TransportError;

/// Run `op` until it succeeds, fails with a non-retryable error, or the
/// policy's retry budget is exhausted.
///
/// `label` identifies the operation in the retry logs (usually the RPC
/// method name or a URL).
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    label: &str,
    mut op: F,
) -> Result<T, TransportError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, TransportError>>,
{
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() => match policy.next_delay(attempt) {
                Some(delay) => {
                    tracing::warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        op = label,
                        "retrying after transient failure"
                    );
                    tokio::time::sleep(delay).await;
                }
                None => {
                    tracing::error!(attempt, error = %e, op = label, "retries exhausted");
                    return Err(e);
                }
            },
            // Revert — semantically final, propagated immediately
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainmux_core::RetryConfig;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    fn fast_policy(max: u32) -> RetryPolicy {
        RetryPolicy::new(RetryConfig::bounded(max, Duration::from_millis(1)))
    }

    #[tokio::test]
    async fn revert_is_never_retried() {
        let attempts = AtomicU32::new(0);
        let result: Result<(), _> = with_retry(&fast_policy(5), "test", || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async {
                Err(TransportError::Reverted {
                    reason: Some("nope".into()),
                })
            }
        })
        .await;

        assert!(matches!(result, Err(TransportError::Reverted { .. })));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn transient_failure_retried_until_success() {
        let attempts = AtomicU32::new(0);
        let result = with_retry(&fast_policy(5), "test", || {
            let n = attempts.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(TransportError::Timeout { ms: 10 })
                } else {
                    Ok(42u32)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn bounded_policy_gives_up() {
        let attempts = AtomicU32::new(0);
        let result: Result<(), _> = with_retry(&fast_policy(2), "test", || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(TransportError::Http("connection refused".into())) }
        })
        .await;

        assert!(matches!(result, Err(TransportError::Http(_))));
        // First try plus two retries
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }
}
