//! Retry loop for the connection layer's HTTP fetches, mirroring the
//! transport retry driver but over [`ConnectError`].

use std::future::Future;

use chainmux_core::RetryPolicy;

use crate::error::ConnectError;

pub(crate) async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    label: &str,
    mut op: F,
) -> Result<T, ConnectError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ConnectError>>,
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
            Err(e) => return Err(e),
        }
    }
}
