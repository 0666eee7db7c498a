// Bounded upstream calls - per-attempt timeout plus a fixed number of retries

use std::future::Future;
use std::time::Duration;

/// How long one upstream attempt may take and how often it is repeated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub timeout: Duration,
    pub max_retries: u32,
}

impl RetryPolicy {
    pub fn new(timeout: Duration, max_retries: u32) -> Self {
        Self { timeout, max_retries }
    }
}

/// Errors that know whether another attempt could succeed
pub trait Retryable: std::fmt::Display {
    fn is_retryable(&self) -> bool;

    fn timed_out(after: Duration) -> Self;
}

/// Run `op` until it succeeds, fails permanently, or runs out of retries
pub async fn with_retry<T, E, F, Fut>(what: &str, policy: RetryPolicy, mut op: F) -> Result<T, E>
where
    E: Retryable,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 0;
    loop {
        let outcome = match tokio::time::timeout(policy.timeout, op()).await {
            Ok(result) => result,
            Err(_) => Err(E::timed_out(policy.timeout)),
        };

        match outcome {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < policy.max_retries => {
                attempt += 1;
                tracing::warn!(%e, attempt, "{what} failed, retrying");
            }
            Err(e) => return Err(e),
        }
    }
}
