use std::future::Future;
use std::time::Duration;

use crate::errors::TrendError;

/// Spacing and retry policy around every provider call.
///
/// After a success the pacer idles for `delay_after_success` so back-to-back
/// requests do not trip the provider's rate limiter. A rate-limited call gets
/// exactly one cooldown-then-retry; a second rate limit escalates to
/// `ProviderUnavailable`. Other errors pass through untouched.
#[derive(Debug, Clone)]
pub struct CallPacer {
    delay_after_success: Duration,
    cooldown: Duration,
}

impl CallPacer {
    pub fn new(delay_after_success: Duration, cooldown: Duration) -> Self {
        Self {
            delay_after_success,
            cooldown,
        }
    }

    /// Run `op` under the pacing policy. The closure is invoked at most
    /// twice, so a successful retry never duplicates work on top of a
    /// completed first attempt.
    pub async fn call<T, F, Fut>(&self, op: F) -> Result<T, TrendError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, TrendError>>,
    {
        match op().await {
            Ok(value) => {
                tokio::time::sleep(self.delay_after_success).await;
                Ok(value)
            }
            Err(TrendError::RateLimited) => {
                eprintln!("Rate limit hit, waiting {:?} before retry...", self.cooldown);
                tokio::time::sleep(self.cooldown).await;
                match op().await {
                    Ok(value) => {
                        tokio::time::sleep(self.delay_after_success).await;
                        Ok(value)
                    }
                    Err(TrendError::RateLimited) => Err(TrendError::ProviderUnavailable(
                        "still rate limited after cooldown retry".to_string(),
                    )),
                    Err(e) => Err(e),
                }
            }
            Err(e) => Err(e),
        }
    }
}
