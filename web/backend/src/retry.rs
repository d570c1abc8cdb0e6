use artistgraph_core::SourceError;
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Self::default()
        }
    }

    /// Delay before retry number `attempt` (1-based). A server supplied
    /// `Retry-After` wins over the computed backoff.
    pub fn delay_for(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        if let Some(wait) = retry_after {
            return wait.min(self.max_delay);
        }
        let exponent = attempt.saturating_sub(1).min(16);
        let backoff = self.base_delay.saturating_mul(1 << exponent).min(self.max_delay);
        backoff + jitter(backoff)
    }

    /// Runs `operation` until it succeeds, fails fatally or the attempts
    /// run out. The last transient error is returned when they do.
    pub async fn run<T, F, Fut>(&self, what: &str, mut operation: F) -> Result<T, SourceError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, SourceError>>,
    {
        let mut attempt = 1;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(SourceError::Transient {
                    message,
                    retry_after,
                }) if attempt < self.max_attempts => {
                    let delay = self.delay_for(attempt, retry_after);
                    warn!(
                        "{what} failed (attempt {attempt}/{}): {message}; retrying in {delay:?}",
                        self.max_attempts
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }
}

// Up to a quarter of the backoff, so parallel callers spread out.
fn jitter(backoff: Duration) -> Duration {
    let quarter = backoff.as_millis() as u64 / 4;
    if quarter == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::rng().random_range(0..=quarter))
}
