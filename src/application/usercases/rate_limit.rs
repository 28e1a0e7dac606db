use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::repositories::rate_limit::RateLimitRepository;
use crate::domain::value_objects::rate_limit::RateLimitDecision;

/// Fail-open wrapper over the remote rate-limit counter: if the database
/// cannot be reached the action is allowed rather than blocked, trading
/// strict correctness for availability.
pub struct RateLimiter<R>
where
    R: RateLimitRepository + Send + Sync + 'static,
{
    rate_limit_repository: Arc<R>,
}

impl<R> RateLimiter<R>
where
    R: RateLimitRepository + Send + Sync + 'static,
{
    pub fn new(rate_limit_repository: Arc<R>) -> Self {
        Self {
            rate_limit_repository,
        }
    }

    pub async fn check(&self, key: &str, max: i32, window: Duration) -> RateLimitDecision {
        match self
            .rate_limit_repository
            .consume(key, max, window.as_secs() as i64)
            .await
        {
            Ok(decision) => {
                if !decision.allowed {
                    debug!(
                        key,
                        remaining = decision.remaining,
                        retry_after_seconds = decision.retry_after_seconds,
                        "rate_limit: denied"
                    );
                }
                decision
            }
            Err(err) => {
                warn!(key, error = %err, "rate_limit: counter unavailable, failing open");
                RateLimitDecision::fail_open(max)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::rate_limit::MockRateLimitRepository;
    use chrono::Utc;

    #[tokio::test]
    async fn passes_through_the_remote_decision() {
        let mut repository = MockRateLimitRepository::new();
        repository.expect_consume().returning(|_, _, _| {
            Box::pin(async {
                Ok(RateLimitDecision {
                    allowed: false,
                    remaining: 0,
                    reset_at: Utc::now(),
                    retry_after_seconds: 42,
                })
            })
        });

        let decision = RateLimiter::new(Arc::new(repository))
            .check("chat:send:u1", 30, Duration::from_secs(60))
            .await;

        assert!(!decision.allowed);
        assert_eq!(decision.retry_after_seconds, 42);
    }

    #[tokio::test]
    async fn fails_open_when_the_counter_errors() {
        let mut repository = MockRateLimitRepository::new();
        repository
            .expect_consume()
            .returning(|_, _, _| Box::pin(async { Err(anyhow::anyhow!("stored procedure missing")) }));

        let decision = RateLimiter::new(Arc::new(repository))
            .check("chat:send:u1", 30, Duration::from_secs(60))
            .await;

        assert!(decision.allowed);
        assert_eq!(decision.remaining, 30);
    }
}
