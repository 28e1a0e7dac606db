use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::value_objects::rate_limit::RateLimitDecision;

#[async_trait]
#[automock]
pub trait RateLimitRepository {
    /// Atomically counts one hit for `key` inside the current window.
    /// Counting happens in the database so concurrent callers across
    /// processes share the same counter.
    async fn consume(&self, key: &str, max: i32, window_secs: i64) -> Result<RateLimitDecision>;
}
