use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub remaining: i32,
    pub reset_at: DateTime<Utc>,
    pub retry_after_seconds: i64,
}

impl RateLimitDecision {
    /// Decision used when the remote counter is unreachable: allow and let
    /// the window reset immediately.
    pub fn fail_open(max: i32) -> Self {
        Self {
            allowed: true,
            remaining: max,
            reset_at: Utc::now(),
            retry_after_seconds: 0,
        }
    }
}

/// Typed denial so callers can tell the client when to retry.
#[derive(Debug, Error)]
#[error("Too many requests")]
pub struct RateLimitExceeded {
    pub retry_after_seconds: i64,
}
