use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{
    RunQueryDsl, prelude::*, sql_query,
    sql_types::{BigInt, Bool, Integer, Text, Timestamptz},
};

use crate::{
    domain::{
        repositories::rate_limit::RateLimitRepository, value_objects::rate_limit::RateLimitDecision,
    },
    infrastructure::postgres::postgres_connection::PgPoolSquad,
};

#[derive(QueryableByName)]
struct RateLimitRow {
    #[diesel(sql_type = Bool)]
    allowed: bool,
    #[diesel(sql_type = Integer)]
    remaining: i32,
    #[diesel(sql_type = Timestamptz)]
    reset_at: DateTime<Utc>,
}

pub struct RateLimitPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl RateLimitPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl RateLimitRepository for RateLimitPostgres {
    async fn consume(&self, key: &str, max: i32, window_secs: i64) -> Result<RateLimitDecision> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        // The counter lives in a stored procedure so concurrent requests
        // across all backend processes hit one atomic increment.
        let row = sql_query(
            "SELECT allowed, remaining, reset_at FROM check_rate_limit($1, $2, $3)",
        )
        .bind::<Text, _>(key)
        .bind::<Integer, _>(max)
        .bind::<BigInt, _>(window_secs)
        .get_result::<RateLimitRow>(&mut conn)?;

        let retry_after_seconds = if row.allowed {
            0
        } else {
            (row.reset_at - Utc::now()).num_seconds().max(0)
        };

        Ok(RateLimitDecision {
            allowed: row.allowed,
            remaining: row.remaining,
            reset_at: row.reset_at,
            retry_after_seconds,
        })
    }
}
