use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, prelude::*};
use serde_json::Value;

use crate::{
    domain::repositories::plans::PlanRepository,
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::app_plans},
};

pub struct PlanPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PlanPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PlanRepository for PlanPostgres {
    async fn find_limits(&self, plan_id: &str) -> Result<Option<Value>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = app_plans::table
            .find(plan_id)
            .filter(app_plans::is_active.eq(true))
            .select(app_plans::limits)
            .first::<Value>(&mut conn)
            .optional()?;

        Ok(result)
    }
}
