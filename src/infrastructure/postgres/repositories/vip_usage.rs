use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::{RunQueryDsl, dsl::sum, insert_into, prelude::*};
use uuid::Uuid;

use crate::{
    domain::{
        entities::vip_usage::InsertVipUsageDailyEntity,
        repositories::vip_usage::VipUsageRepository,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::vip_usage_daily},
};

pub struct VipUsagePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl VipUsagePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl VipUsageRepository for VipUsagePostgres {
    async fn usage_on_day(&self, user_id: Uuid, feature_key: &str, day: NaiveDate) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = vip_usage_daily::table
            .find((user_id, feature_key, day))
            .select(vip_usage_daily::usage_count)
            .first::<i32>(&mut conn)
            .optional()?;

        Ok(i64::from(result.unwrap_or(0)))
    }

    async fn usage_since(
        &self,
        user_id: Uuid,
        feature_key: &str,
        from_day: NaiveDate,
    ) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = vip_usage_daily::table
            .filter(vip_usage_daily::user_id.eq(user_id))
            .filter(vip_usage_daily::feature_key.eq(feature_key))
            .filter(vip_usage_daily::day.ge(from_day))
            .select(sum(vip_usage_daily::usage_count))
            .first::<Option<i64>>(&mut conn)?;

        Ok(result.unwrap_or(0))
    }

    async fn increment(&self, user_id: Uuid, feature_key: &str, day: NaiveDate) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        insert_into(vip_usage_daily::table)
            .values(&InsertVipUsageDailyEntity {
                user_id,
                feature_key: feature_key.to_string(),
                day,
                usage_count: 1,
            })
            .on_conflict((
                vip_usage_daily::user_id,
                vip_usage_daily::feature_key,
                vip_usage_daily::day,
            ))
            .do_update()
            .set(vip_usage_daily::usage_count.eq(vip_usage_daily::usage_count + 1))
            .execute(&mut conn)?;

        Ok(())
    }
}
