use chrono::NaiveDate;
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::vip_usage_daily;

#[derive(Debug, Clone, Selectable, Queryable)]
#[diesel(table_name = vip_usage_daily)]
pub struct VipUsageDailyEntity {
    pub user_id: Uuid,
    pub feature_key: String,
    pub day: NaiveDate,
    pub usage_count: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = vip_usage_daily)]
pub struct InsertVipUsageDailyEntity {
    pub user_id: Uuid,
    pub feature_key: String,
    pub day: NaiveDate,
    pub usage_count: i32,
}
