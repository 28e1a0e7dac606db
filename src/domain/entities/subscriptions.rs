use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::{app_subscriptions, marketplace_subscriptions};

pub const ADMIN_GRANT_PROVIDER: &str = "admin_grant";

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = app_subscriptions)]
pub struct AppSubscriptionEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_id: String,
    pub provider: String,
    pub status: String,
    pub valid_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = app_subscriptions)]
pub struct InsertAppSubscriptionEntity {
    pub user_id: Uuid,
    pub plan_id: String,
    pub provider: String,
    pub status: String,
    pub valid_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = marketplace_subscriptions)]
pub struct MarketplaceSubscriptionEntity {
    pub id: Uuid,
    pub student_user_id: Uuid,
    pub plan_id: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
