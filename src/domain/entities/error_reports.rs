use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::error_reports;

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = error_reports)]
pub struct InsertErrorReportEntity {
    pub user_id: Uuid,
    pub message: String,
    pub stack: Option<String>,
    pub pathname: Option<String>,
    pub url: Option<String>,
    pub user_agent: Option<String>,
    pub app_version: Option<String>,
    pub source: String,
    pub category: String,
    pub severity: String,
    pub meta: Value,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
