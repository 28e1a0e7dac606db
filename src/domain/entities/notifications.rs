use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::notifications;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = notifications)]
pub struct NotificationEntity {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub sender_id: Option<Uuid>,
    pub type_: String,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub metadata: Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notifications)]
pub struct InsertNotificationEntity {
    pub recipient_id: Uuid,
    pub sender_id: Option<Uuid>,
    pub type_: String,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub metadata: Value,
    pub created_at: DateTime<Utc>,
}
