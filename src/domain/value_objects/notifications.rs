use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

pub const FRIEND_ONLINE_TYPE: &str = "friend_online";

#[derive(Debug, Clone, Serialize)]
pub struct NotificationModel {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub sender_id: Option<Uuid>,
    pub notification_type: String,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub metadata: Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListNotificationsFilter {
    pub unread_only: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarkNotificationsReadModel {
    #[serde(default)]
    pub ids: Vec<Uuid>,
}
