use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MAX_MESSAGE_CHARS: usize = 2000;

#[derive(Debug, Clone, Deserialize)]
pub struct OpenDirectChannelModel {
    pub peer_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageModel {
    pub channel_id: Uuid,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageModel {
    pub id: Uuid,
    pub channel_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListMessagesFilter {
    pub channel_id: Uuid,
    pub limit: Option<i64>,
    pub before_id: Option<Uuid>,
}

impl Default for ListMessagesFilter {
    fn default() -> Self {
        Self {
            channel_id: Uuid::nil(),
            limit: None,
            before_id: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarkReadModel {
    pub channel_id: Uuid,
}
