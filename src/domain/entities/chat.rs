use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::{chat_channels, chat_messages};

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = chat_channels)]
pub struct ChatChannelEntity {
    pub id: Uuid,
    pub type_: String,
    pub created_at: DateTime<Utc>,
    pub last_message_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = chat_messages)]
pub struct ChatMessageEntity {
    pub id: Uuid,
    pub channel_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = chat_messages)]
pub struct InsertChatMessageEntity {
    pub channel_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}
