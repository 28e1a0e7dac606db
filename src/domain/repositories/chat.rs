use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::chat::{
    ChatChannelEntity, ChatMessageEntity, InsertChatMessageEntity,
};

#[async_trait]
#[automock]
pub trait ChatRepository {
    /// Delegates to the atomic `get_or_create_direct_channel` stored
    /// procedure so concurrent opens converge on one channel.
    async fn get_or_create_direct_channel(&self, user_a: Uuid, user_b: Uuid) -> Result<Uuid>;

    async fn find_channel(&self, channel_id: Uuid) -> Result<Option<ChatChannelEntity>>;

    async fn is_member(&self, channel_id: Uuid, user_id: Uuid) -> Result<bool>;

    /// Global channels oldest-first; the head is the canonical one.
    async fn list_global_channels(&self) -> Result<Vec<ChatChannelEntity>>;

    async fn create_global_channel(&self) -> Result<Uuid>;

    async fn migrate_messages(&self, from_channel: Uuid, to_channel: Uuid) -> Result<usize>;

    async fn delete_channel(&self, channel_id: Uuid) -> Result<()>;

    async fn insert_message(&self, message: InsertChatMessageEntity) -> Result<Uuid>;

    async fn touch_last_message(&self, channel_id: Uuid, at: DateTime<Utc>) -> Result<()>;

    async fn list_messages(
        &self,
        channel_id: Uuid,
        limit: i64,
        before_id: Option<Uuid>,
    ) -> Result<Vec<ChatMessageEntity>>;

    /// Marks peer messages in the channel as read for the reader.
    async fn mark_read(&self, channel_id: Uuid, reader_id: Uuid) -> Result<usize>;
}
