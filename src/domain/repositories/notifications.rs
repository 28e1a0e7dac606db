use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::notifications::{InsertNotificationEntity, NotificationEntity};
use crate::domain::value_objects::pagination::Pagination;

#[async_trait]
#[automock]
pub trait NotificationRepository {
    async fn insert_many(&self, notifications: Vec<InsertNotificationEntity>) -> Result<usize>;

    async fn list_for_recipient(
        &self,
        recipient_id: Uuid,
        unread_only: bool,
        pagination: Pagination,
    ) -> Result<Vec<NotificationEntity>>;

    async fn mark_read(&self, recipient_id: Uuid, ids: Vec<Uuid>) -> Result<usize>;
}
