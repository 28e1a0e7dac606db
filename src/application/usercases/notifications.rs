use std::sync::Arc;

use anyhow::Result;
use uuid::Uuid;

use crate::domain::repositories::notifications::NotificationRepository;
use crate::domain::value_objects::notifications::{
    ListNotificationsFilter, MarkNotificationsReadModel, NotificationModel,
};
use crate::domain::value_objects::pagination::Pagination;

pub struct NotificationUseCase<N>
where
    N: NotificationRepository + Send + Sync + 'static,
{
    notification_repository: Arc<N>,
}

impl<N> NotificationUseCase<N>
where
    N: NotificationRepository + Send + Sync + 'static,
{
    pub fn new(notification_repository: Arc<N>) -> Self {
        Self {
            notification_repository,
        }
    }

    pub async fn list(
        &self,
        user_id: Uuid,
        filter: ListNotificationsFilter,
    ) -> Result<Vec<NotificationModel>> {
        let pagination = Pagination::clamped(filter.limit, filter.offset);
        let notifications = self
            .notification_repository
            .list_for_recipient(user_id, filter.unread_only.unwrap_or(false), pagination)
            .await?;

        Ok(notifications
            .into_iter()
            .map(|n| NotificationModel {
                id: n.id,
                recipient_id: n.recipient_id,
                sender_id: n.sender_id,
                notification_type: n.type_,
                title: n.title,
                message: n.message,
                read: n.read,
                metadata: n.metadata,
                created_at: n.created_at,
            })
            .collect())
    }

    /// Marks the given notifications as read for their recipient. Ids that do
    /// not belong to the caller are ignored by the repository.
    pub async fn mark_read(&self, user_id: Uuid, model: MarkNotificationsReadModel) -> Result<usize> {
        if model.ids.is_empty() {
            return Ok(0);
        }
        self.notification_repository
            .mark_read(user_id, model.ids)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::notifications::NotificationEntity;
    use crate::domain::repositories::notifications::MockNotificationRepository;
    use chrono::Utc;
    use serde_json::json;

    #[tokio::test]
    async fn list_clamps_pagination_and_maps_models() {
        let user_id = Uuid::new_v4();

        let mut repository = MockNotificationRepository::new();
        repository
            .expect_list_for_recipient()
            .withf(|_, unread_only, pagination| {
                *unread_only && pagination.limit == 200 && pagination.offset == 0
            })
            .returning(|recipient_id, _, _| {
                Box::pin(async move {
                    Ok(vec![NotificationEntity {
                        id: Uuid::new_v4(),
                        recipient_id,
                        sender_id: None,
                        type_: "friend_online".to_string(),
                        title: "Amigo online".to_string(),
                        message: "Rafa entrou no app.".to_string(),
                        read: false,
                        metadata: json!({}),
                        created_at: Utc::now(),
                    }])
                })
            });

        let listed = NotificationUseCase::new(Arc::new(repository))
            .list(
                user_id,
                ListNotificationsFilter {
                    unread_only: Some(true),
                    limit: Some(5000),
                    offset: Some(-3),
                },
            )
            .await
            .unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].notification_type, "friend_online");
    }

    #[tokio::test]
    async fn mark_read_with_no_ids_is_a_no_op() {
        let repository = MockNotificationRepository::new();
        let updated = NotificationUseCase::new(Arc::new(repository))
            .mark_read(Uuid::new_v4(), MarkNotificationsReadModel { ids: vec![] })
            .await
            .unwrap();
        assert_eq!(updated, 0);
    }
}
