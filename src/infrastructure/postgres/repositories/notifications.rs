use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into, prelude::*, update};
use uuid::Uuid;

use crate::{
    domain::{
        entities::notifications::{InsertNotificationEntity, NotificationEntity},
        repositories::notifications::NotificationRepository,
        value_objects::pagination::Pagination,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::notifications},
};

pub struct NotificationPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl NotificationPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl NotificationRepository for NotificationPostgres {
    async fn insert_many(&self, entities: Vec<InsertNotificationEntity>) -> Result<usize> {
        if entities.is_empty() {
            return Ok(0);
        }
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let inserted = insert_into(notifications::table)
            .values(&entities)
            .execute(&mut conn)?;

        Ok(inserted)
    }

    async fn list_for_recipient(
        &self,
        recipient_id: Uuid,
        unread_only: bool,
        pagination: Pagination,
    ) -> Result<Vec<NotificationEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = notifications::table
            .filter(notifications::recipient_id.eq(recipient_id))
            .into_boxed();

        if unread_only {
            query = query.filter(notifications::read.eq(false));
        }

        let results = query
            .order(notifications::created_at.desc())
            .limit(pagination.limit)
            .offset(pagination.offset)
            .select(NotificationEntity::as_select())
            .load::<NotificationEntity>(&mut conn)?;

        Ok(results)
    }

    async fn mark_read(&self, recipient_id: Uuid, ids: Vec<Uuid>) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let updated = update(notifications::table)
            .filter(notifications::recipient_id.eq(recipient_id))
            .filter(notifications::id.eq_any(ids))
            .set(notifications::read.eq(true))
            .execute(&mut conn)?;

        Ok(updated)
    }
}
