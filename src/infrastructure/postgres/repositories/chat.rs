use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{
    Connection, RunQueryDsl, delete, insert_into, prelude::*, sql_query,
    sql_types::Uuid as SqlUuid, update,
};
use uuid::Uuid;

use crate::{
    domain::{
        entities::chat::{ChatChannelEntity, ChatMessageEntity, InsertChatMessageEntity},
        repositories::chat::ChatRepository,
        value_objects::enums::channel_types::ChannelType,
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{chat_channel_members, chat_channels, chat_messages},
    },
};

#[derive(QueryableByName)]
struct ChannelIdRow {
    #[diesel(sql_type = SqlUuid)]
    channel_id: Uuid,
}

pub struct ChatPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl ChatPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ChatRepository for ChatPostgres {
    async fn get_or_create_direct_channel(&self, user_a: Uuid, user_b: Uuid) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = sql_query("SELECT get_or_create_direct_channel($1, $2) AS channel_id")
            .bind::<SqlUuid, _>(user_a)
            .bind::<SqlUuid, _>(user_b)
            .get_result::<ChannelIdRow>(&mut conn)?;

        Ok(row.channel_id)
    }

    async fn find_channel(&self, channel_id: Uuid) -> Result<Option<ChatChannelEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = chat_channels::table
            .find(channel_id)
            .select(ChatChannelEntity::as_select())
            .first::<ChatChannelEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn is_member(&self, channel_id: Uuid, user_id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let membership = chat_channel_members::table
            .find((channel_id, user_id))
            .select(chat_channel_members::user_id)
            .first::<Uuid>(&mut conn)
            .optional()?;

        Ok(membership.is_some())
    }

    async fn list_global_channels(&self) -> Result<Vec<ChatChannelEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = chat_channels::table
            .filter(chat_channels::type_.eq(ChannelType::Global.to_string()))
            .order(chat_channels::created_at.asc())
            .select(ChatChannelEntity::as_select())
            .load::<ChatChannelEntity>(&mut conn)?;

        Ok(results)
    }

    async fn create_global_channel(&self) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(chat_channels::table)
            .values((
                chat_channels::id.eq(Uuid::new_v4()),
                chat_channels::type_.eq(ChannelType::Global.to_string()),
                chat_channels::created_at.eq(Utc::now()),
            ))
            .returning(chat_channels::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }

    async fn migrate_messages(&self, from_channel: Uuid, to_channel: Uuid) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let moved = update(chat_messages::table)
            .filter(chat_messages::channel_id.eq(from_channel))
            .set(chat_messages::channel_id.eq(to_channel))
            .execute(&mut conn)?;

        Ok(moved)
    }

    async fn delete_channel(&self, channel_id: Uuid) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        conn.transaction::<(), diesel::result::Error, _>(|conn| {
            delete(chat_channel_members::table)
                .filter(chat_channel_members::channel_id.eq(channel_id))
                .execute(conn)?;
            delete(chat_channels::table)
                .filter(chat_channels::id.eq(channel_id))
                .execute(conn)?;
            Ok(())
        })?;

        Ok(())
    }

    async fn insert_message(&self, message: InsertChatMessageEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(chat_messages::table)
            .values(&message)
            .returning(chat_messages::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }

    async fn touch_last_message(&self, channel_id: Uuid, at: DateTime<Utc>) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(chat_channels::table)
            .filter(chat_channels::id.eq(channel_id))
            .set(chat_channels::last_message_at.eq(Some(at)))
            .execute(&mut conn)?;

        Ok(())
    }

    async fn list_messages(
        &self,
        channel_id: Uuid,
        limit: i64,
        before_id: Option<Uuid>,
    ) -> Result<Vec<ChatMessageEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = chat_messages::table
            .filter(chat_messages::channel_id.eq(channel_id))
            .into_boxed();

        if let Some(before_id) = before_id {
            let anchor = chat_messages::table
                .find(before_id)
                .select(chat_messages::created_at)
                .first::<DateTime<Utc>>(&mut conn)
                .optional()?;
            if let Some(anchor) = anchor {
                query = query.filter(chat_messages::created_at.lt(anchor));
            }
        }

        let results = query
            .order(chat_messages::created_at.desc())
            .limit(limit)
            .select(ChatMessageEntity::as_select())
            .load::<ChatMessageEntity>(&mut conn)?;

        Ok(results)
    }

    async fn mark_read(&self, channel_id: Uuid, reader_id: Uuid) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let updated = update(chat_messages::table)
            .filter(chat_messages::channel_id.eq(channel_id))
            .filter(chat_messages::sender_id.ne(reader_id))
            .filter(chat_messages::is_read.eq(false))
            .set(chat_messages::is_read.eq(true))
            .execute(&mut conn)?;

        Ok(updated)
    }
}
