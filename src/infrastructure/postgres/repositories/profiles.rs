use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{RunQueryDsl, prelude::*, update};
use uuid::Uuid;

use crate::{
    domain::{entities::profiles::ProfileEntity, repositories::profiles::ProfileRepository},
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::profiles},
};

pub struct ProfilePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl ProfilePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ProfileRepository for ProfilePostgres {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<ProfileEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = profiles::table
            .find(user_id)
            .select(ProfileEntity::as_select())
            .first::<ProfileEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn find_role(&self, user_id: Uuid) -> Result<Option<String>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = profiles::table
            .find(user_id)
            .select(profiles::role)
            .first::<String>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn find_id_by_email(&self, email: &str) -> Result<Option<Uuid>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = profiles::table
            .filter(profiles::email.eq(email))
            .select(profiles::id)
            .first::<Uuid>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn touch_last_seen(&self, user_id: Uuid) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(profiles::table)
            .filter(profiles::id.eq(user_id))
            .set(profiles::last_seen.eq(Some(Utc::now())))
            .execute(&mut conn)?;

        Ok(())
    }
}
