use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, prelude::*};
use uuid::Uuid;

use crate::{
    domain::repositories::social::SocialRepository,
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::social_follows},
};

pub struct SocialPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl SocialPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SocialRepository for SocialPostgres {
    async fn follower_ids_of(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = social_follows::table
            .filter(social_follows::followed_id.eq(user_id))
            .select(social_follows::follower_id)
            .load::<Uuid>(&mut conn)?;

        Ok(results)
    }
}
