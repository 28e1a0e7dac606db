use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{RunQueryDsl, insert_into, prelude::*, update};
use uuid::Uuid;

use crate::{
    domain::{
        entities::subscriptions::{
            AppSubscriptionEntity, InsertAppSubscriptionEntity, MarketplaceSubscriptionEntity,
        },
        repositories::subscriptions::SubscriptionRepository,
        value_objects::enums::subscription_statuses::SubscriptionStatus,
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{app_subscriptions, marketplace_subscriptions},
    },
};

pub struct SubscriptionPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl SubscriptionPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SubscriptionRepository for SubscriptionPostgres {
    async fn latest_entitling_app_subscription(
        &self,
        user_id: Uuid,
    ) -> Result<Option<AppSubscriptionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = app_subscriptions::table
            .filter(app_subscriptions::user_id.eq(user_id))
            .filter(app_subscriptions::status.eq_any(SubscriptionStatus::entitling()))
            .filter(
                app_subscriptions::valid_until
                    .is_null()
                    .or(app_subscriptions::valid_until.gt(Utc::now())),
            )
            .order(app_subscriptions::created_at.desc())
            .select(AppSubscriptionEntity::as_select())
            .first::<AppSubscriptionEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn latest_entitling_marketplace_subscription(
        &self,
        user_id: Uuid,
    ) -> Result<Option<MarketplaceSubscriptionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = marketplace_subscriptions::table
            .filter(marketplace_subscriptions::student_user_id.eq(user_id))
            .filter(marketplace_subscriptions::status.eq_any(SubscriptionStatus::entitling()))
            .order(marketplace_subscriptions::created_at.desc())
            .select(MarketplaceSubscriptionEntity::as_select())
            .first::<MarketplaceSubscriptionEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn insert_app_subscription(
        &self,
        insert_subscription_entity: InsertAppSubscriptionEntity,
    ) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(app_subscriptions::table)
            .values(&insert_subscription_entity)
            .returning(app_subscriptions::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }

    async fn extend_app_subscription(
        &self,
        subscription_id: Uuid,
        valid_until: DateTime<Utc>,
    ) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(app_subscriptions::table)
            .filter(app_subscriptions::id.eq(subscription_id))
            .set(app_subscriptions::valid_until.eq(Some(valid_until)))
            .execute(&mut conn)?;

        Ok(())
    }
}
