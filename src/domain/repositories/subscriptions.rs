use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::subscriptions::{
    AppSubscriptionEntity, InsertAppSubscriptionEntity, MarketplaceSubscriptionEntity,
};

#[async_trait]
#[automock]
pub trait SubscriptionRepository {
    /// Newest app-store subscription still granting entitlements
    /// (active, past_due or trialing).
    async fn latest_entitling_app_subscription(
        &self,
        user_id: Uuid,
    ) -> Result<Option<AppSubscriptionEntity>>;

    async fn latest_entitling_marketplace_subscription(
        &self,
        user_id: Uuid,
    ) -> Result<Option<MarketplaceSubscriptionEntity>>;

    async fn insert_app_subscription(
        &self,
        insert_subscription_entity: InsertAppSubscriptionEntity,
    ) -> Result<Uuid>;

    async fn extend_app_subscription(
        &self,
        subscription_id: Uuid,
        valid_until: DateTime<Utc>,
    ) -> Result<()>;
}
