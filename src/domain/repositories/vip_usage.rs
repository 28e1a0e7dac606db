use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use mockall::automock;
use uuid::Uuid;

#[async_trait]
#[automock]
pub trait VipUsageRepository {
    async fn usage_on_day(&self, user_id: Uuid, feature_key: &str, day: NaiveDate) -> Result<i64>;
    /// Sum of daily usage counts from `from_day` (inclusive) to today.
    async fn usage_since(&self, user_id: Uuid, feature_key: &str, from_day: NaiveDate)
        -> Result<i64>;
    async fn increment(&self, user_id: Uuid, feature_key: &str, day: NaiveDate) -> Result<()>;
}
