use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use serde_json::Value;

#[async_trait]
#[automock]
pub trait PlanRepository {
    /// JSON limits blob of an active plan, if the plan exists.
    async fn find_limits(&self, plan_id: &str) -> Result<Option<Value>>;
}
