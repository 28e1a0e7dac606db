use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

#[async_trait]
#[automock]
pub trait SocialRepository {
    async fn follower_ids_of(&self, user_id: Uuid) -> Result<Vec<Uuid>>;
}
