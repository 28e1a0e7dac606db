use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::profiles::ProfileEntity;

#[async_trait]
#[automock]
pub trait ProfileRepository {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<ProfileEntity>>;
    async fn find_role(&self, user_id: Uuid) -> Result<Option<String>>;
    async fn find_id_by_email(&self, email: &str) -> Result<Option<Uuid>>;
    async fn touch_last_seen(&self, user_id: Uuid) -> Result<()>;
}
