use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::audit_events::InsertAuditEventEntity;

#[async_trait]
#[automock]
pub trait AuditEventRepository {
    async fn append(&self, event: InsertAuditEventEntity) -> Result<()>;
}
