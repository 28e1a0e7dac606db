use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::error_reports::InsertErrorReportEntity;

#[async_trait]
#[automock]
pub trait ErrorReportRepository {
    async fn insert(&self, report: InsertErrorReportEntity) -> Result<Uuid>;
}
