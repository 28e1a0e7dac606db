use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into};
use uuid::Uuid;

use crate::{
    domain::{
        entities::error_reports::InsertErrorReportEntity,
        repositories::error_reports::ErrorReportRepository,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::error_reports},
};

pub struct ErrorReportPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl ErrorReportPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ErrorReportRepository for ErrorReportPostgres {
    async fn insert(&self, report: InsertErrorReportEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(error_reports::table)
            .values(&report)
            .returning(error_reports::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }
}
