use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into};

use crate::{
    domain::{
        entities::audit_events::InsertAuditEventEntity,
        repositories::audit_events::AuditEventRepository,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::audit_events},
};

pub struct AuditEventPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl AuditEventPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl AuditEventRepository for AuditEventPostgres {
    async fn append(&self, event: InsertAuditEventEntity) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        insert_into(audit_events::table)
            .values(&event)
            .execute(&mut conn)?;

        Ok(())
    }
}
