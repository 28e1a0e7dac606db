use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::profiles;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = profiles)]
pub struct ProfileEntity {
    pub id: Uuid,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub role: String,
    pub last_seen: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
