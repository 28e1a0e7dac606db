use diesel::prelude::*;
use serde_json::Value;

use crate::infrastructure::postgres::schema::app_plans;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = app_plans)]
pub struct AppPlanEntity {
    pub id: String,
    pub name: Option<String>,
    pub limits: Value,
    pub is_active: bool,
}
