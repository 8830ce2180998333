use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::repository::SoftDeletable;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DailyActivity {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl SoftDeletable for DailyActivity {
    const TABLE: &'static str = "daily_activities";
    const NAME: &'static str = "Activity";
}
