use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::repository::SoftDeletable;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Employee {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub name: String,
    /// Tax identification number (NPWP)
    #[serde(rename = "npwp")]
    #[sqlx(rename = "npwp")]
    pub tax_id: Option<String>,
    #[serde(rename = "alamat")]
    #[sqlx(rename = "alamat")]
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl SoftDeletable for Employee {
    const TABLE: &'static str = "employees";
    const NAME: &'static str = "Employee";
}
