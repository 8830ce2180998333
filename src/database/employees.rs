use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{DailyActivity, Employee};

/// Column values for insert/update; `None` leaves the column unchanged on update
#[derive(Debug, Clone, Default)]
pub struct EmployeeFields {
    pub name: Option<String>,
    pub tax_id: Option<String>,
    pub address: Option<String>,
}

pub async fn insert(pool: &PgPool, fields: EmployeeFields) -> Result<Employee, DatabaseError> {
    Ok(sqlx::query_as::<_, Employee>(
        "INSERT INTO employees (id, name, npwp, alamat, created_at)
         VALUES ($1, $2, $3, $4, now())
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(fields.name)
    .bind(fields.tax_id)
    .bind(fields.address)
    .fetch_one(pool)
    .await?)
}

/// Update a live employee. Returns `None` when it is absent or soft-deleted.
pub async fn update(pool: &PgPool, id: Uuid, fields: EmployeeFields) -> Result<Option<Employee>, DatabaseError> {
    Ok(sqlx::query_as::<_, Employee>(
        "UPDATE employees
         SET name = COALESCE($2, name),
             npwp = COALESCE($3, npwp),
             alamat = COALESCE($4, alamat),
             updated_at = now()
         WHERE id = $1 AND deleted_at IS NULL
         RETURNING *",
    )
    .bind(id)
    .bind(fields.name)
    .bind(fields.tax_id)
    .bind(fields.address)
    .fetch_optional(pool)
    .await?)
}

/// Live activities belonging to an employee, oldest first
pub async fn activities_of(pool: &PgPool, employee_id: Uuid) -> Result<Vec<DailyActivity>, DatabaseError> {
    Ok(sqlx::query_as::<_, DailyActivity>(
        "SELECT * FROM daily_activities
         WHERE employee_id = $1 AND deleted_at IS NULL
         ORDER BY created_at",
    )
    .bind(employee_id)
    .fetch_all(pool)
    .await?)
}
