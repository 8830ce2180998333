use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::DailyActivity;

#[derive(Debug, Clone, Default)]
pub struct ActivityFields {
    pub employee_id: Option<Uuid>,
    pub title: Option<String>,
    pub description: Option<String>,
}

pub async fn insert(pool: &PgPool, fields: ActivityFields) -> Result<DailyActivity, DatabaseError> {
    Ok(sqlx::query_as::<_, DailyActivity>(
        "INSERT INTO daily_activities (id, employee_id, title, description, created_at)
         VALUES ($1, $2, $3, $4, now())
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(fields.employee_id)
    .bind(fields.title)
    .bind(fields.description)
    .fetch_one(pool)
    .await?)
}

/// Update a live activity. Returns `None` when it is absent or soft-deleted.
pub async fn update(pool: &PgPool, id: Uuid, fields: ActivityFields) -> Result<Option<DailyActivity>, DatabaseError> {
    Ok(sqlx::query_as::<_, DailyActivity>(
        "UPDATE daily_activities
         SET employee_id = COALESCE($2, employee_id),
             title = COALESCE($3, title),
             description = COALESCE($4, description),
             updated_at = now()
         WHERE id = $1 AND deleted_at IS NULL
         RETURNING *",
    )
    .bind(id)
    .bind(fields.employee_id)
    .bind(fields.title)
    .bind(fields.description)
    .fetch_optional(pool)
    .await?)
}
