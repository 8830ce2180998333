use sqlx::{postgres::PgRow, FromRow, PgPool};
use uuid::Uuid;

use crate::database::manager::DatabaseError;

/// A table whose rows are hidden, not removed, by setting `deleted_at`.
pub trait SoftDeletable {
    const TABLE: &'static str;
    /// Human name used in 404 messages, e.g. "Employee"
    const NAME: &'static str;
}

/// Soft-delete aware reads and deletes shared by employees, activities and products.
pub struct Repository<T> {
    pool: PgPool,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Repository<T>
where
    T: for<'r> FromRow<'r, PgRow> + SoftDeletable + Send + Unpin,
{
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _phantom: std::marker::PhantomData,
        }
    }

    pub async fn select_live(&self) -> Result<Vec<T>, DatabaseError> {
        let sql = format!(
            "SELECT * FROM {} WHERE deleted_at IS NULL ORDER BY created_at",
            T::TABLE
        );
        Ok(sqlx::query_as::<_, T>(&sql).fetch_all(&self.pool).await?)
    }

    pub async fn select_one(&self, id: Uuid) -> Result<Option<T>, DatabaseError> {
        let sql = format!("SELECT * FROM {} WHERE id = $1 AND deleted_at IS NULL", T::TABLE);
        Ok(sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn select_404(&self, id: Uuid) -> Result<T, DatabaseError> {
        self.select_one(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("{} not found", T::NAME)))
    }

    /// Hide a live row. Returns false when the row is absent or already deleted.
    pub async fn soft_delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let sql = format!(
            "UPDATE {} SET deleted_at = now() WHERE id = $1 AND deleted_at IS NULL",
            T::TABLE
        );
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}
