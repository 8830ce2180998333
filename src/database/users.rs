use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Employee, User};

const USER_COLUMNS: &str = "id, email, username, password, role, created_at, updated_at";

/// Profile fields captured at registration
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub username: Option<String>,
    pub password_hash: String,
    pub name: String,
    pub tax_id: Option<String>,
    pub address: Option<String>,
}

/// Admin-editable user fields; `None` leaves the column unchanged
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub role: Option<i32>,
}

/// Find a user by email or username, whichever was supplied
pub async fn find_by_login(
    pool: &PgPool,
    email: Option<&str>,
    username: Option<&str>,
) -> Result<Option<User>, DatabaseError> {
    let sql = format!(
        "SELECT {USER_COLUMNS} FROM users
         WHERE ($1::text IS NOT NULL AND email = $1)
            OR ($2::text IS NOT NULL AND username = $2)
         LIMIT 1"
    );
    Ok(sqlx::query_as::<_, User>(&sql)
        .bind(email)
        .bind(username)
        .fetch_optional(pool)
        .await?)
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, DatabaseError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
    Ok(sqlx::query_as::<_, User>(&sql)
        .bind(email)
        .fetch_optional(pool)
        .await?)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, DatabaseError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
    Ok(sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?)
}

pub async fn list(pool: &PgPool) -> Result<Vec<User>, DatabaseError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at");
    Ok(sqlx::query_as::<_, User>(&sql).fetch_all(pool).await?)
}

/// The live employee profile owned by a user, if any
pub async fn find_profile(pool: &PgPool, user_id: Uuid) -> Result<Option<Employee>, DatabaseError> {
    Ok(sqlx::query_as::<_, Employee>(
        "SELECT * FROM employees WHERE user_id = $1 AND deleted_at IS NULL LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?)
}

/// Create the user and its employee profile together
pub async fn register(pool: &PgPool, registration: Registration) -> Result<(User, Employee), DatabaseError> {
    let mut tx = pool.begin().await?;

    let sql = format!(
        "INSERT INTO users (id, email, username, password, role, created_at)
         VALUES ($1, $2, $3, $4, 1, now())
         RETURNING {USER_COLUMNS}"
    );
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(Uuid::new_v4())
        .bind(&registration.email)
        .bind(&registration.username)
        .bind(&registration.password_hash)
        .fetch_one(&mut *tx)
        .await?;

    let employee = sqlx::query_as::<_, Employee>(
        "INSERT INTO employees (id, user_id, name, npwp, alamat, created_at)
         VALUES ($1, $2, $3, $4, $5, now())
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(user.id)
    .bind(&registration.name)
    .bind(&registration.tax_id)
    .bind(&registration.address)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok((user, employee))
}

pub async fn update_password(pool: &PgPool, id: Uuid, password_hash: &str) -> Result<bool, DatabaseError> {
    let result = sqlx::query("UPDATE users SET password = $2, updated_at = now() WHERE id = $1")
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn update(pool: &PgPool, id: Uuid, changes: UserChanges) -> Result<Option<User>, DatabaseError> {
    let sql = format!(
        "UPDATE users
         SET username = COALESCE($2, username),
             role = COALESCE($3, role),
             updated_at = now()
         WHERE id = $1
         RETURNING {USER_COLUMNS}"
    );
    Ok(sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .bind(changes.username)
        .bind(changes.role)
        .fetch_optional(pool)
        .await?)
}
