// handlers/public/auth/register.rs - POST /api/auth/register handler

use axum::{extract::State, Json};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::hash_password;
use crate::database::users::{self, Registration};
use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::middleware::ApiResponse;
use crate::state::AppState;

use super::session::{start_session, user_summary};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub npwp: Option<String>,
    pub alamat: Option<String>,
}

/// POST /api/auth/register - create an account with its employee profile
///
/// Expected Input:
/// ```json
/// {
///   "email": "a@example.com",   // Required
///   "password": "secret",       // Required
///   "name": "Ayu",              // Required: employee name
///   "username": "ayu",          // Optional
///   "npwp": "01.234.567.8",     // Optional
///   "alamat": "Jl. Merdeka 1"   // Optional
/// }
/// ```
///
/// Expected Output: same shape as login, plus the `refreshToken` cookie.
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<RegisterRequest>,
) -> Result<(CookieJar, ApiResponse<Value>), ApiError> {
    let (Some(email), Some(password), Some(name)) = (
        present(body.email),
        present(body.password),
        present(body.name),
    ) else {
        return Err(ApiError::bad_request("Email, name and password are required"));
    };

    let existing = users::find_by_email(state.pool(), &email)
        .await
        .map_err(|e| ApiError::internal("Internal Server Error", &e))?;
    if existing.is_some() {
        return Err(ApiError::conflict("Email already exists"));
    }

    let password_hash = hash_password(&password).map_err(|e| ApiError::internal("Internal Server Error", &e))?;

    let registration = Registration {
        email,
        username: present(body.username),
        password_hash,
        name,
        tax_id: body.npwp,
        address: body.alamat,
    };

    let (user, employee) = users::register(state.pool(), registration)
        .await
        .map_err(|e| match e {
            DatabaseError::UniqueViolation(ref detail) if detail.contains("username") => {
                ApiError::conflict("Username already exists")
            }
            DatabaseError::UniqueViolation(_) => ApiError::conflict("Email already exists"),
            other => ApiError::internal("Internal Server Error", &other),
        })?;

    let (jar, access_token) = start_session(&state, jar, &user)?;
    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        jar,
        ApiResponse::success(json!({
            "accessToken": access_token,
            "user": user_summary(&user, Some(&employee)),
        })),
    ))
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
