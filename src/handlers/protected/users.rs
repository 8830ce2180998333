// handlers/protected/users.rs - /api/users administration (admin tier via RBAC)

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::auth::rbac::{ROLE_ADMIN, ROLE_STAFF};
use crate::database::models::User;
use crate::database::users::{self, UserChanges};
use crate::error::ApiError;
use crate::handlers::{db_failure, parse_id};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub role: Option<i32>,
}

/// GET /api/users
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<User>> {
    let rows = users::list(state.pool())
        .await
        .map_err(db_failure("Failed to fetch users"))?;
    Ok(ApiResponse::success(rows))
}

/// GET /api/users/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<User> {
    let id = parse_id(&id)?;
    let user = users::find_by_id(state.pool(), id)
        .await
        .map_err(db_failure("Failed to fetch user"))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(ApiResponse::success(user))
}

/// PUT /api/users/:id - change username and/or role tier
///
/// Expected Input:
/// ```json
/// { "username": "ayu", "role": 2 }
/// ```
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateUserRequest>,
) -> ApiResult<User> {
    let id = parse_id(&id)?;
    if let Some(role) = body.role {
        if !(ROLE_STAFF..=ROLE_ADMIN).contains(&role) {
            return Err(ApiError::bad_request("Role must be 1, 2 or 3"));
        }
    }

    let changes = UserChanges {
        username: body.username,
        role: body.role,
    };
    let user = users::update(state.pool(), id, changes)
        .await
        .map_err(|e| match e {
            crate::database::DatabaseError::UniqueViolation(_) => ApiError::conflict("Username already exists"),
            other => db_failure("Failed to update user")(other),
        })?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    tracing::info!(user_id = %user.id, role = user.role, "User updated");
    Ok(ApiResponse::success(user))
}
