// handlers/public/auth/password.rs - password change, forgot and reset

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::auth::{hash_password, verify_password, TokenKind};
use crate::database::users;
use crate::error::ApiError;
use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::mailer;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub old_password: Option<String>,
    pub new_password: Option<String>,
    pub confirm_password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: Option<String>,
    pub new_password: Option<String>,
    pub confirm_password: Option<String>,
}

/// POST /api/auth/update-password/:id
///
/// Expected Input:
/// ```json
/// { "oldPassword": "old", "newPassword": "new", "confirmPassword": "new" }
/// ```
pub async fn update_password(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdatePasswordRequest>,
) -> ApiResult<Value> {
    let (Some(old_password), Some(new_password), Some(confirm_password)) =
        (body.old_password, body.new_password, body.confirm_password)
    else {
        return Err(ApiError::bad_request(
            "Old password, new password, and confirm new password are required",
        ));
    };
    check_confirmation(&new_password, &confirm_password)?;

    let id = parse_id(&id)?;
    let user = users::find_by_id(state.pool(), id)
        .await
        .map_err(|e| ApiError::internal("Internal Server Error", &e))?;

    let Some(user) = user.filter(|u| verify_password(&old_password, &u.password)) else {
        return Err(ApiError::unauthorized("Invalid old password"));
    };

    store_password(&state, user.id, &new_password).await?;
    tracing::info!(user_id = %user.id, "Password updated");
    Ok(ApiResponse::message("Password updated successfully"))
}

/// POST /api/auth/forgot-password - email a one-hour reset link
///
/// Expected Input:
/// ```json
/// { "email": "a@example.com" }
/// ```
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(body): Json<ForgotPasswordRequest>,
) -> ApiResult<Value> {
    let Some(email) = body.email.filter(|e| !e.trim().is_empty()) else {
        return Err(ApiError::bad_request("Email is required"));
    };

    let user = users::find_by_email(state.pool(), &email)
        .await
        .map_err(|e| ApiError::internal("Internal Server Error", &e))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let token = state
        .tokens
        .issue_reset(user.id, &user.email, user.role)
        .map_err(|e| ApiError::internal("Internal Server Error", &e))?;
    let link = mailer::reset_link(&state.config.mail.client_url, &token)
        .map_err(|e| ApiError::internal("Internal Server Error", &e))?;

    state
        .mailer
        .send_password_reset(&user.email, &link)
        .await
        .map_err(|e| ApiError::internal("Internal Server Error", &e))?;

    Ok(ApiResponse::message("Password reset link has been sent to your email"))
}

/// POST /api/auth/reset-password - set a new password with a reset token
///
/// Expected Input:
/// ```json
/// { "token": "eyJhbGciOiJIUzI1NiI...", "newPassword": "new", "confirmPassword": "new" }
/// ```
pub async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<ResetPasswordRequest>,
) -> ApiResult<Value> {
    let (Some(token), Some(new_password), Some(confirm_password)) =
        (body.token, body.new_password, body.confirm_password)
    else {
        return Err(ApiError::bad_request(
            "Token, new password, and confirm new password are required",
        ));
    };
    check_confirmation(&new_password, &confirm_password)?;

    let claims = state.tokens.verify(&token, TokenKind::Reset).map_err(|e| {
        tracing::debug!(error = %e, "Reset token rejected");
        ApiError::unauthorized("Invalid or expired token")
    })?;

    let user = users::find_by_id(state.pool(), claims.sub)
        .await
        .map_err(|e| ApiError::internal("Internal Server Error", &e))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    store_password(&state, user.id, &new_password).await?;
    tracing::info!(user_id = %user.id, "Password reset");
    Ok(ApiResponse::message("Password has been reset successfully"))
}

fn check_confirmation(new_password: &str, confirm_password: &str) -> Result<(), ApiError> {
    if new_password != confirm_password {
        return Err(ApiError::bad_request(
            "New password and confirm new password do not match",
        ));
    }
    Ok(())
}

async fn store_password(state: &AppState, user_id: uuid::Uuid, password: &str) -> Result<(), ApiError> {
    let hash = hash_password(password).map_err(|e| ApiError::internal("Internal Server Error", &e))?;
    users::update_password(state.pool(), user_id, &hash)
        .await
        .map_err(|e| ApiError::internal("Internal Server Error", &e))?;
    Ok(())
}
