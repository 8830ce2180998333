// handlers/public/auth/session.rs - login, logout and token refresh

use axum::{extract::State, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{verify_password, TokenKind};
use crate::database::models::{Employee, User};
use crate::database::users;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// Name of the HTTP-only cookie carrying the refresh token
pub const REFRESH_COOKIE: &str = "refreshToken";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// POST /api/auth/login - exchange credentials for tokens
///
/// Expected Input:
/// ```json
/// { "email": "a@example.com", "password": "secret" }
/// ```
/// `username` may be sent instead of `email`.
///
/// Expected Output:
/// ```json
/// {
///   "accessToken": "eyJhbGciOiJIUzI1NiI...",
///   "user": { "id": "uuid", "email": "a@example.com", "role": 1, "employee": { ... } }
/// }
/// ```
/// The refresh token is set as the `refreshToken` cookie.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<(CookieJar, ApiResponse<Value>), ApiError> {
    let email = non_empty(body.email.as_deref());
    let username = non_empty(body.username.as_deref());
    if email.is_none() && username.is_none() {
        return Err(ApiError::bad_request("Email or username are required"));
    }

    let user = users::find_by_login(state.pool(), email, username)
        .await
        .map_err(|e| ApiError::internal("Internal Server Error", &e))?;

    let password = body.password.as_deref().unwrap_or_default();
    let Some(user) = user.filter(|u| verify_password(password, &u.password)) else {
        tracing::info!(email = ?email, username = ?username, "Login rejected");
        return Err(ApiError::unauthorized("Invalid Credentials"));
    };

    let employee = users::find_profile(state.pool(), user.id)
        .await
        .map_err(|e| ApiError::internal("Internal Server Error", &e))?;

    let (jar, access_token) = start_session(&state, jar, &user)?;
    tracing::info!(user_id = %user.id, "User logged in");

    Ok((
        jar,
        ApiResponse::success(json!({
            "accessToken": access_token,
            "user": user_summary(&user, employee.as_ref()),
        })),
    ))
}

/// GET /api/auth/logout - clear the refresh cookie
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, ApiResponse<Value>) {
    let expired = refresh_cookie(String::new(), 0, state.config.security.secure_cookies);
    let jar = jar.add(expired);
    (jar, ApiResponse::message("Logged out successfully"))
}

/// GET /api/auth/refresh-token - mint a new access token from the refresh cookie
///
/// Expected Output:
/// ```json
/// { "accessToken": "eyJhbGciOiJIUzI1NiI..." }
/// ```
pub async fn refresh(State(state): State<AppState>, jar: CookieJar) -> ApiResult<Value> {
    let token = jar
        .get(REFRESH_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or_else(|| ApiError::unauthorized("Unauthorized"))?;

    let claims = state.tokens.verify(&token, TokenKind::Refresh).map_err(|e| {
        tracing::debug!(error = %e, "Refresh token rejected");
        ApiError::unauthorized("Invalid refresh token")
    })?;

    let user = users::find_by_id(state.pool(), claims.sub)
        .await
        .map_err(|e| ApiError::internal("Internal Server Error", &e))?;
    if user.is_none() {
        return Err(ApiError::unauthorized("Invalid refresh token"));
    }

    let access_token = state
        .tokens
        .access_from_refresh(&claims)
        .map_err(|e| ApiError::internal("Internal Server Error", &e))?;

    Ok(ApiResponse::success(json!({ "accessToken": access_token })))
}

/// Issue both tokens and attach the refresh cookie. Returns the access token.
pub(crate) fn start_session(state: &AppState, jar: CookieJar, user: &User) -> Result<(CookieJar, String), ApiError> {
    let access = state
        .tokens
        .issue_access(user.id, &user.email, user.role)
        .map_err(|e| ApiError::internal("Internal Server Error", &e))?;
    let refresh = state
        .tokens
        .issue_refresh(user.id, &user.email, user.role)
        .map_err(|e| ApiError::internal("Internal Server Error", &e))?;

    let cookie = refresh_cookie(refresh, state.tokens.refresh_ttl().num_seconds(), state.config.security.secure_cookies);
    Ok((jar.add(cookie), access))
}

fn refresh_cookie(token: String, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((REFRESH_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(secure)
        .max_age(time::Duration::seconds(max_age_secs))
        .build()
}

pub(crate) fn user_summary(user: &User, employee: Option<&Employee>) -> Value {
    json!({
        "id": user.id,
        "email": user.email,
        "role": user.role,
        "employee": employee,
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
