// handlers/mod.rs - HTTP handlers, split by security tier

use serde_json::{json, Map, Value};
use uuid::Uuid;

use axum::{extract::State, http::StatusCode, Json};

use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::state::AppState;

pub mod protected;
pub mod public;

/// Parse a path id; malformed ids are a client error, not a lookup miss
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request("Invalid id"))
}

/// Map a data-layer failure: lookups that found nothing become 404, anything
/// else a 500 carrying `message`.
pub(crate) fn db_failure(message: &'static str) -> impl Fn(DatabaseError) -> ApiError {
    move |err| match err {
        DatabaseError::NotFound(msg) => ApiError::not_found(msg),
        other => ApiError::internal(message, &other),
    }
}

/// Text value of a body field. `null` and absent are both `None`; non-string
/// scalars use their JSON text.
pub(crate) fn text_field(body: &Map<String, Value>, key: &str) -> Option<String> {
    match body.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// GET /health - process and database status
///
/// Expected Output:
/// ```json
/// { "status": "ok", "timestamp": "2026-01-01T00:00:00Z", "database": "ok" }
/// ```
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let now = chrono::Utc::now();

    match state.db.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "timestamp": now, "database": "ok" })),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "timestamp": now, "database": e.kind() })),
            )
        }
    }
}
