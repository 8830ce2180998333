// handlers/public/activities.rs - /api/activities CRUD

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::database::activities::{self, ActivityFields};
use crate::database::models::{DailyActivity, Employee};
use crate::database::Repository;
use crate::error::ApiError;
use crate::handlers::{db_failure, parse_id, text_field};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::validation::ACTIVITY_CREATE;

/// Parse `employee_id` from the body and make sure it names a live employee
async fn live_employee_id(state: &AppState, body: &Map<String, Value>, context: &'static str) -> Result<Option<Uuid>, ApiError> {
    let Some(raw) = text_field(body, "employee_id") else {
        return Ok(None);
    };
    let id = Uuid::parse_str(&raw).map_err(|_| ApiError::bad_request("Invalid employee_id"))?;

    Repository::<Employee>::new(state.pool().clone())
        .select_one(id)
        .await
        .map_err(db_failure(context))?
        .ok_or_else(|| ApiError::not_found("Employee not found"))?;
    Ok(Some(id))
}

/// GET /api/activities - all live activities
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<DailyActivity>> {
    let rows = Repository::<DailyActivity>::new(state.pool().clone())
        .select_live()
        .await
        .map_err(db_failure("Failed to fetch activities"))?;
    Ok(ApiResponse::success(rows))
}

/// GET /api/activities/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<DailyActivity> {
    let id = parse_id(&id)?;
    let activity = Repository::<DailyActivity>::new(state.pool().clone())
        .select_404(id)
        .await
        .map_err(db_failure("Failed to fetch activity"))?;
    Ok(ApiResponse::success(activity))
}

/// POST /api/activities
///
/// Expected Input:
/// ```json
/// { "employee_id": "uuid", "title": "Stock count", "description": "Warehouse B" }
/// ```
pub async fn create(State(state): State<AppState>, Json(body): Json<Map<String, Value>>) -> ApiResult<DailyActivity> {
    ACTIVITY_CREATE.check(&body)?;
    let employee_id = live_employee_id(&state, &body, "Failed to create activity").await?;

    let fields = ActivityFields {
        employee_id,
        title: text_field(&body, "title"),
        description: text_field(&body, "description"),
    };
    let activity = activities::insert(state.pool(), fields)
        .await
        .map_err(db_failure("Failed to create activity"))?;
    Ok(ApiResponse::created(activity))
}

/// PUT /api/activities/:id - omitted fields keep their values
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Map<String, Value>>,
) -> ApiResult<DailyActivity> {
    let id = parse_id(&id)?;
    let employee_id = live_employee_id(&state, &body, "Failed to update activity").await?;

    let fields = ActivityFields {
        employee_id,
        title: text_field(&body, "title"),
        description: text_field(&body, "description"),
    };
    let activity = activities::update(state.pool(), id, fields)
        .await
        .map_err(db_failure("Failed to update activity"))?
        .ok_or_else(|| ApiError::not_found("Activity not found"))?;
    Ok(ApiResponse::success(activity))
}

/// DELETE /api/activities/:id - soft delete
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Value> {
    let id = parse_id(&id)?;
    let deleted = Repository::<DailyActivity>::new(state.pool().clone())
        .soft_delete(id)
        .await
        .map_err(db_failure("Failed to delete activity"))?;
    if !deleted {
        return Err(ApiError::not_found("Activity not found"));
    }
    Ok(ApiResponse::message("Activity deleted"))
}
