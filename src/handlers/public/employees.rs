// handlers/public/employees.rs - /api/employees CRUD

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::database::employees::{self, EmployeeFields};
use crate::database::models::{DailyActivity, Employee};
use crate::database::Repository;
use crate::error::ApiError;
use crate::handlers::{db_failure, parse_id, text_field};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::validation::EMPLOYEE_CREATE;

/// Employee with its live activities, as returned by GET /api/employees/:id
#[derive(Debug, Serialize)]
pub struct EmployeeDetail {
    #[serde(flatten)]
    pub employee: Employee,
    pub daily_activities: Vec<DailyActivity>,
}

fn fields_from(body: &Map<String, Value>) -> EmployeeFields {
    EmployeeFields {
        name: text_field(body, "name"),
        tax_id: text_field(body, "npwp"),
        address: text_field(body, "alamat"),
    }
}

/// GET /api/employees - all live employees
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Employee>> {
    let rows = Repository::<Employee>::new(state.pool().clone())
        .select_live()
        .await
        .map_err(db_failure("Failed to fetch employees"))?;
    Ok(ApiResponse::success(rows))
}

/// GET /api/employees/:id - one employee with its activities
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<EmployeeDetail> {
    let id = parse_id(&id)?;
    let employee = Repository::<Employee>::new(state.pool().clone())
        .select_404(id)
        .await
        .map_err(db_failure("Failed to fetch employee"))?;
    let daily_activities = employees::activities_of(state.pool(), id)
        .await
        .map_err(db_failure("Failed to fetch employee"))?;

    Ok(ApiResponse::success(EmployeeDetail {
        employee,
        daily_activities,
    }))
}

/// POST /api/employees
///
/// Expected Input:
/// ```json
/// { "name": "Ayu", "npwp": "01.234.567.8", "alamat": "Jl. Merdeka 1" }
/// ```
pub async fn create(State(state): State<AppState>, Json(body): Json<Map<String, Value>>) -> ApiResult<Employee> {
    EMPLOYEE_CREATE.check(&body)?;

    let employee = employees::insert(state.pool(), fields_from(&body))
        .await
        .map_err(db_failure("Failed to create employee"))?;
    Ok(ApiResponse::created(employee))
}

/// PUT /api/employees/:id - omitted fields keep their values
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Map<String, Value>>,
) -> ApiResult<Employee> {
    let id = parse_id(&id)?;
    let employee = employees::update(state.pool(), id, fields_from(&body))
        .await
        .map_err(db_failure("Failed to update employee"))?
        .ok_or_else(|| ApiError::not_found("Employee not found"))?;
    Ok(ApiResponse::success(employee))
}

/// DELETE /api/employees/:id - soft delete
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Value> {
    let id = parse_id(&id)?;
    let deleted = Repository::<Employee>::new(state.pool().clone())
        .soft_delete(id)
        .await
        .map_err(db_failure("Failed to delete employee"))?;
    if !deleted {
        return Err(ApiError::not_found("Employee not found"));
    }
    Ok(ApiResponse::message("Employee deleted"))
}
