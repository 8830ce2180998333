use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::rbac::{PermissionTable, Resource};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;

/// Layer state for one mounted resource
#[derive(Clone)]
pub struct RbacGate {
    pub table: Arc<PermissionTable>,
    pub resource: Resource,
}

impl RbacGate {
    pub fn new(table: Arc<PermissionTable>, resource: Resource) -> Self {
        Self { table, resource }
    }
}

/// Role check against the permission table. Must run inside `require_bearer`.
pub async fn authorize(
    State(gate): State<RbacGate>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| ApiError::unauthorized("Unauthorized"))?;

    if !gate.table.is_allowed(user.role, request.method(), gate.resource) {
        tracing::info!(
            user_id = %user.user_id,
            role = user.role,
            method = %request.method(),
            resource = %gate.resource,
            "RBAC denied request"
        );
        return Err(ApiError::forbidden("Forbidden"));
    }

    Ok(next.run(request).await)
}
