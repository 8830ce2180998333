use std::any::Any;

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method, StatusCode,
    },
    middleware::{from_fn, from_fn_with_state},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::auth::rbac::Resource;
use crate::handlers::{self, protected, public};
use crate::middleware::{authorize, log_request, require_bearer, RbacGate};
use crate::state::AppState;

/// The full application router
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security.cors_origins);

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api/auth", auth_routes())
        .nest("/api/employees", employee_routes())
        .nest("/api/activities", activity_routes())
        .merge(gated(&state, Resource::Products, product_routes()))
        .merge(gated(&state, Resource::Users, user_routes()))
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(log_request))
        .with_state(state)
}

/// Mount `routes` at `/api/<resource>` behind the bearer gate, then the RBAC gate
fn gated(state: &AppState, resource: Resource, routes: Router<AppState>) -> Router<AppState> {
    let gate = RbacGate::new(state.permissions.clone(), resource);
    let routes = routes
        .route_layer(from_fn_with_state(gate, authorize))
        .route_layer(from_fn_with_state(state.clone(), require_bearer));
    Router::new().nest(&format!("/api/{resource}"), routes)
}

fn auth_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/register", post(auth::register))
        .route("/refresh-token", get(auth::refresh))
        .route("/update-password/:id", post(auth::update_password))
        .route("/forgot-password", post(auth::forgot_password))
        .route("/reset-password", post(auth::reset_password))
}

fn employee_routes() -> Router<AppState> {
    use public::employees;

    Router::new()
        .route("/", get(employees::list).post(employees::create))
        .route(
            "/:id",
            get(employees::get).put(employees::update).delete(employees::delete),
        )
}

fn activity_routes() -> Router<AppState> {
    use public::activities;

    Router::new()
        .route("/", get(activities::list).post(activities::create))
        .route(
            "/:id",
            get(activities::get).put(activities::update).delete(activities::delete),
        )
}

fn product_routes() -> Router<AppState> {
    use protected::products;

    Router::new()
        .route("/", get(products::list).post(products::create))
        .route(
            "/:id",
            get(products::get).put(products::update).delete(products::delete),
        )
        .route("/:id/:key", delete(products::delete_meta))
}

fn user_routes() -> Router<AppState> {
    use protected::users;

    Router::new()
        .route("/", get(users::list))
        .route("/:id", get(users::get).put(users::update))
}

async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not Found" })))
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!(panic = %detail, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Something went wrong!" })),
    )
        .into_response()
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true)
}
