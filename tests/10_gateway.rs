mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use staffdesk_api::auth::TokenKind;

fn full_product() -> serde_json::Value {
    json!({
        "name": "Lamp",
        "description": "Desk lamp",
        "thumbnail": "lamp.png",
        "price": 12,
        "stock": 4
    })
}

#[tokio::test]
async fn unknown_route_is_json_404() -> Result<()> {
    let app = common::lazy_app();
    let res = app.send(Method::GET, "/api/nothing-here", None, None).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body, json!({ "error": "Not Found" }));
    Ok(())
}

#[tokio::test]
async fn health_reports_unreachable_database() -> Result<()> {
    let app = common::lazy_app();
    let res = app.send(Method::GET, "/health", None, None).await?;
    assert_eq!(res.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(res.body["status"], "degraded");
    Ok(())
}

#[tokio::test]
async fn products_require_bearer_token() -> Result<()> {
    let app = common::lazy_app();
    for (method, uri) in [
        (Method::GET, "/api/products"),
        (Method::GET, "/api/products/0b7a9a0e-6a4e-4f43-9a43-6b0f1ad2a0a1"),
        (Method::POST, "/api/products"),
        (Method::DELETE, "/api/products/0b7a9a0e-6a4e-4f43-9a43-6b0f1ad2a0a1/color"),
    ] {
        let res = app.send(method.clone(), uri, None, None).await?;
        assert_eq!(res.status, StatusCode::UNAUTHORIZED, "{method} {uri}");
        assert_eq!(res.body, json!({ "error": "Unauthorized" }));
    }
    Ok(())
}

#[tokio::test]
async fn expired_token_is_reported_as_expired() -> Result<()> {
    let app = common::lazy_app();
    let token = app.state.tokens.issue_at(
        TokenKind::Access,
        Uuid::new_v4(),
        "late@example.com",
        3,
        Utc::now() - Duration::hours(2),
    )?;

    let res = app.send(Method::GET, "/api/products", Some(&token), None).await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body, json!({ "error": "Unauthorized - Token Expired" }));
    Ok(())
}

#[tokio::test]
async fn malformed_and_wrong_kind_tokens_are_unauthorized() -> Result<()> {
    let app = common::lazy_app();
    let refresh = app
        .state
        .tokens
        .issue_refresh(Uuid::new_v4(), "a@example.com", 3)?;

    for token in ["not-a-jwt", refresh.as_str()] {
        let res = app.send(Method::GET, "/api/products", Some(token), None).await?;
        assert_eq!(res.status, StatusCode::UNAUTHORIZED);
        assert_eq!(res.body, json!({ "error": "Unauthorized" }));
    }
    Ok(())
}

#[tokio::test]
async fn staff_cannot_create_products() -> Result<()> {
    let app = common::lazy_app();
    let token = app.token(1);

    // A full body would be written if it got through; the gate must stop it first
    let res = app
        .send(Method::POST, "/api/products", Some(&token), Some(full_product()))
        .await?;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.body, json!({ "error": "Forbidden" }));
    Ok(())
}

#[tokio::test]
async fn staff_cannot_update_or_delete_products() -> Result<()> {
    let app = common::lazy_app();
    let token = app.token(1);
    let uri = format!("/api/products/{}", Uuid::new_v4());

    let res = app.send(Method::PUT, &uri, Some(&token), Some(full_product())).await?;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = app.send(Method::DELETE, &uri, Some(&token), None).await?;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn editor_passes_both_gates_and_reaches_validation() -> Result<()> {
    let app = common::lazy_app();
    let token = app.token(2);

    let res = app
        .send(Method::POST, "/api/products", Some(&token), Some(json!({ "name": "Lamp" })))
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["error"], "Description, Thumbnail, Price, Stock is Required");
    assert_eq!(res.body["violations"][0], json!({ "field": "description", "rule": "required" }));
    Ok(())
}

#[tokio::test]
async fn users_resource_is_admin_only() -> Result<()> {
    let app = common::lazy_app();

    for role in [1, 2] {
        let token = app.token(role);
        let res = app.send(Method::GET, "/api/users", Some(&token), None).await?;
        assert_eq!(res.status, StatusCode::FORBIDDEN, "role {role}");
    }

    // Admin gets past the gates; the role value is validated before any query
    let token = app.token(3);
    let uri = format!("/api/users/{}", Uuid::new_v4());
    let res = app.send(Method::PUT, &uri, Some(&token), Some(json!({ "role": 7 }))).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn public_creates_validate_required_fields() -> Result<()> {
    let app = common::lazy_app();

    let res = app.send(Method::POST, "/api/employees", None, Some(json!({ "npwp": "1" }))).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["error"], "Name is Required");

    let res = app
        .send(Method::POST, "/api/activities", None, Some(json!({ "employee_id": null })))
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["error"], "Employee_id, Title is Required");
    Ok(())
}

#[tokio::test]
async fn malformed_ids_are_rejected() -> Result<()> {
    let app = common::lazy_app();
    let res = app.send(Method::GET, "/api/employees/42", None, None).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body, json!({ "error": "Invalid id" }));
    Ok(())
}
