mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::json;
use uuid::Uuid;

use staffdesk_api::auth::TokenKind;

#[tokio::test]
async fn login_requires_an_identifier() -> Result<()> {
    let app = common::lazy_app();
    let res = app
        .send(Method::POST, "/api/auth/login", None, Some(json!({ "password": "x" })))
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body, json!({ "error": "Email or username are required" }));
    assert!(res.cookie("refreshToken").is_none());
    Ok(())
}

#[tokio::test]
async fn register_requires_email_name_and_password() -> Result<()> {
    let app = common::lazy_app();
    let res = app
        .send(Method::POST, "/api/auth/register", None, Some(json!({ "email": "a@example.com" })))
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body, json!({ "error": "Email, name and password are required" }));
    Ok(())
}

#[tokio::test]
async fn refresh_without_cookie_is_unauthorized() -> Result<()> {
    let app = common::lazy_app();
    let res = app.send(Method::GET, "/api/auth/refresh-token", None, None).await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn refresh_rejects_access_token_in_cookie() -> Result<()> {
    let app = common::lazy_app();
    let access = app.token(1);
    let cookie = format!("refreshToken={access}");

    let res = app
        .send_with(Method::GET, "/api/auth/refresh-token", None, Some(&cookie), None)
        .await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body, json!({ "error": "Invalid refresh token" }));
    Ok(())
}

#[tokio::test]
async fn logout_expires_the_cookie() -> Result<()> {
    let app = common::lazy_app();
    let res = app.send(Method::GET, "/api/auth/logout", None, None).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, json!({ "message": "Logged out successfully" }));

    let header = res.set_cookie_header("refreshToken").expect("removal cookie");
    assert!(header.contains("Max-Age=0"), "{header}");
    assert!(header.contains("Path=/"), "{header}");

    let res = app
        .send_with(Method::GET, "/api/auth/logout", None, Some("refreshToken=abc"), None)
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.cookie("refreshToken").as_deref(), Some("refreshToken="));
    let header = res.set_cookie_header("refreshToken").expect("removal cookie");
    assert!(header.contains("Max-Age=0"), "{header}");
    Ok(())
}

#[tokio::test]
async fn update_password_checks_confirmation_first() -> Result<()> {
    let app = common::lazy_app();
    let uri = format!("/api/auth/update-password/{}", Uuid::new_v4());

    let res = app
        .send(
            Method::POST,
            &uri,
            None,
            Some(json!({ "oldPassword": "a", "newPassword": "b", "confirmPassword": "c" })),
        )
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["error"], "New password and confirm new password do not match");

    let res = app
        .send(Method::POST, &uri, None, Some(json!({ "oldPassword": "a" })))
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn forgot_password_requires_email() -> Result<()> {
    let app = common::lazy_app();
    let res = app
        .send(Method::POST, "/api/auth/forgot-password", None, Some(json!({})))
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body, json!({ "error": "Email is required" }));
    Ok(())
}

#[tokio::test]
async fn reset_password_rejects_non_reset_tokens() -> Result<()> {
    let app = common::lazy_app();
    let access = app.token(1);

    let res = app
        .send(
            Method::POST,
            "/api/auth/reset-password",
            None,
            Some(json!({ "token": access, "newPassword": "n", "confirmPassword": "n" })),
        )
        .await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn login_refresh_and_reset_round_trip() -> Result<()> {
    let Some(app) = common::db_app().await? else {
        return Ok(());
    };
    let email = common::unique_email("auth");

    let res = app
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "email": email, "password": "first-pass", "name": "Ayu", "npwp": "01.234" })),
        )
        .await?;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);
    assert_eq!(res.body["user"]["employee"]["name"], "Ayu");
    assert_eq!(res.body["user"]["employee"]["npwp"], "01.234");

    let res = app
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "email": email, "password": "x", "name": "Dup" })),
        )
        .await?;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.body, json!({ "error": "Email already exists" }));

    let res = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": email, "password": "wrong" })),
        )
        .await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body, json!({ "error": "Invalid Credentials" }));
    assert!(res.cookie("refreshToken").is_none());

    let res = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": email, "password": "first-pass" })),
        )
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    let access = res.body["accessToken"].as_str().expect("access token").to_string();
    let claims = app.state.tokens.verify(&access, TokenKind::Access)?;
    assert_eq!(claims.role, 1);

    let header = res.set_cookie_header("refreshToken").expect("refresh cookie");
    assert!(header.contains("HttpOnly"));
    assert!(header.contains("SameSite=Strict"));
    assert!(header.contains("Max-Age=604800"));
    let cookie = res.cookie("refreshToken").expect("refresh cookie");

    let res = app
        .send_with(Method::GET, "/api/auth/refresh-token", None, Some(&cookie), None)
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    let refreshed = res.body["accessToken"].as_str().expect("access token");
    assert_eq!(app.state.tokens.verify(refreshed, TokenKind::Access)?.sub, claims.sub);

    let res = app
        .send(Method::POST, "/api/auth/forgot-password", None, Some(json!({ "email": email })))
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    let link = {
        let sent = app.mailer.sent.lock().unwrap();
        let (to, link) = sent.last().expect("reset mail").clone();
        assert_eq!(to, email);
        link
    };
    assert_eq!(link.path(), "/reset-password");
    let token = link
        .query_pairs()
        .find(|(k, _)| k == "token")
        .map(|(_, v)| v.into_owned())
        .expect("token in link");

    let res = app
        .send(
            Method::POST,
            "/api/auth/reset-password",
            None,
            Some(json!({ "token": token, "newPassword": "second-pass", "confirmPassword": "second-pass" })),
        )
        .await?;
    assert_eq!(res.status, StatusCode::OK);

    let res = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": email, "password": "second-pass" })),
        )
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn forgot_password_for_unknown_email_is_404() -> Result<()> {
    let Some(app) = common::db_app().await? else {
        return Ok(());
    };
    let res = app
        .send(
            Method::POST,
            "/api/auth/forgot-password",
            None,
            Some(json!({ "email": common::unique_email("ghost") })),
        )
        .await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body, json!({ "error": "User not found" }));
    Ok(())
}
