//! Registration, login, and current-user endpoints.

use axum::http::StatusCode;
use axum_extra::extract::cookie::SameSite;
use serde_json::json;

use crate::helpers::{EMAIL, PASSWORD, TestApp, test_config};

#[tokio::test]
async fn test_register_returns_id_without_hash() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/auth/register",
            Some(json!({
                "firstName": "sameer",
                "lastName": "kumar",
                "email": EMAIL,
                "password": PASSWORD,
            })),
            &[],
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    response.id();
    let text = response.body.to_string();
    assert!(!text.contains("argon2"));
    assert!(!text.contains(PASSWORD));
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = TestApp::new();
    app.register_default_user().await;

    let response = app
        .request(
            "POST",
            "/auth/register",
            Some(json!({
                "firstName": "other",
                "lastName": "person",
                "email": "SAMEER@example.com",
                "password": "an0ther-pass",
            })),
            &[],
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_type(), "DUPLICATE_USER");
}

#[tokio::test]
async fn test_register_overlong_name_is_a_field_error() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/auth/register",
            Some(json!({
                "firstName": "a".repeat(101),
                "lastName": "kumar",
                "email": EMAIL,
                "password": PASSWORD,
            })),
            &[],
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_type(), "VALIDATION");
    assert_eq!(response.body["errors"][0]["path"], "firstName");
}

#[tokio::test]
async fn test_register_validation_errors_name_fields() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/auth/register",
            Some(json!({
                "firstName": "  ",
                "lastName": "kumar",
                "email": "not-an-email",
                "password": "short",
            })),
            &[],
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let errors = response.body["errors"].as_array().unwrap();
    let paths: Vec<&str> = errors.iter().filter_map(|e| e["path"].as_str()).collect();
    assert_eq!(paths, vec!["email", "firstName", "password"]);
    assert!(errors.iter().all(|e| e["type"] == "VALIDATION"));
    assert!(errors.iter().all(|e| e["location"] == "body"));
}

#[tokio::test]
async fn test_login_sets_both_cookies_and_persists_one_record() {
    let app = TestApp::new();
    let user_id = app.register_default_user().await;

    let response = app.login_default_user().await;

    assert_eq!(response.id(), user_id);

    let access = response.cookie("accessToken").unwrap();
    assert!(!access.value().is_empty());
    assert_eq!(access.http_only(), Some(true));
    assert_eq!(access.secure(), Some(true));
    assert_eq!(access.same_site(), Some(SameSite::Strict));
    assert_eq!(access.path(), Some("/"));
    assert_eq!(access.max_age().map(|d| d.whole_seconds()), Some(60 * 60));

    let refresh = response.cookie("refreshToken").unwrap();
    assert!(!refresh.value().is_empty());
    assert_eq!(refresh.http_only(), Some(true));
    assert_eq!(
        refresh.max_age().map(|d| d.whole_seconds()),
        Some(365 * 24 * 60 * 60)
    );

    assert_eq!(app.active_refresh_tokens(user_id).await, 1);
}

#[tokio::test]
async fn test_login_trims_credentials() {
    let app = TestApp::new();
    app.register_default_user().await;

    let response = app
        .request(
            "POST",
            "/auth/login",
            Some(json!({ "email": "  sameer@example.com ", "password": " S3cret!pw " })),
            &[],
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_email_and_wrong_password_look_identical() {
    let app = TestApp::new();
    app.register_default_user().await;

    let unknown = app
        .request(
            "POST",
            "/auth/login",
            Some(json!({ "email": "nobody@example.com", "password": PASSWORD })),
            &[],
        )
        .await;
    let wrong = app
        .request(
            "POST",
            "/auth/login",
            Some(json!({ "email": EMAIL, "password": "wrong-password" })),
            &[],
        )
        .await;

    assert_eq!(unknown.status, StatusCode::BAD_REQUEST);
    assert_eq!(unknown.status, wrong.status);
    assert_eq!(unknown.body, wrong.body);
    assert_eq!(
        unknown.body["errors"][0]["msg"],
        "Email or password does not match."
    );
    assert!(unknown.cookies.is_empty());
    assert!(wrong.cookies.is_empty());
}

#[tokio::test]
async fn test_login_validation_failure() {
    let app = TestApp::new();

    let response = app
        .request("POST", "/auth/login", Some(json!({ "password": PASSWORD })), &[])
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(!response.body["errors"].as_array().unwrap().is_empty());
    assert_eq!(response.body["errors"][0]["path"], "email");
}

#[tokio::test]
async fn test_self_returns_profile() {
    let app = TestApp::new();
    let user_id = app.register_default_user().await;
    let login = app.login_default_user().await;
    let access = login.cookie_value("accessToken");

    let response = app
        .request("GET", "/auth/self", None, &[("accessToken", &access)])
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.id(), user_id);
    assert_eq!(response.body["firstName"], "sameer");
    assert_eq!(response.body["lastName"], "kumar");
    assert_eq!(response.body["email"], EMAIL);
    assert_eq!(response.body["role"], "customer");
    assert!(response.body.get("passwordHash").is_none());
}

#[tokio::test]
async fn test_self_without_cookie_is_unauthorized() {
    let app = TestApp::new();

    let response = app.request("GET", "/auth/self", None, &[]).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_type(), "UNAUTHORIZED");
}

#[tokio::test]
async fn test_self_with_tampered_token_is_unauthorized() {
    let app = TestApp::new();
    app.register_default_user().await;
    let login = app.login_default_user().await;
    let mut access = login.cookie_value("accessToken");
    access.push('x');

    let response = app
        .request("GET", "/auth/self", None, &[("accessToken", &access)])
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_type(), "UNAUTHORIZED");
}

#[tokio::test]
async fn test_self_with_expired_token_asks_for_refresh() {
    let mut config = test_config();
    config.auth.access_token_ttl_minutes = 0;
    let app = TestApp::with_config(config);
    app.register_default_user().await;
    let login = app.login_default_user().await;
    let access = login.cookie_value("accessToken");

    let response = app
        .request("GET", "/auth/self", None, &[("accessToken", &access)])
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_type(), "TOKEN_EXPIRED");
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();

    let response = app.request("GET", "/health", None, &[]).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}
