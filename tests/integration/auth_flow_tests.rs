// ==================================
// tests/integration/auth_flow_tests.rs
// ==================================
//! Signup and login through the HTTP surface.
use axum::http::{Method, StatusCode};
use futures_util::future::join_all;
use serde_json::json;
use todo_backend_lib::storage::Storage;

use crate::test_utils::{TestApp, PASSWORD};

#[tokio::test]
async fn test_signup_returns_token_and_public_user() {
    let app = TestApp::memory();
    let res = app
        .call(
            Method::POST,
            "/signup",
            None,
            Some(json!({ "email": "alice@example.com", "password": PASSWORD, "displayName": "Alice" })),
        )
        .await;

    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["message"], "User created successfully");
    assert_eq!(res.body["user"]["email"], "alice@example.com");
    assert_eq!(res.body["user"]["displayName"], "Alice");
    assert!(res.body["user"].get("passwordHash").is_none());
    assert!(res.body["user"].get("password_hash").is_none());

    let token = res.body["token"].as_str().unwrap();
    let listed = app.call(Method::GET, "/todos", Some(token), None).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body, json!([]));
}

#[tokio::test]
async fn test_stored_password_is_hashed() {
    let app = TestApp::memory();
    app.signup("alice@example.com").await;

    let user = app
        .state
        .storage
        .find_user_by_email("alice@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_ne!(user.password_hash, PASSWORD);
    assert!(user.password_hash.starts_with("$scrypt$"));
}

#[tokio::test]
async fn test_duplicate_signup_rejected() {
    let app = TestApp::memory();
    app.signup("alice@example.com").await;

    let res = app
        .call(
            Method::POST,
            "/signup",
            None,
            Some(json!({ "email": "Alice@Example.com", "password": "another-one" })),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["code"], "DUP_001");
    assert_eq!(res.body["error"], "User with this email already exists");
}

#[tokio::test]
async fn test_signup_validation_errors() {
    let app = TestApp::memory();

    let cases = [
        (json!({ "email": "a@x.com" }), "Email and password are required"),
        (json!({ "password": PASSWORD }), "Email and password are required"),
        (json!({ "email": "a@x.com", "password": "12345" }), "Password must be at least 6 characters"),
    ];
    for (body, message) in cases {
        let res = app.call(Method::POST, "/signup", None, Some(body)).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert_eq!(res.body["code"], "VAL_001");
        assert_eq!(res.body["error"], message);
    }

    let res = app
        .call(
            Method::POST,
            "/signup",
            None,
            Some(json!({ "email": "no-at-sign", "password": PASSWORD })),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_json_is_a_validation_error() {
    let app = TestApp::memory();
    let res = app
        .call(Method::POST, "/login", None, Some(json!("just a string")))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["code"], "VAL_001");
}

#[tokio::test]
async fn test_login_round_trip() {
    let app = TestApp::memory();
    app.signup("alice@example.com").await;

    let res = app
        .call(
            Method::POST,
            "/login",
            None,
            Some(json!({ "email": "ALICE@example.com", "password": PASSWORD })),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["message"], "Login successful");
    assert_eq!(res.body["user"]["email"], "alice@example.com");

    let token = res.body["token"].as_str().unwrap();
    let listed = app.call(Method::GET, "/todos", Some(token), None).await;
    assert_eq!(listed.status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_failures_do_not_reveal_accounts() {
    let app = TestApp::memory();
    app.signup("alice@example.com").await;

    let wrong_password = app
        .call(
            Method::POST,
            "/login",
            None,
            Some(json!({ "email": "alice@example.com", "password": "not-the-password" })),
        )
        .await;
    let unknown_email = app
        .call(
            Method::POST,
            "/login",
            None,
            Some(json!({ "email": "nobody@example.com", "password": PASSWORD })),
        )
        .await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body, unknown_email.body);
    assert_eq!(wrong_password.body["error"], "Invalid email or password");
}

#[tokio::test]
async fn test_tampered_token_is_rejected() {
    let app = TestApp::memory();
    let token = app.signup("alice@example.com").await;

    // Swap the payload for someone else's while keeping the signature
    let other = app.signup("bob@example.com").await;
    let mut parts: Vec<&str> = token.split('.').collect();
    let other_payload = other.split('.').nth(1).unwrap();
    parts[1] = other_payload;
    let forged = parts.join(".");

    let res = app.call(Method::GET, "/todos", Some(&forged), None).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["code"], "AUTH_002");
}

#[tokio::test]
async fn test_concurrent_signups_admit_one_account() {
    let app = TestApp::memory();
    let attempts = (0..8).map(|_| {
        app.call(
            Method::POST,
            "/signup",
            None,
            Some(json!({ "email": "race@example.com", "password": PASSWORD })),
        )
    });

    let results = join_all(attempts).await;
    let created = results
        .iter()
        .filter(|r| r.status == StatusCode::CREATED)
        .count();
    let duplicates = results
        .iter()
        .filter(|r| r.status == StatusCode::BAD_REQUEST && r.body["code"] == "DUP_001")
        .count();

    assert_eq!(created, 1);
    assert_eq!(duplicates, 7);
}
