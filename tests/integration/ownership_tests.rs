// ==================================
// tests/integration/ownership_tests.rs
// ==================================
//! Cross-account isolation of todos.
use axum::http::{Method, StatusCode};
use chrono::Utc;
use serde_json::json;

use crate::test_utils::TestApp;

#[tokio::test]
async fn test_todo_crud_for_owner() {
    let app = TestApp::memory();
    let token = app.signup("alice@example.com").await;

    let created = app
        .call(Method::POST, "/todos", Some(&token), Some(json!({ "text": "  write tests " })))
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["text"], "write tests");
    assert_eq!(created.body["completed"], false);
    assert!(created.body.get("owner_id").is_none());
    let id = created.body["id"].as_u64().unwrap();

    let fetched = app.call(Method::GET, &format!("/todos/{id}"), Some(&token), None).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body, created.body);

    let updated = app
        .call(
            Method::PUT,
            &format!("/todos/{id}"),
            Some(&token),
            Some(json!({ "completed": true })),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["completed"], true);
    assert_eq!(updated.body["text"], "write tests");

    let deleted = app.call(Method::DELETE, &format!("/todos/{id}"), Some(&token), None).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["message"], "Todo deleted successfully");

    let gone = app.call(Method::GET, &format!("/todos/{id}"), Some(&token), None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_client_supplied_owner_is_ignored() {
    let app = TestApp::memory();
    let alice = app.signup("alice@example.com").await;
    let bob = app.signup("bob@example.com").await;
    let bob_id = app
        .state
        .tokens
        .verify(&bob, Utc::now())
        .unwrap()
        .user_id()
        .unwrap();

    let created = app
        .call(
            Method::POST,
            "/todos",
            Some(&alice),
            Some(json!({ "text": "x", "owner_id": bob_id, "ownerId": bob_id })),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let id = created.body["id"].as_u64().unwrap();

    let bobs = app.call(Method::GET, "/todos", Some(&bob), None).await;
    assert_eq!(bobs.body, json!([]));
    let foreign = app.call(Method::GET, &format!("/todos/{id}"), Some(&bob), None).await;
    assert_eq!(foreign.status, StatusCode::NOT_FOUND);

    let alices = app.call(Method::GET, "/todos", Some(&alice), None).await;
    let alices = alices.body.as_array().unwrap();
    assert_eq!(alices.len(), 1);
    assert_eq!(alices[0]["id"], id);
    assert_eq!(alices[0]["text"], "x");
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let app = TestApp::memory();
    let token = app.signup("alice@example.com").await;
    let first = app.create_todo(&token, "first").await;
    let second = app.create_todo(&token, "second").await;

    let listed = app.call(Method::GET, "/todos", Some(&token), None).await;
    let ids: Vec<u64> = listed
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![second, first]);
}

#[tokio::test]
async fn test_foreign_todo_is_indistinguishable_from_missing() {
    let app = TestApp::memory();
    let alice = app.signup("alice@example.com").await;
    let bob = app.signup("bob@example.com").await;
    let id = app.create_todo(&alice, "alice only").await;
    let uri = format!("/todos/{id}");

    let missing = app.call(Method::GET, "/todos/999999", Some(&bob), None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let attempts = [
        app.call(Method::GET, &uri, Some(&bob), None).await,
        app.call(Method::PUT, &uri, Some(&bob), Some(json!({ "completed": true }))).await,
        app.call(Method::PUT, &uri, Some(&bob), Some(json!({}))).await,
        app.call(Method::DELETE, &uri, Some(&bob), None).await,
    ];
    for res in attempts {
        assert_eq!(res.status, StatusCode::NOT_FOUND);
        assert_eq!(res.body, missing.body);
    }

    let bobs = app.call(Method::GET, "/todos", Some(&bob), None).await;
    assert_eq!(bobs.body, json!([]));

    // Nothing happened to alice's todo
    let still = app.call(Method::GET, &uri, Some(&alice), None).await;
    assert_eq!(still.status, StatusCode::OK);
    assert_eq!(still.body["completed"], false);
}

#[tokio::test]
async fn test_non_numeric_id_is_not_found() {
    let app = TestApp::memory();
    let token = app.signup("alice@example.com").await;

    let res = app.call(Method::GET, "/todos/abc", Some(&token), None).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body["code"], "NF_001");
}

#[tokio::test]
async fn test_update_validation() {
    let app = TestApp::memory();
    let token = app.signup("alice@example.com").await;
    let id = app.create_todo(&token, "draft").await;
    let uri = format!("/todos/{id}");

    let empty = app.call(Method::PUT, &uri, Some(&token), Some(json!({}))).await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);
    assert_eq!(empty.body["error"], "No fields to update");

    let blank = app
        .call(Method::PUT, &uri, Some(&token), Some(json!({ "text": "   " })))
        .await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);
    assert_eq!(blank.body["error"], "Todo text cannot be empty");

    let missing_text = app.call(Method::POST, "/todos", Some(&token), Some(json!({}))).await;
    assert_eq!(missing_text.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing_text.body["error"], "Todo text is required");
}

#[tokio::test]
async fn test_bulk_delete_only_touches_caller() {
    let app = TestApp::memory();
    let alice = app.signup("alice@example.com").await;
    let bob = app.signup("bob@example.com").await;

    for token in [&alice, &bob] {
        for text in ["one", "two"] {
            let id = app.create_todo(token, text).await;
            let res = app
                .call(
                    Method::PUT,
                    &format!("/todos/{id}"),
                    Some(token),
                    Some(json!({ "completed": true })),
                )
                .await;
            assert_eq!(res.status, StatusCode::OK);
        }
        app.create_todo(token, "open").await;
    }

    let res = app
        .call(Method::DELETE, "/todos/completed/all", Some(&alice), None)
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["deleted"], 2);
    assert_eq!(res.body["message"], "2 completed todos deleted");

    let alices = app.call(Method::GET, "/todos", Some(&alice), None).await;
    assert_eq!(alices.body.as_array().unwrap().len(), 1);

    let bobs = app.call(Method::GET, "/todos", Some(&bob), None).await;
    let bobs = bobs.body.as_array().unwrap();
    assert_eq!(bobs.len(), 3);
    assert_eq!(bobs.iter().filter(|t| t["completed"] == true).count(), 2);

    // Nothing left to delete for alice
    let again = app
        .call(Method::DELETE, "/todos/completed/all", Some(&alice), None)
        .await;
    assert_eq!(again.body["deleted"], 0);
}
