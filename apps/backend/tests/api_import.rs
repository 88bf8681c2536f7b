//! Bulk import and starter catalog API tests.
//!
//! These tests require a running PostgreSQL database.
//! Set DATABASE_URL environment variable before running.

mod common;

use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use practice_tracker_backend::services::seed;

use common::TestContext;

/// Test importing several problems at once.
#[tokio::test]
#[ignore = "requires database"]
async fn test_import_problems() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user(None).await;

    let response = server
        .post("/api/import/problems")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .json(&json!([
            { "title": "Two Sum", "difficulty": "easy" },
            { "title": "LRU Cache", "tags": ["linked-list"] },
        ]))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Two Sum", "LRU Cache"]);

    ctx.cleanup_user(user_id).await;
}

/// Test one invalid entry rejects the whole import.
#[tokio::test]
#[ignore = "requires database"]
async fn test_import_is_all_or_nothing() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user(None).await;
    let auth = TestContext::auth_header_value(&token);

    let response = server
        .post("/api/import/problems")
        .add_header(AUTHORIZATION, auth.clone())
        .json(&json!([
            { "title": "Two Sum" },
            { "title": "Broken", "url": "ftp://example.com/x" },
        ]))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let listed: Value = server
        .get("/api/problems")
        .add_header(AUTHORIZATION, auth)
        .await
        .json();
    assert!(listed.as_array().unwrap().is_empty());

    ctx.cleanup_user(user_id).await;
}

/// Test the starter catalog is inserted once.
#[tokio::test]
#[ignore = "requires database"]
async fn test_starter_import_is_idempotent() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user(None).await;
    let auth = TestContext::auth_header_value(&token);
    let expected = seed::starter_problems().unwrap().len();

    let first: Value = server
        .post("/api/import/starter")
        .add_header(AUTHORIZATION, auth.clone())
        .await
        .json();
    assert_eq!(first["inserted"].as_u64().unwrap() as usize, expected);

    let second: Value = server
        .post("/api/import/starter")
        .add_header(AUTHORIZATION, auth.clone())
        .await
        .json();
    assert_eq!(second["inserted"], 0);

    let lru: Value = server
        .get("/api/problems")
        .add_query_param("tag", "linked-list")
        .add_header(AUTHORIZATION, auth)
        .await
        .json();
    assert!(lru
        .as_array()
        .unwrap()
        .iter()
        .any(|p| p["title"] == "LRU Cache"));

    ctx.cleanup_user(user_id).await;
}

/// Test an empty import is rejected.
#[tokio::test]
#[ignore = "requires database"]
async fn test_import_empty_list() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user(None).await;

    let response = server
        .post("/api/import/problems")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .json(&json!([]))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "bad_request");

    ctx.cleanup_user(user_id).await;
}
