/// Integration tests for the task API
///
/// These tests drive the full router end-to-end:
/// - Task lifecycle (create → update → delete)
/// - Ownership isolation between users
/// - Status validation
/// - Routing details (trailing slash, bad ids)

mod common;

use axum::http::{Method, StatusCode};
use chrono::{DateTime, Utc};
use common::TestContext;
use serde_json::json;

#[tokio::test]
async fn test_alice_scenario() {
    let ctx = TestContext::new().await.unwrap();
    let token = ctx.signup("alice", "pw1").await;

    let task = ctx.create_task(&token, "buy milk", "2 litres").await;
    assert_eq!(task["id"], 1);
    assert_eq!(task["status"], "pending");

    let response = ctx
        .send(ctx.request(
            Method::PUT,
            "/tasks/1",
            Some(&token),
            Some(json!({ "status": "completed" })),
        ))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "completed");

    let response = ctx
        .send(ctx.request(Method::DELETE, "/tasks/1", Some(&token), None))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "detail": "Task deleted" }));

    let response = ctx
        .send(ctx.request(Method::GET, "/tasks/1", Some(&token), None))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["detail"], "Task not found");
}

#[tokio::test]
async fn test_create_then_get() {
    let ctx = TestContext::new().await.unwrap();
    let token = ctx.signup("alice", "pw1").await;

    let created = ctx.create_task(&token, "write report", "quarterly numbers").await;
    let uri = format!("/tasks/{}", created["id"]);

    let response = ctx.send(ctx.request(Method::GET, &uri, Some(&token), None)).await;
    assert_eq!(response.status, StatusCode::OK);

    let task = response.body;
    assert_eq!(task, created);
    assert_eq!(task["title"], "write report");
    assert_eq!(task["description"], "quarterly numbers");
    assert_eq!(task["status"], "pending");
    assert!(task.get("user_id").is_none());

    let created_at: DateTime<Utc> = task["created_at"].as_str().unwrap().parse().unwrap();
    assert!(created_at <= Utc::now());
}

#[tokio::test]
async fn test_list_is_oldest_first() {
    let ctx = TestContext::new().await.unwrap();
    let token = ctx.signup("alice", "pw1").await;

    for title in ["first", "second", "third"] {
        ctx.create_task(&token, title, "d").await;
    }

    let response = ctx.send(ctx.request(Method::GET, "/tasks/", Some(&token), None)).await;
    let titles: Vec<&str> = response
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();

    assert_eq!(titles, ["first", "second", "third"]);
}

#[tokio::test]
async fn test_tasks_route_without_trailing_slash() {
    let ctx = TestContext::new().await.unwrap();
    let token = ctx.signup("alice", "pw1").await;

    let response = ctx
        .send(ctx.request(
            Method::POST,
            "/tasks",
            Some(&token),
            Some(json!({ "title": "t", "description": "d" })),
        ))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = ctx.send(ctx.request(Method::GET, "/tasks", Some(&token), None)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_other_users_tasks_are_invisible() {
    let ctx = TestContext::new().await.unwrap();
    let alice = ctx.signup("alice", "pw1").await;
    let bob = ctx.signup("bob", "pw2").await;

    let task = ctx.create_task(&alice, "private", "alice only").await;
    let uri = format!("/tasks/{}", task["id"]);

    let requests = [
        ctx.request(Method::GET, &uri, Some(&bob), None),
        ctx.request(
            Method::PUT,
            &uri,
            Some(&bob),
            Some(json!({ "status": "completed" })),
        ),
        ctx.request(Method::DELETE, &uri, Some(&bob), None),
    ];
    for request in requests {
        let response = ctx.send(request).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.body["detail"], "Task not found");
    }

    let response = ctx.send(ctx.request(Method::GET, &uri, Some(&alice), None)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, task);
}

#[tokio::test]
async fn test_invalid_status_leaves_task_unchanged() {
    let ctx = TestContext::new().await.unwrap();
    let token = ctx.signup("alice", "pw1").await;
    let task = ctx.create_task(&token, "t", "d").await;
    let uri = format!("/tasks/{}", task["id"]);

    let response = ctx
        .send(ctx.request(
            Method::PUT,
            &uri,
            Some(&token),
            Some(json!({ "status": "archived" })),
        ))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "validation_error");

    let response = ctx
        .send(ctx.request(Method::PUT, &uri, Some(&token), Some(json!({}))))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body["detail"],
        "Status is required to update task status"
    );

    let response = ctx.send(ctx.request(Method::GET, &uri, Some(&token), None)).await;
    assert_eq!(response.body, task);
}

#[tokio::test]
async fn test_delete_missing_task_twice() {
    let ctx = TestContext::new().await.unwrap();
    let token = ctx.signup("alice", "pw1").await;

    for _ in 0..2 {
        let response = ctx
            .send(ctx.request(Method::DELETE, "/tasks/999", Some(&token), None))
            .await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn test_create_requires_title_and_description() {
    let ctx = TestContext::new().await.unwrap();
    let token = ctx.signup("alice", "pw1").await;

    let response = ctx
        .send(ctx.request(
            Method::POST,
            "/tasks/",
            Some(&token),
            Some(json!({ "title": "", "description": "d" })),
        ))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["fields"][0]["field"], "title");

    let response = ctx
        .send(ctx.request(
            Method::POST,
            "/tasks/",
            Some(&token),
            Some(json!({ "title": "t" })),
        ))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = ctx.send(ctx.request(Method::GET, "/tasks/", Some(&token), None)).await;
    assert_eq!(response.body, json!([]));
}

#[tokio::test]
async fn test_non_numeric_task_id() {
    let ctx = TestContext::new().await.unwrap();
    let token = ctx.signup("alice", "pw1").await;

    let response = ctx
        .send(ctx.request(Method::GET, "/tasks/abc", Some(&token), None))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "validation_error");
}
