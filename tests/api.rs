use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::{sync::Arc, time::Duration};
use tower::ServiceExt;

use messages_service::{routes::create_router, MemoryStore, MessageService};

fn app() -> Router {
    let service = Arc::new(MessageService::new(Arc::new(MemoryStore::new())));
    create_router(service, Duration::from_secs(30))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("request failed");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, body)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn create(app: &Router, content: &str) -> Value {
    let (status, body) = send(app, json_request("POST", "/messages", json!({ "content": content }))).await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

#[tokio::test]
async fn health_endpoints_respond_ok() {
    let app = app();

    let (status, body) = send(&app, empty_request("GET", "/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("OK".to_string()));

    let (status, _) = send(&app, empty_request("GET", "/health/db")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn create_message_returns_full_record() {
    let app = app();

    let body = create(&app, "Racecar").await;

    assert_eq!(body["content"], "Racecar");
    assert_eq!(body["isPalindrome"], true);
    assert!(body["id"].as_i64().unwrap() > 0);
    assert!(body["createdAt"].is_string());
    assert_eq!(body["createdAt"], body["updatedAt"]);
}

#[tokio::test]
async fn create_message_ignores_client_supplied_derived_fields() {
    let app = app();

    let (status, body) = send(
        &app,
        json_request("POST", "/messages", json!({ "content": "Racecar", "isPalindrome": false, "id": 500 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["isPalindrome"], true);
    assert_eq!(body["id"], 1);

    let (status, body) = send(
        &app,
        json_request("POST", "/messages", json!({ "content": "Hello World", "isPalindrome": true })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["isPalindrome"], false);
}

#[tokio::test]
async fn create_message_rejects_bad_input() {
    let app = app();

    let missing_content_type = Request::builder()
        .method("POST")
        .uri("/messages")
        .body(Body::from(r#"{"content":"Racecar"}"#))
        .unwrap();
    let (status, body) = send(&app, missing_content_type).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body["error"]["code"], "UNSUPPORTED_MEDIA_TYPE");

    let wrong_content_type = Request::builder()
        .method("POST")
        .uri("/messages")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(r#"{"content":"Racecar"}"#))
        .unwrap();
    let (status, _) = send(&app, wrong_content_type).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let malformed = Request::builder()
        .method("POST")
        .uri("/messages")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, malformed).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, _) = send(&app, json_request("POST", "/messages", json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, json_request("POST", "/messages", json!({ "content": 42 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_message_enforces_length_in_characters() {
    let app = app();

    create(&app, &"é".repeat(1000)).await;

    let (status, body) = send(
        &app,
        json_request("POST", "/messages", json!({ "content": "a".repeat(1001) })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Message content exceeds 1000 characters");
}

#[tokio::test]
async fn get_message_by_id() {
    let app = app();
    let created = create(&app, "Madam").await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(&app, empty_request("GET", &format!("/messages/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, created);

    let (status, body) = send(&app, empty_request("GET", "/messages/9999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (status, body) = send(&app, empty_request("GET", "/messages/abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Invalid message ID");
}

#[tokio::test]
async fn patch_message_recomputes_palindrome() {
    let app = app();
    let created = create(&app, "Hello World").await;
    let uri = format!("/messages/{}", created["id"]);
    assert_eq!(created["isPalindrome"], false);

    let (status, body) = send(&app, json_request("PATCH", &uri, json!({ "content": "No lemon, no melon" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"], "No lemon, no melon");
    assert_eq!(body["isPalindrome"], true);
    assert_eq!(body["createdAt"], created["createdAt"]);

    let (_, fetched) = send(&app, empty_request("GET", &uri)).await;
    assert_eq!(fetched, body);
}

#[tokio::test]
async fn patch_without_content_leaves_message_unchanged() {
    let app = app();
    let created = create(&app, "level").await;
    let uri = format!("/messages/{}", created["id"]);

    let (status, body) = send(&app, json_request("PATCH", &uri, json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, created);

    let (status, body) = send(&app, json_request("PATCH", &uri, json!({ "content": null }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updatedAt"], created["updatedAt"]);
}

#[tokio::test]
async fn patch_message_errors() {
    let app = app();
    let created = create(&app, "keep me").await;
    let uri = format!("/messages/{}", created["id"]);

    let (status, _) = send(&app, json_request("PATCH", "/messages/9999", json!({ "content": "x" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, json_request("PATCH", "/messages/9999", json!({ "content": "a".repeat(1001) }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let malformed_for_missing = Request::builder()
        .method("PATCH")
        .uri("/messages/9999")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _) = send(&app, malformed_for_missing).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let malformed = Request::builder()
        .method("PATCH")
        .uri(&uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _) = send(&app, malformed).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, json_request("PATCH", "/messages/0", json!({ "content": "x" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, json_request("PATCH", &uri, json!({ "content": "z".repeat(1001) }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // The update body uses the same field name as create
    let (status, _) = send(&app, json_request("PATCH", &uri, json!({ "text": "level" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let no_content_type = Request::builder()
        .method("PATCH")
        .uri(&uri)
        .body(Body::from(r#"{"content":"level"}"#))
        .unwrap();
    let (status, _) = send(&app, no_content_type).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let (_, fetched) = send(&app, empty_request("GET", &uri)).await;
    assert_eq!(fetched["content"], "keep me");
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let app = app();
    let created = create(&app, "Racecar").await;
    let uri = format!("/messages/{}", created["id"]);

    let (status, body) = send(&app, empty_request("DELETE", &uri)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&app, empty_request("GET", &uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, empty_request("DELETE", &uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, empty_request("DELETE", "/messages/nope")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_messages_paginates() {
    let app = app();
    for i in 1..=25 {
        let content = if i % 5 == 0 { "Madam".to_string() } else { format!("Test message {}", i) };
        create(&app, &content).await;
    }

    let (status, body) = send(&app, empty_request("GET", "/messages?page=2&limit=10")).await;
    assert_eq!(status, StatusCode::OK);

    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 10);
    assert_eq!(messages[0]["id"], 11);
    assert_eq!(messages[9]["id"], 20);
    assert_eq!(messages[4]["content"], "Madam");
    assert_eq!(messages[4]["isPalindrome"], true);

    assert_eq!(
        body["pagination"],
        json!({ "currentPage": 2, "pageSize": 10, "totalPages": 3, "totalMessages": 25 })
    );

    let (_, defaults) = send(&app, empty_request("GET", "/messages")).await;
    assert_eq!(defaults["messages"].as_array().unwrap().len(), 10);
    assert_eq!(defaults["pagination"]["currentPage"], 1);
    assert_eq!(defaults["pagination"]["pageSize"], 10);

    let (status, beyond) = send(&app, empty_request("GET", "/messages?page=7")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(beyond["messages"].as_array().unwrap().is_empty());
    assert_eq!(beyond["pagination"]["totalPages"], 3);
}

#[tokio::test]
async fn list_messages_on_empty_store() {
    let app = app();

    let (status, body) = send(&app, empty_request("GET", "/messages")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["messages"], json!([]));
    assert_eq!(body["pagination"]["totalPages"], 0);
    assert_eq!(body["pagination"]["totalMessages"], 0);
}

#[tokio::test]
async fn list_messages_rejects_invalid_parameters() {
    let app = app();

    for uri in [
        "/messages?limit=0",
        "/messages?limit=101",
        "/messages?limit=-1",
        "/messages?limit=ten",
        "/messages?page=0",
        "/messages?page=abc",
    ] {
        let (status, body) = send(&app, empty_request("GET", uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "uri: {}", uri);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR", "uri: {}", uri);
    }
}
