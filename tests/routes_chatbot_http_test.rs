// ABOUTME: Integration tests for the chatbot route handlers
// ABOUTME: Tests messaging, transcript history, isolation, and clearing

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use common::{create_test_server_resources, create_test_user};
use helpers::axum_test::AxumTestRequest;
use paybot_server::intent::{FALLBACK_RESPONSES, FALLBACK_TAG};
use paybot_server::routes::chatbot::{
    ChatbotRoutes, ClearHistoryResponse, HistoryResponse, SendMessageResponse,
};

use axum::http::StatusCode;
use serde_json::json;

async fn setup() -> (axum::Router, std::sync::Arc<paybot_server::server::ServerResources>, String) {
    let resources = create_test_server_resources().await.unwrap();
    let (_user_id, user) = create_test_user(&resources.database).await.unwrap();
    let token = resources.auth_manager.generate_token(&user).unwrap();
    let router = ChatbotRoutes::routes(resources.clone());
    (router, resources, format!("Bearer {token}"))
}

#[tokio::test]
async fn test_message_requires_auth() {
    let (router, _resources, _bearer) = setup().await;

    AxumTestRequest::post("/api/chatbot/message")
        .json(&json!({"message": "hello"}))
        .send(router)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_message_classified_and_persisted() {
    let (router, _resources, bearer) = setup().await;

    let response = AxumTestRequest::post("/api/chatbot/message")
        .header("authorization", &bearer)
        .json(&json!({"message": "show my payslip"}))
        .send(router.clone())
        .await
        .assert_status(StatusCode::OK);

    let body: SendMessageResponse = response.json();
    assert_eq!(body.intent, "payslip");
    assert!(body.confidence > 0.35);
    assert_eq!(body.user_message.sender, "user");
    assert_eq!(body.user_message.content, "show my payslip");
    assert_eq!(body.bot_message.sender, "bot");
    assert_eq!(body.bot_message.intent.as_deref(), Some("payslip"));

    // Both sides of the exchange are in the transcript
    let history: HistoryResponse = AxumTestRequest::get("/api/chatbot/history")
        .header("authorization", &bearer)
        .send(router)
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(history.total, 2);
    assert_eq!(history.messages[0].sender, "user");
    assert_eq!(history.messages[1].sender, "bot");
}

#[tokio::test]
async fn test_empty_message_rejected() {
    let (router, _resources, bearer) = setup().await;

    for message in ["", "   "] {
        AxumTestRequest::post("/api/chatbot/message")
            .header("authorization", &bearer)
            .json(&json!({"message": message}))
            .send(router.clone())
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_unrecognized_message_gets_fallback() {
    let (router, _resources, bearer) = setup().await;

    let body: SendMessageResponse = AxumTestRequest::post("/api/chatbot/message")
        .header("authorization", &bearer)
        .json(&json!({"message": "xyzzy frobnicate quux"}))
        .send(router)
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(body.intent, FALLBACK_TAG);
    assert!(FALLBACK_RESPONSES.contains(&body.bot_message.content.as_str()));
}

#[tokio::test]
async fn test_history_pagination() {
    let (router, _resources, bearer) = setup().await;

    for _ in 0..3 {
        AxumTestRequest::post("/api/chatbot/message")
            .header("authorization", &bearer)
            .json(&json!({"message": "hello"}))
            .send(router.clone())
            .await
            .assert_status(StatusCode::OK);
    }

    // 3 exchanges = 6 messages
    let page: HistoryResponse = AxumTestRequest::get("/api/chatbot/history?limit=4&offset=0")
        .header("authorization", &bearer)
        .send(router.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(page.total, 6);
    assert_eq!(page.messages.len(), 4);

    let rest: HistoryResponse = AxumTestRequest::get("/api/chatbot/history?limit=4&offset=4")
        .header("authorization", &bearer)
        .send(router)
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(rest.messages.len(), 2);
}

#[tokio::test]
async fn test_history_is_per_user() {
    let (router, resources, bearer) = setup().await;

    // A second user with their own token
    let (_other_id, other) = create_test_user(&resources.database).await.unwrap();
    let other_token = resources.auth_manager.generate_token(&other).unwrap();
    let other_bearer = format!("Bearer {other_token}");

    AxumTestRequest::post("/api/chatbot/message")
        .header("authorization", &bearer)
        .json(&json!({"message": "hello"}))
        .send(router.clone())
        .await
        .assert_status(StatusCode::OK);

    let other_history: HistoryResponse = AxumTestRequest::get("/api/chatbot/history")
        .header("authorization", &other_bearer)
        .send(router.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(other_history.total, 0);

    // Clearing the second user's transcript leaves the first untouched
    let cleared: ClearHistoryResponse = AxumTestRequest::delete("/api/chatbot/history")
        .header("authorization", &other_bearer)
        .send(router.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(cleared.deleted, 0);

    let history: HistoryResponse = AxumTestRequest::get("/api/chatbot/history")
        .header("authorization", &bearer)
        .send(router)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(history.total, 2);
}

#[tokio::test]
async fn test_clear_history_reports_deleted_count() {
    let (router, _resources, bearer) = setup().await;

    AxumTestRequest::post("/api/chatbot/message")
        .header("authorization", &bearer)
        .json(&json!({"message": "hi there"}))
        .send(router.clone())
        .await
        .assert_status(StatusCode::OK);

    let cleared: ClearHistoryResponse = AxumTestRequest::delete("/api/chatbot/history")
        .header("authorization", &bearer)
        .send(router.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(cleared.deleted, 2);

    let history: HistoryResponse = AxumTestRequest::get("/api/chatbot/history")
        .header("authorization", &bearer)
        .send(router)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(history.total, 0);
}
