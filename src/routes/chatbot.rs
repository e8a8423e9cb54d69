// ABOUTME: Chatbot route handlers for messaging and transcript management
// ABOUTME: Classifies user messages, persists both sides of the exchange
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chatbot routes
//!
//! Bearer-authenticated endpoints that answer user messages via the
//! intent engine and manage the per-user chat transcript.

use crate::{
    database::ChatMessageRecord,
    errors::{AppError, AppResult},
    server::ServerResources,
};
use axum::{
    extract::{Query, State},
    http::HeaderMap,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Request to send a chatbot message
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    /// Message content
    pub message: String,
}

/// Chatbot reply with the persisted transcript rows
#[derive(Debug, Serialize, Deserialize)]
pub struct SendMessageResponse {
    /// The stored user message
    pub user_message: ChatMessageRecord,
    /// The stored bot reply
    pub bot_message: ChatMessageRecord,
    /// Winning intent tag, or "unknown" on fallback
    pub intent: String,
    /// Classification confidence in [0, 1]
    pub confidence: f64,
}

/// Query parameters for transcript pagination
#[derive(Debug, Deserialize, Default)]
pub struct HistoryQuery {
    /// Maximum number of messages to return
    #[serde(default = "default_limit")]
    pub limit: i64,
    /// Offset for pagination
    #[serde(default)]
    pub offset: i64,
}

const fn default_limit() -> i64 {
    50
}

/// Response for transcript listing
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    /// Messages in chronological order
    pub messages: Vec<ChatMessageRecord>,
    /// Total messages in the transcript
    pub total: i64,
    /// Page size used
    pub limit: i64,
    /// Offset used
    pub offset: i64,
}

/// Response for transcript clearing
#[derive(Debug, Serialize, Deserialize)]
pub struct ClearHistoryResponse {
    /// Number of deleted messages
    pub deleted: u64,
}

/// Chatbot routes handler
pub struct ChatbotRoutes;

impl ChatbotRoutes {
    /// Create all chatbot routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/chatbot/message", post(Self::send_message))
            .route("/api/chatbot/history", get(Self::get_history))
            .route("/api/chatbot/history", delete(Self::clear_history))
            .with_state(resources)
    }

    /// `POST /api/chatbot/message`
    ///
    /// Classifies the message, selects a reply, and persists both the
    /// user message and the bot reply to the transcript.
    async fn send_message(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<SendMessageRequest>,
    ) -> AppResult<Json<SendMessageResponse>> {
        let auth = resources.auth_middleware.authenticate_request(&headers).await?;

        let message = request.message.trim();
        if message.is_empty() {
            return Err(AppError::invalid_input("Message must not be empty"));
        }

        let reply = resources
            .intent_responder
            .respond(message, &mut rand::thread_rng());

        tracing::debug!(
            user_id = %auth.user_id,
            intent = %reply.tag,
            confidence = reply.confidence,
            "Chatbot message classified"
        );

        // One transaction: the user message and the bot reply land
        // together or not at all
        let (user_message, bot_message) = resources
            .database
            .add_exchange(
                auth.user_id,
                message,
                &reply.text,
                Some(&reply.tag),
                Some(reply.confidence),
            )
            .await?;

        Ok(Json(SendMessageResponse {
            user_message,
            bot_message,
            intent: reply.tag,
            confidence: reply.confidence,
        }))
    }

    /// `GET /api/chatbot/history`
    async fn get_history(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<HistoryQuery>,
    ) -> AppResult<Json<HistoryResponse>> {
        let auth = resources.auth_middleware.authenticate_request(&headers).await?;

        let limit = query.limit.clamp(1, 500);
        let offset = query.offset.max(0);

        let page = resources
            .database
            .get_history(auth.user_id, limit, offset)
            .await?;

        Ok(Json(HistoryResponse {
            messages: page.messages,
            total: page.total,
            limit: page.limit,
            offset: page.offset,
        }))
    }

    /// `DELETE /api/chatbot/history`
    async fn clear_history(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> AppResult<Json<ClearHistoryResponse>> {
        let auth = resources.auth_middleware.authenticate_request(&headers).await?;

        let deleted = resources.database.clear_history(auth.user_id).await?;
        tracing::info!(
            "Cleared {} transcript messages for user: {}",
            deleted,
            auth.user_id
        );

        Ok(Json(ClearHistoryResponse { deleted }))
    }
}
