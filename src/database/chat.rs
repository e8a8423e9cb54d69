// ABOUTME: Database operations for per-user chat transcripts
// ABOUTME: Handles message persistence, paginated history, and transcript clearing
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::MessageSender;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::Row;
use uuid::Uuid;

/// Database representation of a transcript message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessageRecord {
    /// Unique message ID
    pub id: String,
    /// User ID who owns the message
    pub user_id: String,
    /// Message author ("user" or "bot")
    pub sender: String,
    /// Message content
    pub content: String,
    /// Predicted intent tag, set on bot messages
    pub intent: Option<String>,
    /// Classification confidence, set on bot messages
    pub confidence: Option<f64>,
    /// When the message was created (ISO 8601)
    pub created_at: String,
}

/// One page of a user's transcript
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryPage {
    /// Messages in chronological order
    pub messages: Vec<ChatMessageRecord>,
    /// Total messages in the transcript
    pub total: i64,
    /// Page size used for the query
    pub limit: i64,
    /// Offset used for the query
    pub offset: i64,
}

fn row_to_message(r: &sqlx::sqlite::SqliteRow) -> ChatMessageRecord {
    ChatMessageRecord {
        id: r.get("id"),
        user_id: r.get("user_id"),
        sender: r.get("sender"),
        content: r.get("content"),
        intent: r.get("intent"),
        confidence: r.get("confidence"),
        created_at: r.get("created_at"),
    }
}

impl Database {
    /// Create the chat_messages table
    pub(super) async fn migrate_chat(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS chat_messages (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                sender TEXT NOT NULL CHECK (sender IN ('user', 'bot')),
                content TEXT NOT NULL,
                intent TEXT,
                confidence REAL,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(self.pool())
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_chat_messages_user_created
             ON chat_messages(user_id, created_at)",
        )
        .execute(self.pool())
        .await?;

        Ok(())
    }

    fn build_message(
        user_id: Uuid,
        sender: MessageSender,
        content: &str,
        intent: Option<&str>,
        confidence: Option<f64>,
    ) -> ChatMessageRecord {
        ChatMessageRecord {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            sender: sender.as_str().to_owned(),
            content: content.to_owned(),
            intent: intent.map(ToOwned::to_owned),
            confidence,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    async fn insert_message<'e, E>(executor: E, message: &ChatMessageRecord) -> AppResult<()>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        sqlx::query(
            r"
            INSERT INTO chat_messages (id, user_id, sender, content, intent, confidence, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(&message.id)
        .bind(&message.user_id)
        .bind(&message.sender)
        .bind(&message.content)
        .bind(&message.intent)
        .bind(message.confidence)
        .bind(&message.created_at)
        .execute(executor)
        .await
        .map_err(|e| AppError::database(format!("Failed to store message: {e}")))?;

        Ok(())
    }

    /// Append a single message to a user's transcript
    ///
    /// # Errors
    ///
    /// Returns a database error if the insert fails
    pub async fn add_message(
        &self,
        user_id: Uuid,
        sender: MessageSender,
        content: &str,
        intent: Option<&str>,
        confidence: Option<f64>,
    ) -> AppResult<ChatMessageRecord> {
        let message = Self::build_message(user_id, sender, content, intent, confidence);
        Self::insert_message(self.pool(), &message).await?;
        Ok(message)
    }

    /// Append a user message and its bot reply in one transaction
    ///
    /// Either both rows land in the transcript or neither does; the
    /// classification outcome is stored on the bot row only.
    ///
    /// # Errors
    ///
    /// Returns a database error if either insert or the commit fails
    pub async fn add_exchange(
        &self,
        user_id: Uuid,
        user_content: &str,
        bot_content: &str,
        intent: Option<&str>,
        confidence: Option<f64>,
    ) -> AppResult<(ChatMessageRecord, ChatMessageRecord)> {
        let user_message =
            Self::build_message(user_id, MessageSender::User, user_content, None, None);
        let bot_message =
            Self::build_message(user_id, MessageSender::Bot, bot_content, intent, confidence);

        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to start transaction: {e}")))?;

        Self::insert_message(&mut *tx, &user_message).await?;
        Self::insert_message(&mut *tx, &bot_message).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit exchange: {e}")))?;

        Ok((user_message, bot_message))
    }

    /// Get a page of a user's transcript in chronological order
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails
    pub async fn get_history(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> AppResult<HistoryPage> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, sender, content, intent, confidence, created_at
            FROM chat_messages
            WHERE user_id = $1
            ORDER BY created_at ASC, id ASC
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(user_id.to_string())
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to get history: {e}")))?;

        let messages = rows.iter().map(row_to_message).collect();
        let total = self.get_message_count(user_id).await?;

        Ok(HistoryPage {
            messages,
            total,
            limit,
            offset,
        })
    }

    /// Count messages in a user's transcript
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails
    pub async fn get_message_count(&self, user_id: Uuid) -> AppResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM chat_messages WHERE user_id = $1")
            .bind(user_id.to_string())
            .fetch_one(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to count messages: {e}")))?;

        Ok(row.get("count"))
    }

    /// Delete a user's transcript, returning the number of deleted messages
    ///
    /// # Errors
    ///
    /// Returns a database error if the delete fails
    pub async fn clear_history(&self, user_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM chat_messages WHERE user_id = $1")
            .bind(user_id.to_string())
            .execute(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to clear history: {e}")))?;

        Ok(result.rows_affected())
    }
}
