// ABOUTME: Core data models for users and chat transcript messages
// ABOUTME: Shared across database, routes, and middleware modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Data Models
//!
//! Core data structures shared across the server.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,
    /// Email address, unique across accounts
    pub email: String,
    /// Optional display name
    pub display_name: Option<String>,
    /// Bcrypt-hashed password
    pub password_hash: String,
    /// Whether the account can log in
    pub is_active: bool,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last authenticated activity timestamp
    pub last_active: DateTime<Utc>,
}

impl User {
    /// Create a new user with a fresh id and current timestamps
    #[must_use]
    pub fn new(email: String, password_hash: String, display_name: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            display_name,
            password_hash,
            is_active: true,
            created_at: now,
            last_active: now,
        }
    }
}

/// Who authored a transcript message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageSender {
    /// The authenticated user
    User,
    /// The chatbot
    Bot,
}

impl MessageSender {
    /// Database column value for this sender
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_is_active() {
        let user = User::new("a@b.com".into(), "hash".into(), None);
        assert!(user.is_active);
        assert_eq!(user.email, "a@b.com");
    }

    #[test]
    fn test_sender_column_values() {
        assert_eq!(MessageSender::User.as_str(), "user");
        assert_eq!(MessageSender::Bot.as_str(), "bot");
    }
}
