// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides common database, auth, and intent engine creation helpers

#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::unwrap_used,
    clippy::expect_used
)]

//! Shared test utilities for `paybot_server`
//!
//! Common setup functions to reduce duplication across integration tests.

use anyhow::Result;
use paybot_server::{
    auth::{generate_jwt_secret, AuthManager},
    config::environment::{
        AuthConfig, ChatbotConfig, DatabaseUrl, Environment, LogLevel, RateLimitConfig,
        SecurityConfig, ServerConfig,
    },
    database::Database,
    intent::{IntentCatalog, IntentDefinition, IntentResponder},
    models::User,
    server::ServerResources,
};
use std::path::PathBuf;
use std::sync::{Arc, Once};
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard test database setup
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    Ok(Database::new("sqlite::memory:").await?)
}

/// Create test authentication manager
pub fn create_test_auth_manager() -> AuthManager {
    let jwt_secret = generate_jwt_secret().unwrap().to_vec();
    AuthManager::new(jwt_secret, 24)
}

/// Intent catalog used by chatbot tests
pub fn create_test_catalog() -> IntentCatalog {
    IntentCatalog::from_intents(vec![
        IntentDefinition {
            tag: "greeting".into(),
            patterns: vec!["hello".into(), "hi there".into(), "good morning".into()],
            responses: vec!["Hello! How can I help you today?".into()],
        },
        IntentDefinition {
            tag: "payslip".into(),
            patterns: vec![
                "show my payslip".into(),
                "download my payslip".into(),
                "where is my salary statement".into(),
            ],
            responses: vec!["You can download your payslip from the documents page.".into()],
        },
    ])
    .unwrap()
}

/// Server configuration for tests
pub fn create_test_config() -> ServerConfig {
    ServerConfig {
        http_port: 0,
        log_level: LogLevel::Warn,
        environment: Environment::Testing,
        database_url: DatabaseUrl::Memory,
        auth: AuthConfig {
            jwt_secret: None,
            jwt_expiry_hours: 24,
        },
        security: SecurityConfig {
            cors_origins: vec!["http://localhost:5173".into()],
            rate_limit: RateLimitConfig {
                enabled: false,
                requests_per_window: 100,
                window_seconds: 900,
            },
        },
        chatbot: ChatbotConfig {
            model_dir: PathBuf::from("./chatbot_model"),
            confidence_threshold: 0.35,
            max_message_chars: 512,
        },
    }
}

/// Full resource bundle over an in-memory database
pub async fn create_test_server_resources() -> Result<Arc<ServerResources>> {
    let database = create_test_database().await?;
    let auth_manager = create_test_auth_manager();
    let responder = IntentResponder::new(create_test_catalog(), 0.35, 512);

    Ok(Arc::new(ServerResources::new(
        database,
        auth_manager,
        responder,
        create_test_config(),
    )))
}

/// Create and persist a test user with a known password ("testpass123")
pub async fn create_test_user(database: &Database) -> Result<(Uuid, User)> {
    let password_hash = bcrypt::hash("testpass123", 4)?;
    let user = User::new(
        format!("user-{}@example.com", Uuid::new_v4().simple()),
        password_hash,
        Some("Test User".into()),
    );
    let user_id = database.create_user(&user).await?;
    Ok((user_id, user))
}
