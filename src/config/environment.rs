// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, deployment modes, and runtime configuration parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment-based configuration management for production deployment

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use tracing::{info, warn};

/// Default HTTP port
pub const DEFAULT_HTTP_PORT: u16 = 8081;
/// Default database location
pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/paybot.db";
/// Default CORS origin (local Vite dev server)
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";
/// Default model artifact directory holding intents.json
pub const DEFAULT_MODEL_DIR: &str = "./chatbot_model";

/// Strongly typed log level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to `tracing::Level`
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Error => tracing::Level::ERROR,
            Self::Warn => tracing::Level::WARN,
            Self::Info => tracing::Level::INFO,
            Self::Debug => tracing::Level::DEBUG,
            Self::Trace => tracing::Level::TRACE,
        }
    }

    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Environment type for security and other configurations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Check if this is a development environment
    #[must_use]
    pub const fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Type-safe database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// SQLite database with file path
    SQLite {
        /// Path to the database file
        path: PathBuf,
    },
    /// In-memory SQLite (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from string
    #[must_use]
    pub fn parse_url(s: &str) -> Self {
        if let Some(path_str) = s.strip_prefix("sqlite:") {
            if path_str == ":memory:" {
                Self::Memory
            } else {
                Self::SQLite {
                    path: PathBuf::from(path_str),
                }
            }
        } else {
            // Fallback: treat as SQLite file path
            Self::SQLite {
                path: PathBuf::from(s),
            }
        }
    }

    /// Convert to connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".to_string(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::SQLite {
            path: PathBuf::from("./data/paybot.db"),
        }
    }
}

impl std::fmt::Display for DatabaseUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_connection_string())
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// JWT signing secret; generated at startup when absent
    #[serde(skip_serializing)]
    pub jwt_secret: Option<String>,
    /// JWT expiry time in hours
    pub jwt_expiry_hours: i64,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Enable rate limiting
    pub enabled: bool,
    /// Requests per window
    pub requests_per_window: u32,
    /// Window duration in seconds
    pub window_seconds: u64,
}

/// Security settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// CORS allowed origins
    pub cors_origins: Vec<String>,
    /// Rate limiting configuration
    pub rate_limit: RateLimitConfig,
}

/// Chatbot engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatbotConfig {
    /// Directory holding the intent catalog (intents.json)
    pub model_dir: PathBuf,
    /// Minimum classification confidence before falling back
    pub confidence_threshold: f64,
    /// Maximum accepted message length in characters
    pub max_message_chars: usize,
}

/// Top-level server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP API port
    pub http_port: u16,
    /// Log level
    pub log_level: LogLevel,
    /// Environment type
    pub environment: Environment,
    /// Database configuration
    pub database_url: DatabaseUrl,
    /// Authentication configuration
    pub auth: AuthConfig,
    /// Security settings
    pub security: SecurityConfig,
    /// Chatbot engine settings
    pub chatbot: ChatbotConfig,
}

/// Read an env var, falling back to a default when unset
fn env_var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Parse a numeric env var, warning and falling back on bad values
fn parse_env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Invalid {name} value '{raw}', using default");
            default
        }),
        Err(_) => default,
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is present but unusable
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        // Load .env file if it exists
        if let Err(e) = dotenvy::dotenv() {
            warn!("No .env file found or failed to load: {}", e);
        }

        let config = Self {
            http_port: parse_env_or("HTTP_PORT", DEFAULT_HTTP_PORT),
            log_level: LogLevel::from_str_or_default(&env_var_or("RUST_LOG", "info")),
            environment: Environment::from_str_or_default(&env_var_or(
                "ENVIRONMENT",
                "development",
            )),
            database_url: DatabaseUrl::parse_url(&env_var_or("DATABASE_URL", DEFAULT_DATABASE_URL)),
            auth: AuthConfig {
                jwt_secret: env::var("JWT_SECRET").ok(),
                jwt_expiry_hours: parse_env_or("JWT_EXPIRY_HOURS", 24),
            },
            security: SecurityConfig {
                cors_origins: env_var_or("CORS_ALLOWED_ORIGINS", DEFAULT_CORS_ORIGIN)
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                rate_limit: RateLimitConfig {
                    enabled: parse_env_or("RATE_LIMIT_ENABLED", true),
                    requests_per_window: parse_env_or("RATE_LIMIT_REQUESTS", 100),
                    window_seconds: parse_env_or("RATE_LIMIT_WINDOW_SECS", 900),
                },
            },
            chatbot: ChatbotConfig {
                model_dir: PathBuf::from(env_var_or("MODEL_DIR", DEFAULT_MODEL_DIR)),
                confidence_threshold: parse_env_or("INTENT_CONFIDENCE_THRESHOLD", 0.35),
                max_message_chars: parse_env_or("MAX_MESSAGE_CHARS", 512),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.auth.jwt_expiry_hours <= 0 {
            anyhow::bail!(
                "JWT_EXPIRY_HOURS must be positive, got {}",
                self.auth.jwt_expiry_hours
            );
        }
        if !(0.0..=1.0).contains(&self.chatbot.confidence_threshold) {
            anyhow::bail!(
                "INTENT_CONFIDENCE_THRESHOLD must be within [0, 1], got {}",
                self.chatbot.confidence_threshold
            );
        }
        if self.environment.is_production() && self.auth.jwt_secret.is_none() {
            warn!("JWT_SECRET not set in production; a random secret will be generated and sessions will not survive restarts");
        }
        Ok(())
    }

    /// One-line startup summary
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "http_port={} env={} db={} rate_limit={}/{}s model_dir={} threshold={}",
            self.http_port,
            self.environment,
            self.database_url,
            self.security.rate_limit.requests_per_window,
            self.security.rate_limit.window_seconds,
            self.chatbot.model_dir.display(),
            self.chatbot.confidence_threshold
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str_or_default("DEBUG"), LogLevel::Debug);
        assert_eq!(LogLevel::from_str_or_default("bogus"), LogLevel::Info);
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!(
            Environment::from_str_or_default("prod"),
            Environment::Production
        );
        assert_eq!(
            Environment::from_str_or_default("unknown"),
            Environment::Development
        );
    }

    #[test]
    fn test_database_url_parsing() {
        assert!(DatabaseUrl::parse_url("sqlite::memory:").is_memory());

        let file = DatabaseUrl::parse_url("sqlite:./data/paybot.db");
        assert_eq!(file.to_connection_string(), "sqlite:./data/paybot.db");

        let bare = DatabaseUrl::parse_url("./other.db");
        assert_eq!(bare.to_connection_string(), "sqlite:./other.db");
    }

    #[test]
    fn test_validate_rejects_bad_threshold() {
        let mut config = ServerConfig {
            http_port: DEFAULT_HTTP_PORT,
            log_level: LogLevel::default(),
            environment: Environment::Testing,
            database_url: DatabaseUrl::Memory,
            auth: AuthConfig {
                jwt_secret: None,
                jwt_expiry_hours: 24,
            },
            security: SecurityConfig {
                cors_origins: vec![DEFAULT_CORS_ORIGIN.into()],
                rate_limit: RateLimitConfig {
                    enabled: false,
                    requests_per_window: 100,
                    window_seconds: 900,
                },
            },
            chatbot: ChatbotConfig {
                model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
                confidence_threshold: 1.5,
                max_message_chars: 512,
            },
        };
        assert!(config.validate().is_err());

        config.chatbot.confidence_threshold = 0.35;
        assert!(config.validate().is_ok());
    }
}
