// ABOUTME: Main library entry point for the Paybot chat backend
// ABOUTME: Provides REST endpoints for user auth, chat transcripts, and intent replies
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![deny(unsafe_code)]

//! # Paybot Server
//!
//! A small web backend for a payroll assistant chatbot. It authenticates
//! users, stores per-user chat transcripts in SQLite, and answers messages
//! by classifying them against a fixed intent catalog with canned replies.
//!
//! ## Architecture
//!
//! - **routes**: REST handlers for auth, chatbot, and health endpoints
//! - **auth**: JWT issuing/validation and password hashing helpers
//! - **database**: SQLite-backed user and transcript storage
//! - **intent**: intent catalog loading, classification, and reply selection
//! - **config**: environment-driven server configuration
//!
//! ## Example
//!
//! ```rust,no_run
//! use paybot_server::config::environment::ServerConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Paybot configured for port {}", config.http_port);
//!     Ok(())
//! }
//! ```

/// JWT authentication and session management
pub mod auth;

/// Configuration management and environment parsing
pub mod config;

/// User and chat transcript database operations
pub mod database;

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Intent catalog, classifier, and canned-reply selection
pub mod intent;

/// Production logging and structured output
pub mod logging;

/// HTTP middleware for request authentication and rate limiting
pub mod middleware;

/// Common data models shared across modules
pub mod models;

/// `HTTP` routes for registration, login, and chatbot endpoints
pub mod routes;

/// Server resources and HTTP server composition
pub mod server;
