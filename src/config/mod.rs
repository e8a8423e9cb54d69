// ABOUTME: Configuration module exposing environment-driven server settings
// ABOUTME: Re-exports the environment configuration types for convenience
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration management for the Paybot server

/// Environment-based configuration parsing
pub mod environment;

pub use environment::{
    AuthConfig, ChatbotConfig, DatabaseUrl, Environment, LogLevel, RateLimitConfig,
    SecurityConfig, ServerConfig,
};
