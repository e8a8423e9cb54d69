// ABOUTME: REST route handlers grouped by concern
// ABOUTME: Each submodule exposes a Routes struct building an axum Router
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # HTTP Routes
//!
//! REST handlers for the Paybot API. Each submodule owns one slice of
//! the surface: authentication, chatbot, and operational endpoints.

/// Authentication endpoints (register, login, refresh, profile)
pub mod auth;

/// Chatbot endpoints (message, history)
pub mod chatbot;

/// Health and root endpoints
pub mod health;

pub use auth::{AuthRoutes, AuthService};
pub use chatbot::ChatbotRoutes;
pub use health::HealthRoutes;
