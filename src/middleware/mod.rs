// ABOUTME: HTTP middleware for request authentication and rate limiting
// ABOUTME: Exposes the bearer-token auth path used by every protected route
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request middleware: bearer authentication and per-user rate limiting

mod auth;
mod rate_limiting;

pub use auth::{AuthMiddleware, AuthResult};
pub use rate_limiting::{RateLimitStatus, RateLimiter};
