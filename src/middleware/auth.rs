// ABOUTME: Bearer-token authentication middleware for protected routes
// ABOUTME: Validates JWTs, resolves the user, and enforces per-user rate limits
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::rate_limiting::{RateLimitStatus, RateLimiter};
use crate::auth::AuthManager;
use crate::config::environment::RateLimitConfig;
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use uuid::Uuid;

/// Authentication result with user context
#[derive(Debug)]
pub struct AuthResult {
    /// Authenticated user `ID`
    pub user_id: Uuid,
    /// Rate limit state for this request
    pub rate_limit: RateLimitStatus,
}

/// Middleware for bearer-token request authentication
pub struct AuthMiddleware {
    auth_manager: AuthManager,
    database: Database,
    rate_limiter: RateLimiter,
}

impl AuthMiddleware {
    /// Create new auth middleware
    #[must_use]
    pub fn new(
        auth_manager: AuthManager,
        database: Database,
        rate_limit_config: RateLimitConfig,
    ) -> Self {
        Self {
            auth_manager,
            database,
            rate_limiter: RateLimiter::new(rate_limit_config),
        }
    }

    /// Authenticate a request from its headers
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The Authorization header is missing or not a Bearer token
    /// - JWT token validation fails
    /// - The token subject no longer resolves to an active user
    /// - The user's rate limit is exhausted
    #[tracing::instrument(
        skip(self, headers),
        fields(user_id = tracing::field::Empty, success = tracing::field::Empty)
    )]
    pub async fn authenticate_request(
        &self,
        headers: &axum::http::HeaderMap,
    ) -> AppResult<AuthResult> {
        let auth_header = headers
            .get("authorization")
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| {
                tracing::warn!("Authentication failed: Missing authorization header");
                AppError::auth_required()
            })?;

        // Do not log header content to prevent token leakage
        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            tracing::warn!("Authentication failed: Invalid authorization header format");
            AppError::auth_invalid("Invalid authorization header format - must be 'Bearer <token>'")
        })?;

        let claims = self
            .auth_manager
            .validate_token_detailed(token)
            .map_err(|e| {
                tracing::Span::current().record("success", false);
                AppError::auth_invalid(format!("JWT validation failed: {e}"))
            })?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::auth_invalid("Invalid user ID in token"))?;

        let user = self
            .database
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::auth_invalid("Token subject no longer exists"))?;

        if !user.is_active {
            return Err(AppError::auth_invalid("User account is deactivated").with_user_id(user_id));
        }

        let rate_limit = self.rate_limiter.check(user_id);
        if rate_limit.is_rate_limited {
            tracing::warn!("Rate limit exceeded for user: {}", user_id);
            return Err(
                AppError::rate_limit_exceeded(rate_limit.limit, rate_limit.reset_at)
                    .with_user_id(user_id),
            );
        }

        self.database.update_last_active(user_id).await?;

        tracing::Span::current()
            .record("user_id", user_id.to_string())
            .record("success", true);
        tracing::debug!("JWT authentication successful for user: {}", user_id);

        Ok(AuthResult {
            user_id,
            rate_limit,
        })
    }

    /// Get reference to the auth manager
    #[must_use]
    pub const fn auth_manager(&self) -> &AuthManager {
        &self.auth_manager
    }
}
