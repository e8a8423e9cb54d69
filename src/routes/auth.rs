// ABOUTME: User authentication route handlers for registration, login, and tokens
// ABOUTME: REST endpoints delegate business logic to the AuthService layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication routes for user management
//!
//! This module handles user registration, login, token refresh, and
//! password changes. Handlers are thin wrappers that delegate business
//! logic to [`AuthService`].

use crate::{
    auth::AuthManager,
    database::Database,
    errors::{AppError, AppResult},
    models::User,
    server::ServerResources,
};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Minimum accepted password length
const MIN_PASSWORD_CHARS: usize = 8;

/// User registration request
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
}

/// User registration response
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user_id: String,
    pub message: String,
}

/// User login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// User info embedded in token responses
#[derive(Debug, Serialize, Deserialize)]
pub struct UserInfo {
    pub user_id: String,
    pub email: String,
    pub display_name: Option<String>,
}

/// User login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub jwt_token: String,
    pub expires_at: String,
    pub user: UserInfo,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    pub token: String,
    pub user_id: String,
}

/// Change password request
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Generic message response
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Authentication service for business logic
#[derive(Clone)]
pub struct AuthService {
    auth_manager: Arc<AuthManager>,
    database: Database,
}

impl AuthService {
    #[must_use]
    pub const fn new(auth_manager: Arc<AuthManager>, database: Database) -> Self {
        Self {
            auth_manager,
            database,
        }
    }

    /// Handle user registration
    ///
    /// # Errors
    /// Returns an error if validation fails, the email is taken, or the
    /// database operation fails
    pub async fn register(&self, request: RegisterRequest) -> AppResult<RegisterResponse> {
        tracing::info!("User registration attempt for email: {}", request.email);

        if !Self::is_valid_email(&request.email) {
            return Err(AppError::invalid_input("Invalid email format"));
        }

        if !Self::is_valid_password(&request.password) {
            return Err(AppError::invalid_input(format!(
                "Password must be at least {MIN_PASSWORD_CHARS} characters"
            )));
        }

        // Hash password off the async executor
        let password = request.password.clone();
        let password_hash =
            tokio::task::spawn_blocking(move || bcrypt::hash(&password, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| AppError::internal(format!("Password hashing task failed: {e}")))?
                .map_err(|e| AppError::internal(format!("Password hashing error: {e}")))?;

        let user = User::new(request.email.clone(), password_hash, request.display_name);
        let user_id = self.database.create_user(&user).await?;

        tracing::info!(
            "User registered successfully: {} ({})",
            request.email,
            user_id
        );

        Ok(RegisterResponse {
            user_id: user_id.to_string(),
            message: "User registered successfully".into(),
        })
    }

    /// Handle user login
    ///
    /// # Errors
    /// Returns an error if authentication fails or token generation fails
    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        tracing::info!("User login attempt for email: {}", request.email);

        // Invalid email and invalid password are indistinguishable to callers
        let user = self
            .database
            .get_user_by_email_required(&request.email)
            .await
            .map_err(|_| AppError::auth_invalid("Invalid email or password"))?;

        // Verify password using spawn_blocking to avoid blocking async executor
        let password = request.password;
        let password_hash = user.password_hash.clone();
        let is_valid =
            tokio::task::spawn_blocking(move || bcrypt::verify(&password, &password_hash))
                .await
                .map_err(|e| AppError::internal(format!("Password verification task failed: {e}")))?
                .map_err(|e| AppError::internal(format!("Password verification error: {e}")))?;

        if !is_valid {
            tracing::warn!("Invalid password for user: {}", request.email);
            return Err(AppError::auth_invalid("Invalid email or password"));
        }

        if !user.is_active {
            tracing::warn!("Login blocked for deactivated user: {}", request.email);
            return Err(AppError::auth_invalid("Account is deactivated"));
        }

        self.database.update_last_active(user.id).await?;

        let jwt_token = self.auth_manager.generate_token(&user)?;
        let expires_at =
            chrono::Utc::now() + chrono::Duration::hours(self.auth_manager.token_expiry_hours());

        tracing::info!(
            "User logged in successfully: {} ({})",
            request.email,
            user.id
        );

        Ok(LoginResponse {
            jwt_token,
            expires_at: expires_at.to_rfc3339(),
            user: UserInfo {
                user_id: user.id.to_string(),
                email: user.email,
                display_name: user.display_name,
            },
        })
    }

    /// Handle token refresh
    ///
    /// # Errors
    /// Returns an error if the old token is invalid or generation fails
    pub async fn refresh_token(&self, request: RefreshTokenRequest) -> AppResult<LoginResponse> {
        tracing::info!("Token refresh attempt");

        let user_id = self
            .auth_manager
            .extract_user_id(&request.token)
            .map_err(|e| AppError::auth_invalid(format!("Invalid refresh token: {e}")))?;

        // The user id in the request must match the token subject
        let request_user_id = uuid::Uuid::parse_str(&request.user_id)
            .map_err(|_| AppError::invalid_input("Invalid user_id format"))?;
        if user_id != request_user_id {
            return Err(AppError::auth_invalid("User ID mismatch"));
        }

        let user = self
            .database
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        let new_jwt_token = self.auth_manager.refresh_token(&request.token, &user)?;
        let expires_at =
            chrono::Utc::now() + chrono::Duration::hours(self.auth_manager.token_expiry_hours());

        self.database.update_last_active(user.id).await?;

        tracing::info!("Token refreshed successfully for user: {}", user.id);

        Ok(LoginResponse {
            jwt_token: new_jwt_token,
            expires_at: expires_at.to_rfc3339(),
            user: UserInfo {
                user_id: user.id.to_string(),
                email: user.email,
                display_name: user.display_name,
            },
        })
    }

    /// Handle password change for an authenticated user
    ///
    /// # Errors
    /// Returns an error if the current password is wrong or the new
    /// password is too weak
    pub async fn change_password(
        &self,
        user_id: uuid::Uuid,
        request: ChangePasswordRequest,
    ) -> AppResult<MessageResponse> {
        if !Self::is_valid_password(&request.new_password) {
            return Err(AppError::invalid_input(format!(
                "Password must be at least {MIN_PASSWORD_CHARS} characters"
            )));
        }

        let user = self
            .database
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        let current = request.current_password;
        let password_hash = user.password_hash.clone();
        let is_valid = tokio::task::spawn_blocking(move || bcrypt::verify(&current, &password_hash))
            .await
            .map_err(|e| AppError::internal(format!("Password verification task failed: {e}")))?
            .map_err(|e| AppError::internal(format!("Password verification error: {e}")))?;

        if !is_valid {
            return Err(AppError::auth_invalid("Current password is incorrect"));
        }

        let new_password = request.new_password;
        let new_hash =
            tokio::task::spawn_blocking(move || bcrypt::hash(&new_password, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| AppError::internal(format!("Password hashing task failed: {e}")))?
                .map_err(|e| AppError::internal(format!("Password hashing error: {e}")))?;

        self.database.update_password_hash(user_id, &new_hash).await?;

        tracing::info!("Password changed for user: {}", user_id);

        Ok(MessageResponse {
            message: "Password changed successfully".into(),
        })
    }

    /// Validate email format
    #[must_use]
    pub fn is_valid_email(email: &str) -> bool {
        if email.len() <= 5 {
            return false;
        }
        let Some((local, domain)) = email.split_once('@') else {
            return false;
        };
        !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
    }

    /// Validate password strength
    #[must_use]
    pub fn is_valid_password(password: &str) -> bool {
        password.chars().count() >= MIN_PASSWORD_CHARS
    }
}

/// Authentication routes handler
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all authentication routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/auth/register", post(Self::register))
            .route("/api/auth/login", post(Self::login))
            .route("/api/auth/refresh", post(Self::refresh))
            .route("/api/auth/me", get(Self::me))
            .route("/api/auth/change-password", post(Self::change_password))
            .with_state(resources)
    }

    /// `POST /api/auth/register`
    async fn register(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<RegisterRequest>,
    ) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
        let response = resources.auth_service.register(request).await?;
        Ok((StatusCode::CREATED, Json(response)))
    }

    /// `POST /api/auth/login`
    async fn login(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<LoginRequest>,
    ) -> AppResult<Json<LoginResponse>> {
        let response = resources.auth_service.login(request).await?;
        Ok(Json(response))
    }

    /// `POST /api/auth/refresh`
    async fn refresh(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<RefreshTokenRequest>,
    ) -> AppResult<Json<LoginResponse>> {
        let response = resources.auth_service.refresh_token(request).await?;
        Ok(Json(response))
    }

    /// `GET /api/auth/me` - token verification and profile lookup
    async fn me(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> AppResult<Json<UserInfo>> {
        let auth = resources.auth_middleware.authenticate_request(&headers).await?;

        let user = resources
            .database
            .get_user(auth.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        Ok(Json(UserInfo {
            user_id: user.id.to_string(),
            email: user.email,
            display_name: user.display_name,
        }))
    }

    /// `POST /api/auth/change-password`
    async fn change_password(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<ChangePasswordRequest>,
    ) -> AppResult<Json<MessageResponse>> {
        let auth = resources.auth_middleware.authenticate_request(&headers).await?;
        let response = resources
            .auth_service
            .change_password(auth.user_id, request)
            .await?;
        Ok(Json(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(AuthService::is_valid_email("user@example.com"));
        assert!(!AuthService::is_valid_email("bad"));
        assert!(!AuthService::is_valid_email("nodomain@"));
        assert!(!AuthService::is_valid_email("no-at.example.com"));
        assert!(!AuthService::is_valid_email("user@nodot"));
    }

    #[test]
    fn test_password_validation() {
        assert!(AuthService::is_valid_password("longenough"));
        assert!(!AuthService::is_valid_password("short"));
    }
}
