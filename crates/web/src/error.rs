//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. Route handlers return `Result<T, AppError>`;
//! 403, 404 and 500 responses render the matching error page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::filters;
use crate::models::{CurrentUser, Flash};
use crate::services::auth::AuthError;
use crate::services::items::ItemError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Session store read or write failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Logged in, but not allowed to do this.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Request body over the upload limit.
    #[error("Payload too large")]
    PayloadTooLarge,

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ItemError> for AppError {
    fn from(err: ItemError) -> Self {
        match err {
            ItemError::Validation(errors) => Self::BadRequest(errors.to_string()),
            ItemError::NotFound => Self::NotFound("item".to_string()),
            ItemError::Forbidden => Self::Forbidden("item".to_string()),
            ItemError::Media(e) => Self::Internal(e.to_string()),
            ItemError::Repository(e) => Self::Database(e),
        }
    }
}

/// 403 page.
#[derive(Template, WebTemplate)]
#[template(path = "errors/403.html")]
pub struct ForbiddenTemplate {
    pub user: Option<CurrentUser>,
    pub flash: Option<Flash>,
}

/// 404 page.
#[derive(Template, WebTemplate)]
#[template(path = "errors/404.html")]
pub struct NotFoundTemplate {
    pub user: Option<CurrentUser>,
    pub flash: Option<Flash>,
}

/// 500 page.
#[derive(Template, WebTemplate)]
#[template(path = "errors/500.html")]
pub struct InternalErrorTemplate {
    pub user: Option<CurrentUser>,
    pub flash: Option<Flash>,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Session(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials | AuthError::UserNotFound => StatusCode::UNAUTHORIZED,
                AuthError::WeakPassword(_) => StatusCode::BAD_REQUEST,
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        match status {
            StatusCode::NOT_FOUND => (
                status,
                NotFoundTemplate {
                    user: None,
                    flash: None,
                },
            )
                .into_response(),
            StatusCode::FORBIDDEN => (
                status,
                ForbiddenTemplate {
                    user: None,
                    flash: None,
                },
            )
                .into_response(),
            s if s.is_server_error() => (
                status,
                InternalErrorTemplate {
                    user: None,
                    flash: None,
                },
            )
                .into_response(),
            // Don't expose internal error details to clients
            _ => {
                let message = match &self {
                    Self::Auth(_) => "Invalid username or password".to_string(),
                    Self::PayloadTooLarge => "Upload is too large (max 2 MB)".to_string(),
                    other => other.to_string(),
                };
                (status, message).into_response()
            }
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user: &CurrentUser) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user.id.to_string()),
            username: Some(user.username.clone()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
