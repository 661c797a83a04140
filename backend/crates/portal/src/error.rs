//! Portal Error Types
//!
//! Portal-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Portal-specific result type alias
pub type PortalResult<T> = Result<T, PortalError>;

/// Portal-specific error variants
#[derive(Debug, Error)]
pub enum PortalError {
    /// No valid provider session
    #[error("Authentication required")]
    Unauthenticated,

    /// Acting user is not owner/admin
    #[error("Global admin role required")]
    NotGlobalAdmin,

    /// The provider rejected the call. `message` is its own text.
    #[error("{message}")]
    Provider { status: u16, message: String },

    /// Form input rejected before reaching the provider
    #[error("{0}")]
    Validation(String),

    /// Application id not in the compiled-in list
    #[error("Unknown application: {0}")]
    UnknownApplication(String),

    /// Cell is not editable (global admin row, or the portal itself)
    #[error("{0}")]
    NotGrantable(String),

    /// No profile row for the user
    #[error("Profile not found")]
    ProfileNotFound,

    /// Provider unreachable
    #[error("Provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Provider answered with a body we could not read
    #[error("Unexpected provider response: {0}")]
    Decode(String),
}

impl PortalError {
    pub fn provider(status: u16, message: impl Into<String>) -> Self {
        PortalError::Provider {
            status,
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            PortalError::Unauthenticated => ErrorKind::Unauthorized,
            PortalError::NotGlobalAdmin => ErrorKind::Forbidden,
            PortalError::Provider { status, .. } => ErrorKind::from_status(*status),
            PortalError::Validation(_) => ErrorKind::BadRequest,
            PortalError::UnknownApplication(_) | PortalError::ProfileNotFound => {
                ErrorKind::NotFound
            }
            PortalError::NotGrantable(_) => ErrorKind::Conflict,
            PortalError::Transport(_) | PortalError::Decode(_) => ErrorKind::BadGateway,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        let err = AppError::new(self.kind(), self.to_string());
        match self {
            PortalError::Unauthenticated => err.with_action("Sign in and try again"),
            PortalError::Transport(_) | PortalError::Decode(_) => {
                err.with_action("Try again in a moment")
            }
            _ => err,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            PortalError::Transport(e) => {
                tracing::error!(error = %e, "Provider unreachable");
            }
            PortalError::Decode(msg) => {
                tracing::error!(message = %msg, "Provider response not understood");
            }
            PortalError::Provider { status, message } if *status >= 500 => {
                tracing::warn!(status, message = %message, "Provider failure");
            }
            PortalError::NotGlobalAdmin => {
                tracing::warn!("Admin operation attempted without global admin role");
            }
            _ => {
                tracing::debug!(error = %self, "Portal error");
            }
        }
    }
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_message_passes_through() {
        let err = PortalError::provider(400, "Invalid login credentials");
        assert_eq!(err.to_string(), "Invalid login credentials");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_provider_server_errors_become_bad_gateway() {
        let err = PortalError::provider(500, "boom");
        assert_eq!(err.kind(), ErrorKind::BadGateway);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(PortalError::Unauthenticated.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(PortalError::NotGlobalAdmin.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            PortalError::NotGrantable("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(PortalError::ProfileNotFound.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_unreadable_provider_response_is_bad_gateway() {
        let err = PortalError::Decode("expected value".into());
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.to_app_error().action(), Some("Try again in a moment"));
    }
}
