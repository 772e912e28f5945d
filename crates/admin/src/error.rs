//! Unified error handling for admin.
//!
//! Every error renders as `{ "error": "...", "field": "..." }` with `field`
//! only present for sign-in problems tied to one input.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use blush_core::ProductError;
use blush_store::StoreError;
use blush_store::accounts::AccountError;

const GENERIC_MESSAGE: &str = "Something went wrong";

/// Application-level error type for the admin console.
#[derive(Debug, Error)]
pub enum AppError {
    /// A store call failed; `message` is the notification shown to the admin.
    #[error("{message}: {source}")]
    Store {
        message: &'static str,
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    Product(#[from] ProductError),

    #[error("{source}")]
    Account {
        fallback: &'static str,
        #[source]
        source: AccountError,
    },

    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Not signed in.
    #[error("{0}")]
    Unauthorized(String),

    /// Signed in, but not an admin.
    #[error("{0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("{0}")]
    BadRequest(String),
}

impl From<StoreError> for AppError {
    fn from(source: StoreError) -> Self {
        Self::Store {
            message: GENERIC_MESSAGE,
            source,
        }
    }
}

impl AppError {
    pub fn store(message: &'static str) -> impl Fn(StoreError) -> Self {
        move |source| Self::Store { message, source }
    }

    pub fn account(fallback: &'static str) -> impl Fn(AccountError) -> Self {
        move |source| Self::Account { fallback, source }
    }

    fn is_server_error(&self) -> bool {
        match self {
            Self::Store { source, .. } => source.is_backend(),
            Self::Account { source, .. } => match source {
                AccountError::PasswordHash => true,
                AccountError::Store(err) => err.is_backend(),
                _ => false,
            },
            Self::Session(_) => true,
            Self::Product(_)
            | Self::NotFound(_)
            | Self::Unauthorized(_)
            | Self::Forbidden(_)
            | Self::BadRequest(_) => false,
        }
    }

    fn status(&self) -> StatusCode {
        if self.is_server_error() {
            return StatusCode::INTERNAL_SERVER_ERROR;
        }
        match self {
            Self::Store { source, .. } => match source {
                StoreError::NotFound => StatusCode::NOT_FOUND,
                StoreError::PriceOverflow(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::CONFLICT,
            },
            Self::Account { source, .. } => match source {
                AccountError::UserNotFound | AccountError::WrongPassword => {
                    StatusCode::UNAUTHORIZED
                }
                AccountError::NotAdmin => StatusCode::FORBIDDEN,
                _ => StatusCode::BAD_REQUEST,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Product(_) | Self::BadRequest(_) | Self::Session(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn public_message(&self) -> String {
        match self {
            Self::Store { message, source } if source.is_backend() => (*message).to_owned(),
            Self::Store { source, .. } => match source {
                StoreError::NotFound => "Not found".to_owned(),
                other => other.to_string(),
            },
            Self::Account { fallback, source } if source.field().is_none() => {
                (*fallback).to_owned()
            }
            Self::Session(_) => GENERIC_MESSAGE.to_owned(),
            _ => self.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        }

        let field = match &self {
            Self::Account { source, .. } => source.field(),
            _ => None,
        };
        let body = ErrorBody {
            error: self.public_message(),
            field,
        };

        (self.status(), Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context after sign-in.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| scope.set_user(None));
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;
    use blush_core::OrderStatus;

    use super::*;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_product_form_error() {
        let (status, body) = render(ProductError::MissingField("Name").into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Name is required");
    }

    #[tokio::test]
    async fn test_backend_failure_shows_notification() {
        let err = AppError::store("Failed to delete product")(StoreError::DataCorruption(
            "bad row".to_owned(),
        ));
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to delete product");
    }

    #[tokio::test]
    async fn test_invalid_transition_is_conflict() {
        let err = AppError::store("Failed to update order")(StoreError::InvalidTransition {
            from: OrderStatus::Delivered,
            to: OrderStatus::Pending,
        });
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(
            body["error"],
            "order status cannot change from Delivered to Pending"
        );
    }

    #[tokio::test]
    async fn test_non_admin_sign_in() {
        let err = AppError::account("Login failed")(AccountError::NotAdmin);
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["field"], "email");
        assert_eq!(body["error"], "This account does not have admin access");
    }

    #[tokio::test]
    async fn test_missing_product_is_not_found() {
        let (status, body) = render(StoreError::NotFound.into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not found");
    }
}
