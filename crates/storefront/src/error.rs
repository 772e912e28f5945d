//! Unified error handling with Sentry integration.
//!
//! Handlers return [`Result<T>`]. Every error renders as a JSON body:
//!
//! ```json
//! { "error": "Wrong password", "field": "password" }
//! ```
//!
//! `field` is present when the message belongs to one form input. Backend
//! failures are captured to Sentry and answered with a generic message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use blush_core::{OrderError, ReviewError};
use blush_store::StoreError;
use blush_store::accounts::AccountError;

const GENERIC_MESSAGE: &str = "Something went wrong";

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// A store call failed; `message` is what the customer sees.
    #[error("{message}: {source}")]
    Store {
        message: &'static str,
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Review(#[from] ReviewError),

    /// Account operation failed; `fallback` is shown for non-field failures.
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

    /// User is not authenticated.
    #[error("{0}")]
    Unauthorized(String),

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

impl From<AccountError> for AppError {
    fn from(source: AccountError) -> Self {
        Self::Account {
            fallback: GENERIC_MESSAGE,
            source,
        }
    }
}

impl AppError {
    /// Wrap store errors with the notification a failed action shows.
    pub fn store(message: &'static str) -> impl Fn(StoreError) -> Self {
        move |source| Self::Store { message, source }
    }

    /// Wrap account errors, showing `fallback` for anything without a field.
    pub fn account(fallback: &'static str) -> impl Fn(AccountError) -> Self {
        move |source| Self::Account { fallback, source }
    }

    /// Whether this is our fault rather than the client's.
    fn is_server_error(&self) -> bool {
        match self {
            Self::Store { source, .. } => source.is_backend(),
            Self::Account { source, .. } => account_is_server_error(source),
            Self::Session(_) => true,
            Self::Order(_)
            | Self::Review(_)
            | Self::NotFound(_)
            | Self::Unauthorized(_)
            | Self::BadRequest(_) => false,
        }
    }

    fn status(&self) -> StatusCode {
        if self.is_server_error() {
            return StatusCode::INTERNAL_SERVER_ERROR;
        }
        match self {
            Self::Store { source, .. } => store_status(source),
            Self::Order(err) => match err {
                OrderError::ProductNotFound(_) => StatusCode::NOT_FOUND,
                OrderError::InsufficientStock(_) => StatusCode::CONFLICT,
                OrderError::MissingField(_)
                | OrderError::InvalidEmail(_)
                | OrderError::InvalidQuantity(_) => StatusCode::BAD_REQUEST,
            },
            Self::Account { source, .. } => match source {
                AccountError::UserNotFound | AccountError::WrongPassword => {
                    StatusCode::UNAUTHORIZED
                }
                AccountError::EmailInUse => StatusCode::CONFLICT,
                AccountError::NotAdmin => StatusCode::FORBIDDEN,
                AccountError::Store(err) => store_status(err),
                _ => StatusCode::BAD_REQUEST,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Review(_) | Self::BadRequest(_) | Self::Session(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// The message shown to the client. Internal details never leak.
    fn public_message(&self) -> String {
        match self {
            Self::Store { message, source } if source.is_backend() => (*message).to_owned(),
            Self::Store { source, .. } => source.to_string(),
            Self::Account { fallback, source } if source.field().is_none() => {
                (*fallback).to_owned()
            }
            Self::Session(_) => GENERIC_MESSAGE.to_owned(),
            _ => self.to_string(),
        }
    }
}

const fn account_is_server_error(err: &AccountError) -> bool {
    match err {
        AccountError::PasswordHash => true,
        AccountError::Store(source) => source.is_backend(),
        _ => false,
    }
}

const fn store_status(err: &StoreError) -> StatusCode {
    match err {
        StoreError::NotFound => StatusCode::NOT_FOUND,
        StoreError::Conflict(_)
        | StoreError::InsufficientStock(_)
        | StoreError::InvalidTransition { .. } => StatusCode::CONFLICT,
        StoreError::PriceOverflow(_) => StatusCode::BAD_REQUEST,
        StoreError::Database(_) | StoreError::DataCorruption(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// JSON error body.
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
                "Request error"
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

/// Clear the Sentry user context on sign-out.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Record a customer action on the Sentry breadcrumb trail.
pub fn add_breadcrumb(category: &str, message: &str, data: &[(&str, String)]) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_owned()),
        message: Some(message.to_owned()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    for (key, value) in data {
        breadcrumb
            .data
            .insert((*key).to_owned(), serde_json::Value::String(value.clone()));
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;
    use blush_core::{InsufficientStock, ProductId};

    use super::*;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_order_errors() {
        let (status, body) = render(OrderError::MissingField("Name").into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Name is required");

        let (status, body) =
            render(OrderError::InsufficientStock(InsufficientStock { available: 2 }).into()).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Only 2 items available in stock");

        let (status, _) = render(OrderError::ProductNotFound(ProductId::new(9)).into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_account_errors_carry_field() {
        let (status, body) = render(AccountError::WrongPassword.into()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["field"], "password");
        assert_eq!(body["error"], "Wrong password");

        let (status, body) = render(AccountError::EmailInUse.into()).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["field"], "email");
    }

    #[tokio::test]
    async fn test_backend_errors_are_generic() {
        let err = AppError::store("Failed to load products")(StoreError::DataCorruption(
            "product 7 stock -1".to_owned(),
        ));
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to load products");
        assert!(body.get("field").is_none());

        let err = AppError::account("Signup failed")(AccountError::PasswordHash);
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Signup failed");
    }

    #[tokio::test]
    async fn test_client_store_errors_pass_through() {
        let (status, body) = render(StoreError::NotFound.into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not found");
    }

    #[tokio::test]
    async fn test_simple_variants() {
        let (status, body) = render(AppError::NotFound("Product not found".to_owned())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Product not found");

        let (status, _) = render(AppError::Unauthorized("Sign in required".to_owned())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = render(ReviewError::InvalidRating.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Rating must be between 1 and 5");
    }
}
