//! Authentication extractor for admin.
//!
//! The session only remembers who signed in. [`RequireAdmin`] reloads the
//! profile on every request, so a deleted or demoted account is turned
//! away immediately and its session dropped.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use blush_core::UserProfile;

use crate::error::AppError;
use crate::models::{CurrentAdmin, session_keys};
use crate::state::AppState;

/// Extractor that requires a signed-in admin.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAdmin(admin): RequireAdmin) -> String {
///     format!("Hello, {}!", admin.email)
/// }
/// ```
pub struct RequireAdmin(pub UserProfile);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or_else(|| AppError::Unauthorized("Please sign in".to_owned()))?;

        let admin: CurrentAdmin = session
            .get(session_keys::CURRENT_ADMIN)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Please sign in".to_owned()))?;

        let profile = state
            .accounts()
            .current_user(admin.id)
            .await
            .map_err(AppError::account("Something went wrong"))?;

        match profile {
            Some(profile) if profile.is_admin() => Ok(Self(profile)),
            Some(profile) => {
                tracing::warn!(user_id = %profile.id, "Admin session for a non-admin account");
                session.flush().await?;
                Err(AppError::Forbidden(
                    "This account does not have admin access".to_owned(),
                ))
            }
            None => {
                session.flush().await?;
                Err(AppError::Unauthorized("Please sign in".to_owned()))
            }
        }
    }
}

/// Store the signed-in admin, rotating the session id first.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_admin(
    session: &Session,
    admin: &CurrentAdmin,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_ADMIN, admin).await
}
