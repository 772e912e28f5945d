//! Admin sign-in and sign-out.
//!
//! Only accounts with the admin role get a console session.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use blush_core::UserProfile;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{RequireAdmin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SignIn {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SignedIn {
    pub message: &'static str,
    pub user: UserProfile,
}

/// `POST /api/auth/sign-in`
#[instrument(skip_all)]
pub async fn sign_in(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<SignIn>,
) -> Result<Json<SignedIn>> {
    let user = state
        .accounts()
        .sign_in_admin(&form.email, &form.password)
        .await
        .map_err(AppError::account("Login failed"))?;

    set_current_admin(&session, &CurrentAdmin::from(&user)).await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));
    tracing::info!(user_id = %user.id, "Admin signed in");

    Ok(Json(SignedIn {
        message: "Login Successful",
        user,
    }))
}

/// `POST /api/auth/sign-out`
#[instrument(skip_all)]
pub async fn sign_out(session: Session) -> Result<StatusCode> {
    session.flush().await?;
    clear_sentry_user();
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/auth/me`
pub async fn me(RequireAdmin(admin): RequireAdmin) -> Json<UserProfile> {
    Json(admin)
}
