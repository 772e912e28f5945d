//! Customer sign-up, sign-in and sign-out.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use blush_core::UserProfile;
use blush_store::accounts::SignUp;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::state::AppState;

/// Sign-in form.
#[derive(Deserialize)]
pub struct SignIn {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Response for a successful sign-up or sign-in.
#[derive(Debug, Serialize)]
pub struct SignedIn {
    pub message: &'static str,
    pub user: UserProfile,
    pub show_public_chrome: bool,
}

impl SignedIn {
    fn new(message: &'static str, user: UserProfile) -> Self {
        Self {
            message,
            show_public_chrome: user.shows_public_chrome(),
            user,
        }
    }
}

/// The current visitor, as the page chrome needs it.
#[derive(Debug, Serialize)]
pub struct Me {
    pub user: Option<UserProfile>,
    /// Header, footer and marketing chrome; hidden for admins.
    pub show_public_chrome: bool,
}

async fn start_session(session: &Session, user: &UserProfile) -> Result<()> {
    set_current_user(session, &CurrentUser::from(user)).await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));
    Ok(())
}

/// `POST /api/auth/sign-up`
#[instrument(skip_all)]
pub async fn sign_up(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<SignUp>,
) -> Result<(StatusCode, Json<SignedIn>)> {
    let user = state
        .accounts()
        .sign_up(form)
        .await
        .map_err(AppError::account("Signup failed"))?;
    start_session(&session, &user).await?;

    tracing::info!(user_id = %user.id, "Customer signed up");
    Ok((
        StatusCode::CREATED,
        Json(SignedIn::new("Account created successfully", user)),
    ))
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
        .sign_in(&form.email, &form.password)
        .await
        .map_err(AppError::account("Login failed"))?;
    start_session(&session, &user).await?;

    tracing::info!(user_id = %user.id, "User signed in");
    Ok(Json(SignedIn::new("Login Successful", user)))
}

/// `POST /api/auth/sign-out`
#[instrument(skip_all)]
pub async fn sign_out(session: Session) -> Result<StatusCode> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/auth/me`
///
/// A session pointing at a deleted account reads as signed out.
#[instrument(skip_all)]
pub async fn me(
    State(state): State<AppState>,
    OptionalAuth(current): OptionalAuth,
) -> Result<Json<Me>> {
    let user = match current {
        Some(current) => state.accounts().current_user(current.id).await?,
        None => None,
    };
    let show_public_chrome = user.as_ref().is_none_or(UserProfile::shows_public_chrome);
    Ok(Json(Me {
        user,
        show_public_chrome,
    }))
}
