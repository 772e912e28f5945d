//! Profile editing for signed-in customers.

use axum::{Json, extract::State};
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use blush_core::UserProfile;
use blush_store::accounts::ProfileUpdate;

use crate::error::{AppError, Result};
use crate::middleware::{RequireAuth, set_current_user};
use crate::models::CurrentUser;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProfileUpdated {
    pub message: &'static str,
    pub user: UserProfile,
}

/// `POST /api/account/profile`
#[instrument(skip_all)]
pub async fn update_profile(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    session: Session,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<ProfileUpdated>> {
    let user = state
        .accounts()
        .update_profile(current.id, update)
        .await
        .map_err(AppError::account("Failed to update profile"))?;

    tracing::info!(user_id = %user.id, "Profile updated");

    let refreshed = CurrentUser::from(&user);
    if refreshed != current {
        set_current_user(&session, &refreshed).await?;
    }

    Ok(Json(ProfileUpdated {
        message: "Profile updated successfully",
        user,
    }))
}
