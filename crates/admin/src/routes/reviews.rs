//! Review listing.

use axum::{Json, extract::State};

use blush_core::Review;

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// `GET /api/reviews`
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<Review>>> {
    let reviews = state
        .store()
        .list_reviews()
        .await
        .map_err(AppError::store("Failed to load reviews"))?;
    Ok(Json(reviews))
}
