//! Review handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use tracing::instrument;

use blush_core::{Review, ReviewRequest};

use crate::error::Result;
use crate::services::ReviewService;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ReviewSubmitted {
    pub message: &'static str,
    pub review: Review,
}

/// `GET /api/reviews`
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Review>>> {
    Ok(Json(ReviewService::new(state.store()).list().await?))
}

/// `POST /api/reviews`
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<ReviewRequest>,
) -> Result<(StatusCode, Json<ReviewSubmitted>)> {
    let review = ReviewService::new(state.store()).submit(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ReviewSubmitted {
            message: "Review submitted successfully",
            review,
        }),
    ))
}
