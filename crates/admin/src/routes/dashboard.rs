//! Dashboard route handler.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::services::{DashboardStats, OrderViewer};
use crate::state::AppState;

/// `GET /api/dashboard`
#[instrument(skip_all)]
pub async fn stats(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<DashboardStats>> {
    let (orders, products) = OrderViewer::new(state.store()).load().await?;
    Ok(Json(DashboardStats::compute(&products, &orders)))
}
