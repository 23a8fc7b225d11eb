//! Statistics endpoint routes.

use axum::{extract::State, routing::get, Json, Router};

use crate::db::{self, StatsSnapshot};
use crate::error::Result;
use crate::AppState;

/// Create stats routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/stats", get(stats))
}

/// GET /api/stats - The aggregated snapshot, recomputed on every request.
async fn stats(State(state): State<AppState>) -> Result<Json<StatsSnapshot>> {
    let snapshot = db::compute_stats(&state.pool).await?;
    Ok(Json(snapshot))
}
