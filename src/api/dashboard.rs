//! `GET /dashboard`.

use crate::{
    api::{AppState, extract::CurrentUser, today},
    core::report::{self, DashboardReport},
    errors::Result,
};
use axum::{Json, Router, extract::State, routing::get};
use std::sync::Arc;

/// Routes mounted at `/dashboard`.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(dashboard))
}

async fn dashboard(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> Result<Json<DashboardReport>> {
    let report = report::generate_dashboard(
        &state.db,
        user.user_id,
        today(),
        state.config.budgets.scope,
    )
    .await?;
    Ok(Json(report))
}
