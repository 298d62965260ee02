//! `/budgets` routes.

use crate::{
    api::{AppState, extract::CurrentUser},
    core::budget::{self, BudgetInput},
    entities::budget::Model,
    errors::Result,
};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use std::sync::Arc;

/// Routes mounted under `/budgets`.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_budgets).post(create_budget))
        .route(
            "/:id",
            get(get_budget).put(update_budget).delete(delete_budget),
        )
}

async fn list_budgets(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> Result<Json<Vec<Model>>> {
    Ok(Json(budget::list_budgets(&state.db, user.user_id).await?))
}

async fn get_budget(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Model>> {
    Ok(Json(budget::get_budget(&state.db, user.user_id, id).await?))
}

async fn create_budget(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(input): Json<BudgetInput>,
) -> Result<(StatusCode, Json<Model>)> {
    let created = budget::create_budget(&state.db, user.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_budget(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(input): Json<BudgetInput>,
) -> Result<Json<Model>> {
    Ok(Json(
        budget::update_budget(&state.db, user.user_id, id, input).await?,
    ))
}

async fn delete_budget(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    budget::delete_budget(&state.db, user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
