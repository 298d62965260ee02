//! `/categories` routes.

use crate::{
    api::{AppState, extract::CurrentUser},
    core::category::{self, CategoryInput},
    entities::category::Model,
    errors::Result,
};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use std::sync::Arc;

/// Routes mounted under `/categories`.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/:id",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
}

async fn list_categories(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> Result<Json<Vec<Model>>> {
    let categories =
        category::list_or_seed_categories(&state.db, user.user_id, &state.config.seed.categories)
            .await?;
    Ok(Json(categories))
}

async fn get_category(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Model>> {
    Ok(Json(
        category::get_category(&state.db, user.user_id, id).await?,
    ))
}

async fn create_category(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(input): Json<CategoryInput>,
) -> Result<(StatusCode, Json<Model>)> {
    let created = category::create_category(&state.db, user.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_category(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(input): Json<CategoryInput>,
) -> Result<Json<Model>> {
    Ok(Json(
        category::update_category(&state.db, user.user_id, id, input).await?,
    ))
}

async fn delete_category(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    category::delete_category(&state.db, user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
