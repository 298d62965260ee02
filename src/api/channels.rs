//! `/channels` routes. The first listing seeds the configured default channels.

use crate::{
    api::{AppState, extract::CurrentUser},
    core::channel::{self, ChannelInput},
    entities::channel::Model,
    errors::Result,
};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use std::sync::Arc;

/// Routes mounted under `/channels`.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_channels).post(create_channel))
        .route(
            "/:id",
            get(get_channel).put(update_channel).delete(delete_channel),
        )
}

async fn list_channels(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> Result<Json<Vec<Model>>> {
    let channels =
        channel::list_or_seed_channels(&state.db, user.user_id, &state.config.seed.channels)
            .await?;
    Ok(Json(channels))
}

async fn get_channel(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Model>> {
    Ok(Json(channel::get_channel(&state.db, user.user_id, id).await?))
}

async fn create_channel(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(input): Json<ChannelInput>,
) -> Result<(StatusCode, Json<Model>)> {
    let created = channel::create_channel(&state.db, user.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_channel(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(input): Json<ChannelInput>,
) -> Result<Json<Model>> {
    Ok(Json(
        channel::update_channel(&state.db, user.user_id, id, input).await?,
    ))
}

async fn delete_channel(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    channel::delete_channel(&state.db, user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
