//! `/profile` routes.

use crate::{
    api::{AppState, extract::CurrentUser},
    core::profile::{self, ProfileInput},
    entities::profile::Model,
    errors::Result,
};
use axum::{Json, Router, extract::State, routing::get};
use std::sync::Arc;

/// Routes mounted at `/profile`.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(get_profile).put(update_profile))
}

async fn get_profile(State(state): State<Arc<AppState>>, user: CurrentUser) -> Result<Json<Model>> {
    Ok(Json(profile::get_profile(&state.db, user.user_id).await?))
}

async fn update_profile(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(input): Json<ProfileInput>,
) -> Result<Json<Model>> {
    Ok(Json(
        profile::update_profile(&state.db, user.user_id, input).await?,
    ))
}
