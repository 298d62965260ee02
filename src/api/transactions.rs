//! `/transactions` routes.
//!
//! `GET /transactions` accepts `order=asc|desc`, `kind`, `category` and `channel_id` as
//! query parameters.

use crate::{
    api::{AppState, extract::CurrentUser, today},
    core::transaction::{self, TransactionFilter, TransactionInput},
    entities::transaction::Model,
    errors::Result,
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use std::sync::Arc;

/// Routes mounted under `/transactions`.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_transactions).post(create_transaction))
        .route(
            "/:id",
            get(get_transaction)
                .put(update_transaction)
                .delete(delete_transaction),
        )
}

async fn list_transactions(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Query(filter): Query<TransactionFilter>,
) -> Result<Json<Vec<Model>>> {
    Ok(Json(
        transaction::list_transactions(&state.db, user.user_id, &filter).await?,
    ))
}

async fn get_transaction(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Model>> {
    Ok(Json(
        transaction::get_transaction(&state.db, user.user_id, id).await?,
    ))
}

async fn create_transaction(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(input): Json<TransactionInput>,
) -> Result<(StatusCode, Json<Model>)> {
    let created = transaction::create_transaction(&state.db, user.user_id, input, today()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_transaction(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(input): Json<TransactionInput>,
) -> Result<Json<Model>> {
    Ok(Json(
        transaction::update_transaction(&state.db, user.user_id, id, input, today()).await?,
    ))
}

async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    transaction::delete_transaction(&state.db, user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
