//! `/auth` routes: account creation, sign-in and account maintenance.

use crate::{
    api::{AppState, extract::CurrentUser},
    core::auth::{AuthBackend, Session, SignUpMetadata},
    errors::Result,
};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{delete, post, put},
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct SignUpRequest {
    email: String,
    password: String,
    #[serde(flatten)]
    metadata: SignUpMetadata,
}

#[derive(Debug, Deserialize)]
struct SignInRequest {
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct PasswordRequest {
    password: String,
}

#[derive(Debug, Deserialize)]
struct EmailRequest {
    email: String,
}

/// Routes mounted under `/auth`.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sign-up", post(sign_up))
        .route("/sign-in", post(sign_in))
        .route("/sign-out", post(sign_out))
        .route("/refresh", post(refresh))
        .route("/password", put(update_password))
        .route("/email", put(update_email))
        .route("/account", delete(delete_account))
}

async fn sign_up(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<Session>)> {
    let session = state
        .auth
        .sign_up(&request.email, &request.password, request.metadata)
        .await?;
    Ok((StatusCode::CREATED, Json(session)))
}

async fn sign_in(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SignInRequest>,
) -> Result<Json<Session>> {
    Ok(Json(
        state.auth.sign_in(&request.email, &request.password).await?,
    ))
}

async fn sign_out(State(state): State<Arc<AppState>>, user: CurrentUser) -> Result<StatusCode> {
    state.auth.sign_out(&user.token).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn refresh(State(state): State<Arc<AppState>>, user: CurrentUser) -> Result<Json<Session>> {
    Ok(Json(state.auth.refresh(&user.token).await?))
}

async fn update_password(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(request): Json<PasswordRequest>,
) -> Result<StatusCode> {
    state
        .auth
        .update_password(user.user_id, &request.password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn update_email(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(request): Json<EmailRequest>,
) -> Result<Json<Value>> {
    let email = state.auth.update_email(user.user_id, &request.email).await?;
    Ok(Json(json!({ "email": email })))
}

async fn delete_account(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> Result<StatusCode> {
    state.auth.delete_account(user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
