//! Bearer-token authentication for handlers.

use crate::{api::AppState, errors::Error};
use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use std::sync::Arc;

/// The authenticated caller of a request.
///
/// Extraction fails with [`Error::Unauthorized`] when the `Authorization: Bearer` header
/// is missing or unknown, and with [`Error::SessionExpired`] when the token has lapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    /// Owner id every query is scoped by
    pub user_id: i64,
    /// The bearer token the request carried
    pub token: String,
}

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| Error::Unauthorized)?;
        let user_id = state.auth.authenticate(bearer.token()).await?;
        Ok(Self {
            user_id,
            token: bearer.token().to_string(),
        })
    }
}
