//! JSON HTTP API.
//!
//! Thin axum handlers over [`crate::core`]. Every route except `/health`, sign-up and
//! sign-in needs an `Authorization: Bearer <token>` header, and every data route only
//! ever sees the caller's own rows.

use crate::{config::AppConfig, core::auth::LocalAuth, errors::Result};
use axum::{Json, Router, routing::get};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use std::{future::Future, sync::Arc};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

mod auth;
mod budgets;
mod categories;
mod channels;
mod dashboard;
mod error;
/// Authenticated-caller extractor
pub mod extract;
mod profile;
mod transactions;

/// Shared state handed to every handler.
#[derive(Debug)]
pub struct AppState {
    /// Database connection pool
    pub db: DatabaseConnection,
    /// Account and session service
    pub auth: Arc<LocalAuth>,
    /// Loaded configuration
    pub config: Arc<AppConfig>,
}

/// Reference day for date validation and budget periods, in the server's local time zone.
fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Builds the complete application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .nest("/auth", auth::routes())
        .nest("/profile", profile::routes())
        .nest("/transactions", transactions::routes())
        .nest("/channels", channels::routes())
        .nest("/categories", categories::routes())
        .nest("/budgets", budgets::routes())
        .nest("/dashboard", dashboard::routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

/// Serves the API on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    info!(addr = %listener.local_addr()?, "Listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{setup_test_db, test_auth};
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode, header},
    };
    use rust_decimal::Decimal;
    use tower::ServiceExt;

    async fn test_app() -> Router {
        let db = setup_test_db().await.unwrap();
        let auth = Arc::new(test_auth(&db));
        router(AppState {
            db,
            auth,
            config: Arc::new(AppConfig::default()),
        })
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn sign_up(app: &Router, email: &str) -> String {
        let (status, body) = send(
            app,
            Method::POST,
            "/auth/sign-up",
            None,
            Some(json!({
                "email": email,
                "password": "Sup3r-secret",
                "first_name": "Ana",
                "last_name": "Lima"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["token"].as_str().unwrap().to_string()
    }

    fn decimal(value: &Value) -> Decimal {
        match value {
            Value::String(s) => s.parse().unwrap(),
            other => other.to_string().parse().unwrap(),
        }
    }

    fn transaction_body(kind: &str, amount: &str, category: &str, channel_id: i64) -> Value {
        json!({
            "amount": amount,
            "kind": kind,
            "date": "2024-03-10",
            "description": "Test",
            "category": category,
            "channel_id": channel_id
        })
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app().await;
        let (status, body) = send(&app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_data_routes_require_a_token() {
        let app = test_app().await;
        for uri in ["/transactions", "/channels", "/dashboard", "/profile"] {
            let (status, _) = send(&app, Method::GET, uri, None, None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        }
        let (status, _) = send(&app, Method::GET, "/budgets", Some("bogus"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_sign_in_errors() {
        let app = test_app().await;
        sign_up(&app, "ana@example.com").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/auth/sign-in",
            None,
            Some(json!({ "email": "ana@example.com", "password": "Wr0ng-pass" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid credentials");

        let (status, _) = send(
            &app,
            Method::POST,
            "/auth/sign-up",
            None,
            Some(json!({ "email": "ana@example.com", "password": "Sup3r-secret" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = send(
            &app,
            Method::POST,
            "/auth/sign-in",
            None,
            Some(json!({ "email": "ana@example.com", "password": "Sup3r-secret" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_profile_from_sign_up_metadata() {
        let app = test_app().await;
        let token = sign_up(&app, "ana@example.com").await;

        let (status, body) = send(&app, Method::GET, "/profile", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["first_name"], "Ana");

        let (status, _) = send(
            &app,
            Method::PUT,
            "/profile",
            Some(&token),
            Some(json!({ "first_name": "", "last_name": "Lima" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_transactions_and_dashboard_flow() {
        let app = test_app().await;
        let token = sign_up(&app, "ana@example.com").await;

        let (status, channels) = send(&app, Method::GET, "/channels", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        let channels = channels.as_array().unwrap().clone();
        assert_eq!(channels.len(), 2);
        let a = channels[0]["id"].as_i64().unwrap();
        let b = channels[1]["id"].as_i64().unwrap();

        for body in [
            transaction_body("income", "1000", "Salary", a),
            transaction_body("expense", "300", "Food", a),
            transaction_body("expense", "150", "Transport", b),
        ] {
            let (status, _) = send(&app, Method::POST, "/transactions", Some(&token), Some(body)).await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, body) = send(&app, Method::GET, "/dashboard", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        let stats = &body["stats"];
        assert_eq!(decimal(&stats["total_income"]), Decimal::from(1000));
        assert_eq!(decimal(&stats["total_expenses"]), Decimal::from(450));
        assert_eq!(decimal(&stats["current_balance"]), Decimal::from(550));
        assert_eq!(decimal(&stats["channel_balances"][a.to_string()]), Decimal::from(700));
        assert_eq!(decimal(&stats["channel_balances"][b.to_string()]), Decimal::from(-150));
        assert_eq!(body["category_totals"][0]["category"], "Food");
        assert_eq!(body["category_totals"][1]["category"], "Transport");

        let (status, listed) = send(
            &app,
            Method::GET,
            "/transactions?kind=expense&order=asc",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_transactions_are_rejected() {
        let app = test_app().await;
        let token = sign_up(&app, "ana@example.com").await;
        let (_, channels) = send(&app, Method::GET, "/channels", Some(&token), None).await;
        let channel_id = channels[0]["id"].as_i64().unwrap();

        let mut future = transaction_body("expense", "10", "Food", channel_id);
        future["date"] = json!("2999-01-01");
        let zero = transaction_body("expense", "0", "Food", channel_id);
        let mut no_channel = transaction_body("expense", "10", "Food", channel_id);
        no_channel["channel_id"] = Value::Null;

        for body in [future, zero, no_channel] {
            let (status, response) =
                send(&app, Method::POST, "/transactions", Some(&token), Some(body)).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
            assert!(response["error"].as_str().unwrap().starts_with("Validation failed"));
        }

        let (_, listed) = send(&app, Method::GET, "/transactions", Some(&token), None).await;
        assert!(listed.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_other_users_rows_are_not_found() {
        let app = test_app().await;
        let ana = sign_up(&app, "ana@example.com").await;
        let bob = sign_up(&app, "bob@example.com").await;

        let (_, channels) = send(&app, Method::GET, "/channels", Some(&ana), None).await;
        let channel_id = channels[0]["id"].as_i64().unwrap();
        let (_, created) = send(
            &app,
            Method::POST,
            "/transactions",
            Some(&ana),
            Some(transaction_body("expense", "25", "Food", channel_id)),
        )
        .await;
        let uri = format!("/transactions/{}", created["id"]);

        let (status, _) = send(&app, Method::GET, &uri, Some(&bob), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, Method::DELETE, &uri, Some(&bob), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::DELETE, &uri, Some(&ana), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::GET, &uri, Some(&ana), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_budget_crud_over_http() {
        let app = test_app().await;
        let token = sign_up(&app, "ana@example.com").await;

        let (status, created) = send(
            &app,
            Method::POST,
            "/budgets",
            Some(&token),
            Some(json!({
                "category": "Food",
                "amount": "200",
                "period": "monthly",
                "start_date": "2024-01-01"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let uri = format!("/budgets/{}", created["id"]);

        let (status, updated) = send(
            &app,
            Method::PUT,
            &uri,
            Some(&token),
            Some(json!({
                "category": "Food",
                "amount": "350",
                "period": "yearly",
                "start_date": "2024-01-01"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["period"], "yearly");
        assert_eq!(decimal(&updated["amount"]), Decimal::from(350));

        let (_, body) = send(&app, Method::GET, "/dashboard", Some(&token), None).await;
        assert_eq!(body["budget_progress"][0]["status"], "ok");

        let (status, _) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_sign_out_and_delete_account() {
        let app = test_app().await;
        let token = sign_up(&app, "ana@example.com").await;

        let (status, refreshed) = send(&app, Method::POST, "/auth/refresh", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(refreshed["token"], token.as_str());

        let (status, _) = send(&app, Method::POST, "/auth/sign-out", Some(&token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::GET, "/profile", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (_, session) = send(
            &app,
            Method::POST,
            "/auth/sign-in",
            None,
            Some(json!({ "email": "ana@example.com", "password": "Sup3r-secret" })),
        )
        .await;
        let token = session["token"].as_str().unwrap().to_string();

        let (status, _) = send(&app, Method::DELETE, "/auth/account", Some(&token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(
            &app,
            Method::POST,
            "/auth/sign-in",
            None,
            Some(json!({ "email": "ana@example.com", "password": "Sup3r-secret" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
