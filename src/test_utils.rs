//! Shared test utilities for fintrack.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.
#![allow(clippy::expect_used)]

use crate::{
    core::{
        auth::LocalAuth,
        budget::BudgetInput,
        channel::{self as channel_ops, ChannelInput},
        transaction::{self as transaction_ops, TransactionInput},
    },
    entities::{
        budget::{self, BudgetPeriod},
        channel,
        transaction::{self, TransactionKind},
        user,
    },
    errors::Result,
};
use argon2::Params;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Fixed "today" so date-sensitive tests do not depend on the clock.
#[must_use]
pub fn test_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date")
}

/// Cheapest argon2 parameters, so sign-up and sign-in tests stay fast.
#[must_use]
pub fn fast_params() -> Params {
    Params::new(Params::MIN_M_COST, Params::MIN_T_COST, Params::MIN_P_COST, None)
        .expect("valid argon2 params")
}

/// Account service over `db` with a one hour session lifetime.
#[must_use]
pub fn test_auth(db: &DatabaseConnection) -> LocalAuth {
    LocalAuth::with_params(db.clone(), chrono::Duration::minutes(60), fast_params())
}

/// Inserts a user directly, skipping password hashing.
///
/// The stored hash is not a valid PHC string, so this user cannot sign in.
pub async fn create_test_user(db: &DatabaseConnection, email: &str) -> Result<user::Model> {
    let model = user::ActiveModel {
        email: Set(email.to_string()),
        password_hash: Set("not-a-real-hash".to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    Ok(model.insert(db).await?)
}

/// Creates a channel named `name` with a generic icon.
pub async fn create_test_channel(
    db: &DatabaseConnection,
    user_id: i64,
    name: &str,
) -> Result<channel::Model> {
    channel_ops::create_channel(
        db,
        user_id,
        ChannelInput {
            name: name.to_string(),
            icon: "💳".to_string(),
            color: None,
        },
    )
    .await
}

/// A valid one-off transaction input dated [`test_today`] in category "Food".
#[must_use]
pub fn transaction_input(kind: TransactionKind, amount: i64, channel_id: i64) -> TransactionInput {
    TransactionInput {
        amount: Decimal::from(amount),
        kind,
        date: test_today(),
        description: "Test transaction".to_string(),
        category: "Food".to_string(),
        channel_id: Some(channel_id),
        is_recurring: false,
        frequency: None,
        next_date: None,
        end_date: None,
    }
}

/// Creates a one-off "Food" transaction dated [`test_today`].
pub async fn create_test_transaction(
    db: &DatabaseConnection,
    user_id: i64,
    channel_id: i64,
    kind: TransactionKind,
    amount: i64,
) -> Result<transaction::Model> {
    create_categorized_transaction(db, user_id, channel_id, kind, amount, "Food").await
}

/// Creates a one-off transaction dated [`test_today`] in `category`.
pub async fn create_categorized_transaction(
    db: &DatabaseConnection,
    user_id: i64,
    channel_id: i64,
    kind: TransactionKind,
    amount: i64,
    category: &str,
) -> Result<transaction::Model> {
    let input = TransactionInput {
        category: category.to_string(),
        ..transaction_input(kind, amount, channel_id)
    };
    transaction_ops::create_transaction(db, user_id, input, test_today()).await
}

/// A monthly budget input starting at the beginning of 2025.
#[must_use]
pub fn budget_input(category: &str, amount: i64) -> BudgetInput {
    BudgetInput {
        category: category.to_string(),
        amount: Decimal::from(amount),
        period: BudgetPeriod::Monthly,
        start_date: NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date"),
    }
}

/// Creates a monthly budget starting at the beginning of 2025.
pub async fn create_test_budget(
    db: &DatabaseConnection,
    user_id: i64,
    category: &str,
    amount: i64,
) -> Result<budget::Model> {
    crate::core::budget::create_budget(db, user_id, budget_input(category, amount)).await
}

/// In-memory channel for pure aggregation tests.
#[must_use]
pub fn sample_channel(id: i64, name: &str) -> channel::Model {
    channel::Model {
        id,
        user_id: 1,
        name: name.to_string(),
        icon: "💳".to_string(),
        color: None,
    }
}

/// In-memory one-off transaction dated [`test_today`] for pure aggregation tests.
#[must_use]
pub fn sample_transaction(
    kind: TransactionKind,
    amount: Decimal,
    category: &str,
    channel_id: i64,
) -> transaction::Model {
    transaction::Model {
        id: 0,
        user_id: 1,
        amount,
        kind,
        date: test_today(),
        description: "Sample".to_string(),
        category: category.to_string(),
        channel_id,
        is_recurring: false,
        frequency: None,
        next_date: None,
        end_date: None,
        created_at: chrono::DateTime::UNIX_EPOCH,
    }
}

/// In-memory budget starting at the beginning of 2025.
#[must_use]
pub fn sample_budget(
    id: i64,
    category: &str,
    amount: Decimal,
    period: BudgetPeriod,
) -> budget::Model {
    budget::Model {
        id,
        user_id: 1,
        category: category.to_string(),
        amount,
        period,
        start_date: NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date"),
    }
}
