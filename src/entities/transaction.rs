//! Transaction entity - A single money movement.
//!
//! The `amount` is always positive; whether it adds to or subtracts from a balance is
//! decided by `kind`. Recurrence fields (`frequency`, `next_date`, `end_date`) are inert
//! metadata and only set when `is_recurring` is true.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Direction of a money movement.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming in
    #[sea_orm(string_value = "income")]
    Income,
    /// Money going out
    #[sea_orm(string_value = "expense")]
    Expense,
}

/// How often a recurring transaction repeats.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Every day
    #[sea_orm(string_value = "daily")]
    Daily,
    /// Every seven days
    #[sea_orm(string_value = "weekly")]
    Weekly,
    /// Same day every calendar month
    #[sea_orm(string_value = "monthly")]
    Monthly,
    /// Same day every calendar year
    #[sea_orm(string_value = "yearly")]
    Yearly,
}

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of the transaction
    pub user_id: i64,
    /// Positive amount; sign comes from `kind`
    pub amount: Decimal,
    /// Income or expense
    pub kind: TransactionKind,
    /// Calendar date of the movement
    pub date: Date,
    /// User-facing label
    pub description: String,
    /// Category label the transaction is filed under
    pub category: String,
    /// Channel the money moved through; may outlive the channel itself
    pub channel_id: i64,
    /// Whether the transaction repeats
    pub is_recurring: bool,
    /// Repeat frequency, only for recurring transactions
    pub frequency: Option<Frequency>,
    /// Next scheduled occurrence (advisory)
    pub next_date: Option<Date>,
    /// Last date the recurrence applies
    pub end_date: Option<Date>,
    /// When the row was created
    pub created_at: DateTimeUtc,
}

/// Transactions reference channels by id without a foreign key so that deleting a
/// channel leaves its transactions in place.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
