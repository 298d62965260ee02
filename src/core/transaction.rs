//! Transaction business logic - Handles all transaction-related operations.
//!
//! Transactions are validated at the boundary, stored per owner, and never materialized
//! from recurrence: a recurring transaction is a single row carrying its frequency and the
//! advisory next date. Every read is filtered by `user_id`, so a row owned by someone else
//! behaves exactly like a row that does not exist.

use crate::{
    core::{
        channel,
        recurrence::next_occurrence_until,
        validation::{self, MAX_DESCRIPTION_LEN, MAX_NAME_LEN, ValidationError},
    },
    entities::{
        Transaction, transaction,
        transaction::{Frequency, TransactionKind},
    },
    errors::{Error, Result},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{Order, QueryOrder, Set, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Fields a user submits when creating or editing a transaction.
///
/// Recurrence fields may be omitted entirely for one-off transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInput {
    /// Positive amount
    pub amount: Decimal,
    /// Income or expense
    pub kind: TransactionKind,
    /// Calendar date, today or earlier
    pub date: NaiveDate,
    /// User-facing label
    pub description: String,
    /// Category label
    pub category: String,
    /// Channel the money moved through
    pub channel_id: Option<i64>,
    /// Whether the transaction repeats
    #[serde(default)]
    pub is_recurring: bool,
    /// Repeat frequency, required when recurring
    #[serde(default)]
    pub frequency: Option<Frequency>,
    /// Next occurrence; computed from `date` and `frequency` when omitted
    #[serde(default)]
    pub next_date: Option<NaiveDate>,
    /// Last date the recurrence applies
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

/// A [`TransactionInput`] that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionFields {
    /// Positive amount
    pub amount: Decimal,
    /// Income or expense
    pub kind: TransactionKind,
    /// Calendar date
    pub date: NaiveDate,
    /// Trimmed description
    pub description: String,
    /// Trimmed category label
    pub category: String,
    /// Channel id
    pub channel_id: i64,
    /// Whether the transaction repeats
    pub is_recurring: bool,
    /// Set only when recurring
    pub frequency: Option<Frequency>,
    /// Set only when recurring
    pub next_date: Option<NaiveDate>,
    /// Set only when recurring
    pub end_date: Option<NaiveDate>,
}

impl TransactionInput {
    /// Checks the input against `today` and normalizes it.
    ///
    /// Text is trimmed. For a one-off transaction the recurrence fields are dropped; for a
    /// recurring one the frequency is mandatory and a missing `next_date` is filled with
    /// the next occurrence after `date`, or left empty when that falls past `end_date`.
    pub fn validate(self, today: NaiveDate) -> std::result::Result<TransactionFields, ValidationError> {
        let amount = validation::validate_amount(self.amount)?;
        let description =
            validation::required_text("description", &self.description, MAX_DESCRIPTION_LEN)?;
        let category = validation::required_text("category", &self.category, MAX_NAME_LEN)?;
        let channel_id = self
            .channel_id
            .ok_or(ValidationError::Required { field: "channel" })?;
        validation::validate_transaction_date(self.date, today)?;

        let (frequency, next_date, end_date) = if self.is_recurring {
            let frequency = self.frequency.ok_or(ValidationError::MissingFrequency)?;
            match self.end_date {
                Some(end) if end < self.date => {
                    return Err(ValidationError::EndBeforeStart {
                        start: self.date,
                        end,
                    });
                }
                _ => {}
            }
            let next_date = self
                .next_date
                .or_else(|| next_occurrence_until(frequency, self.date, self.end_date));
            (Some(frequency), next_date, self.end_date)
        } else {
            (None, None, None)
        };

        Ok(TransactionFields {
            amount,
            kind: self.kind,
            date: self.date,
            description,
            category,
            channel_id,
            is_recurring: self.is_recurring,
            frequency,
            next_date,
            end_date,
        })
    }
}

/// Direction of the date ordering when listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Oldest first
    Asc,
    /// Newest first
    #[default]
    Desc,
}

impl From<SortOrder> for Order {
    fn from(value: SortOrder) -> Self {
        match value {
            SortOrder::Asc => Self::Asc,
            SortOrder::Desc => Self::Desc,
        }
    }
}

/// Optional equality filters and ordering for [`list_transactions`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionFilter {
    /// Date ordering, newest first by default
    pub order: SortOrder,
    /// Only income or only expenses
    pub kind: Option<TransactionKind>,
    /// Only this category label
    pub category: Option<String>,
    /// Only this channel
    pub channel_id: Option<i64>,
}

/// Retrieves a user's transactions ordered by date.
///
/// Rows with the same date are ordered by id in the same direction, so the newest insert
/// comes first under the default ordering.
pub async fn list_transactions(
    db: &DatabaseConnection,
    user_id: i64,
    filter: &TransactionFilter,
) -> Result<Vec<transaction::Model>> {
    let mut query = Transaction::find().filter(transaction::Column::UserId.eq(user_id));
    if let Some(kind) = filter.kind {
        query = query.filter(transaction::Column::Kind.eq(kind));
    }
    if let Some(category) = &filter.category {
        query = query.filter(transaction::Column::Category.eq(category.as_str()));
    }
    if let Some(channel_id) = filter.channel_id {
        query = query.filter(transaction::Column::ChannelId.eq(channel_id));
    }

    query
        .order_by(transaction::Column::Date, filter.order.into())
        .order_by(transaction::Column::Id, filter.order.into())
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a single transaction owned by `user_id`.
pub async fn get_transaction(
    db: &DatabaseConnection,
    user_id: i64,
    transaction_id: i64,
) -> Result<transaction::Model> {
    Transaction::find_by_id(transaction_id)
        .filter(transaction::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("transaction", transaction_id))
}

/// Creates a new transaction.
///
/// # Arguments
/// * `user_id` - Owner of the new row
/// * `input` - Submitted fields, validated before anything is written
/// * `today` - Reference day for the future-date check
///
/// The referenced channel must exist and belong to `user_id`.
#[instrument(skip(db, input))]
pub async fn create_transaction(
    db: &DatabaseConnection,
    user_id: i64,
    input: TransactionInput,
    today: NaiveDate,
) -> Result<transaction::Model> {
    let fields = input.validate(today)?;
    channel::get_channel(db, user_id, fields.channel_id).await?;

    let model = transaction::ActiveModel {
        user_id: Set(user_id),
        amount: Set(fields.amount),
        kind: Set(fields.kind),
        date: Set(fields.date),
        description: Set(fields.description),
        category: Set(fields.category),
        channel_id: Set(fields.channel_id),
        is_recurring: Set(fields.is_recurring),
        frequency: Set(fields.frequency),
        next_date: Set(fields.next_date),
        end_date: Set(fields.end_date),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let created = model.insert(db).await?;

    info!(
        transaction_id = created.id,
        kind = ?created.kind,
        amount = %created.amount,
        "Transaction created"
    );
    Ok(created)
}

/// Replaces every mutable field of an existing transaction.
///
/// `id`, `user_id` and `created_at` are kept.
#[instrument(skip(db, input))]
pub async fn update_transaction(
    db: &DatabaseConnection,
    user_id: i64,
    transaction_id: i64,
    input: TransactionInput,
    today: NaiveDate,
) -> Result<transaction::Model> {
    let fields = input.validate(today)?;
    let existing = get_transaction(db, user_id, transaction_id).await?;
    if existing.channel_id != fields.channel_id {
        channel::get_channel(db, user_id, fields.channel_id).await?;
    }

    let mut model: transaction::ActiveModel = existing.into();
    model.amount = Set(fields.amount);
    model.kind = Set(fields.kind);
    model.date = Set(fields.date);
    model.description = Set(fields.description);
    model.category = Set(fields.category);
    model.channel_id = Set(fields.channel_id);
    model.is_recurring = Set(fields.is_recurring);
    model.frequency = Set(fields.frequency);
    model.next_date = Set(fields.next_date);
    model.end_date = Set(fields.end_date);
    let updated = model.update(db).await?;

    debug!(transaction_id, "Transaction updated");
    Ok(updated)
}

/// Permanently deletes a transaction owned by `user_id`.
#[instrument(skip(db))]
pub async fn delete_transaction(
    db: &DatabaseConnection,
    user_id: i64,
    transaction_id: i64,
) -> Result<()> {
    let result = Transaction::delete_many()
        .filter(transaction::Column::Id.eq(transaction_id))
        .filter(transaction::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        return Err(Error::not_found("transaction", transaction_id));
    }
    info!(transaction_id, "Transaction deleted");
    Ok(())
}
