//! Budget business logic - CRUD for budgets and the budget progress calculation.
//!
//! Progress joins each budget with the expenses filed under its category. Which expenses
//! count is decided by [`BudgetScope`]: by default only those in the period instance that
//! contains "today", never earlier than the budget's start date.

use crate::{
    core::validation::{self, MAX_NAME_LEN, ValidationError},
    entities::{
        Budget, budget,
        budget::BudgetPeriod,
        transaction::{self, TransactionKind},
    },
    errors::{Error, Result},
};
use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Which expenses count toward a budget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetScope {
    /// Only expenses in the current month or year, starting no earlier than `start_date`
    #[default]
    Period,
    /// Every matching expense ever recorded
    AllTime,
}

/// Presentation bucket for a budget's usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    /// Under 70 %
    Ok,
    /// 70 % up to 90 %
    Warning,
    /// 90 % and above
    Critical,
}

impl BudgetStatus {
    /// Classifies a usage percentage.
    #[must_use]
    pub fn from_percentage(percentage_used: Decimal) -> Self {
        if percentage_used >= Decimal::from(90) {
            Self::Critical
        } else if percentage_used >= Decimal::from(70) {
            Self::Warning
        } else {
            Self::Ok
        }
    }
}

/// Computed view comparing a budget's cap with actual spend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetProgress {
    /// Budget this progress belongs to
    pub budget_id: i64,
    /// Category label
    pub category: String,
    /// Monthly or yearly
    pub period: BudgetPeriod,
    /// The cap
    pub budget_amount: Decimal,
    /// Sum of eligible expenses
    pub spent_amount: Decimal,
    /// `spent / cap * 100`, unbounded above 100
    pub percentage_used: Decimal,
    /// `cap - spent`, negative when overrun
    pub remaining_amount: Decimal,
    /// Bucket derived from `percentage_used`
    pub status: BudgetStatus,
}

/// Fields a user submits when creating or editing a budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetInput {
    /// Category label
    pub category: String,
    /// Spending cap
    pub amount: Decimal,
    /// Monthly or yearly
    pub period: BudgetPeriod,
    /// First day of the first eligible period
    pub start_date: NaiveDate,
}

impl BudgetInput {
    /// Checks and normalizes the input.
    pub fn validate(self) -> std::result::Result<Self, ValidationError> {
        Ok(Self {
            category: validation::required_text("category", &self.category, MAX_NAME_LEN)?,
            amount: validation::validate_amount(self.amount)?,
            ..self
        })
    }
}

/// Inclusive date range of the period instance containing `today`, clipped to start no
/// earlier than `start_date`. `None` when `today` is before `start_date`.
#[must_use]
pub fn current_window(
    period: BudgetPeriod,
    start_date: NaiveDate,
    today: NaiveDate,
) -> Option<(NaiveDate, NaiveDate)> {
    if today < start_date {
        return None;
    }
    let (first, months) = match period {
        BudgetPeriod::Monthly => (today.with_day(1), 1),
        BudgetPeriod::Yearly => (today.with_ordinal(1), 12),
    };
    let first = first?;
    let last = first.checked_add_months(Months::new(months))?.pred_opt()?;
    Some((first.max(start_date), last))
}

/// `spent` as a percentage of `budget`. Zero for a non-positive budget; saturates at
/// [`Decimal::MAX`] when the quotient does not fit.
fn percentage_of(spent: Decimal, budget: Decimal) -> Decimal {
    if budget <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    spent
        .checked_div(budget)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::MAX)
}

/// Computes one [`BudgetProgress`] per budget, in the order given.
#[must_use]
pub fn budget_progress(
    transactions: &[transaction::Model],
    budgets: &[budget::Model],
    today: NaiveDate,
    scope: BudgetScope,
) -> Vec<BudgetProgress> {
    budgets
        .iter()
        .map(|b| {
            let window = match scope {
                BudgetScope::Period => current_window(b.period, b.start_date, today),
                BudgetScope::AllTime => Some((NaiveDate::MIN, NaiveDate::MAX)),
            };
            let spent_amount: Decimal = window
                .map(|(from, to)| {
                    transactions
                        .iter()
                        .filter(|tx| tx.kind == TransactionKind::Expense)
                        .filter(|tx| tx.category == b.category)
                        .filter(|tx| tx.date >= from && tx.date <= to)
                        .map(|tx| tx.amount)
                        .sum()
                })
                .unwrap_or_default();

            let percentage_used = percentage_of(spent_amount, b.amount);

            BudgetProgress {
                budget_id: b.id,
                category: b.category.clone(),
                period: b.period,
                budget_amount: b.amount,
                spent_amount,
                percentage_used,
                remaining_amount: b.amount - spent_amount,
                status: BudgetStatus::from_percentage(percentage_used),
            }
        })
        .collect()
}

/// Retrieves all budgets of a user ordered by category.
pub async fn list_budgets(db: &DatabaseConnection, user_id: i64) -> Result<Vec<budget::Model>> {
    Budget::find()
        .filter(budget::Column::UserId.eq(user_id))
        .order_by_asc(budget::Column::Category)
        .order_by_asc(budget::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves one budget owned by `user_id`.
pub async fn get_budget(
    db: &DatabaseConnection,
    user_id: i64,
    budget_id: i64,
) -> Result<budget::Model> {
    Budget::find_by_id(budget_id)
        .filter(budget::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("budget", budget_id))
}

/// Validates and stores a new budget.
#[instrument(skip(db, input))]
pub async fn create_budget(
    db: &DatabaseConnection,
    user_id: i64,
    input: BudgetInput,
) -> Result<budget::Model> {
    let input = input.validate()?;
    let model = budget::ActiveModel {
        user_id: Set(user_id),
        category: Set(input.category),
        amount: Set(input.amount),
        period: Set(input.period),
        start_date: Set(input.start_date),
        ..Default::default()
    };
    let created = model.insert(db).await?;
    info!(budget_id = created.id, category = %created.category, "Budget created");
    Ok(created)
}

/// Replaces every mutable field of an existing budget.
#[instrument(skip(db, input))]
pub async fn update_budget(
    db: &DatabaseConnection,
    user_id: i64,
    budget_id: i64,
    input: BudgetInput,
) -> Result<budget::Model> {
    let input = input.validate()?;
    let mut model: budget::ActiveModel = get_budget(db, user_id, budget_id).await?.into();
    model.category = Set(input.category);
    model.amount = Set(input.amount);
    model.period = Set(input.period);
    model.start_date = Set(input.start_date);
    let updated = model.update(db).await?;
    debug!(budget_id, "Budget updated");
    Ok(updated)
}

/// Deletes a budget owned by `user_id`.
#[instrument(skip(db))]
pub async fn delete_budget(db: &DatabaseConnection, user_id: i64, budget_id: i64) -> Result<()> {
    let result = Budget::delete_many()
        .filter(budget::Column::Id.eq(budget_id))
        .filter(budget::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        return Err(Error::not_found("budget", budget_id));
    }
    info!(budget_id, "Budget deleted");
    Ok(())
}
