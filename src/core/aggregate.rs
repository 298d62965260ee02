//! Dashboard aggregation.
//!
//! Reduces a user's transactions into balances and per-category spending. Both functions
//! are single linear passes with no I/O; the order of the input only matters for breaking
//! ties in [`category_totals`].

use crate::entities::{channel, transaction, transaction::TransactionKind};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Headline figures for the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    /// `total_income - total_expenses`
    pub current_balance: Decimal,
    /// Sum of all income amounts
    pub total_income: Decimal,
    /// Sum of all expense amounts
    pub total_expenses: Decimal,
    /// Number of transactions flagged as recurring
    pub recurring_count: usize,
    /// Income minus expenses per channel id, including known channels with no activity
    /// and ids of channels that no longer exist
    pub channel_balances: BTreeMap<i64, Decimal>,
}

/// Expense sum for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    /// Category label
    pub category: String,
    /// Sum of expense amounts filed under it
    pub amount: Decimal,
}

/// Computes balances and totals over `transactions`.
///
/// Every channel in `channels` is reported even with no activity. A transaction whose
/// channel is not in `channels` still counts, under its own id.
#[must_use]
pub fn dashboard_stats(
    transactions: &[transaction::Model],
    channels: &[channel::Model],
) -> DashboardStats {
    let mut stats = DashboardStats {
        channel_balances: channels.iter().map(|c| (c.id, Decimal::ZERO)).collect(),
        ..DashboardStats::default()
    };

    for tx in transactions {
        let balance = stats.channel_balances.entry(tx.channel_id).or_default();
        match tx.kind {
            TransactionKind::Income => {
                stats.total_income += tx.amount;
                *balance += tx.amount;
            }
            TransactionKind::Expense => {
                stats.total_expenses += tx.amount;
                *balance -= tx.amount;
            }
        }
        if tx.is_recurring {
            stats.recurring_count += 1;
        }
    }

    stats.current_balance = stats.total_income - stats.total_expenses;
    stats
}

/// Sums expenses per category, largest first.
///
/// Income never contributes. Categories with equal totals keep the order in which they
/// were first seen.
#[must_use]
pub fn category_totals(transactions: &[transaction::Model]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for tx in transactions
        .iter()
        .filter(|tx| tx.kind == TransactionKind::Expense)
    {
        if let Some(&idx) = positions.get(tx.category.as_str()) {
            totals[idx].amount += tx.amount;
        } else {
            positions.insert(tx.category.as_str(), totals.len());
            totals.push(CategoryTotal {
                category: tx.category.clone(),
                amount: tx.amount,
            });
        }
    }

    // `sort_by` is stable, which keeps first-seen order for ties
    totals.sort_by(|a, b| b.amount.cmp(&a.amount));
    totals
}
