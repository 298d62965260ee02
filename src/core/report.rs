//! Dashboard report generation.
//!
//! Loads a user's transactions, channels and budgets and runs them through the pure
//! aggregation functions. The result is structured data; rendering is left to the caller.

use crate::{
    core::{
        aggregate::{self, CategoryTotal, DashboardStats},
        budget::{self, BudgetProgress, BudgetScope},
        channel,
        transaction::{self, TransactionFilter},
    },
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use tracing::{debug, instrument};

/// Everything the dashboard shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardReport {
    /// Balances, totals and per-channel breakdown
    pub stats: DashboardStats,
    /// Expense totals per category, largest first
    pub category_totals: Vec<CategoryTotal>,
    /// Progress of every budget, ordered by category
    pub budget_progress: Vec<BudgetProgress>,
}

/// Generates the dashboard for one user.
///
/// # Arguments
/// * `db` - Database connection
/// * `user_id` - Owner whose data is aggregated
/// * `today` - Reference day for budget periods
/// * `scope` - Which expenses count toward budgets
#[instrument(skip(db))]
pub async fn generate_dashboard(
    db: &DatabaseConnection,
    user_id: i64,
    today: NaiveDate,
    scope: BudgetScope,
) -> Result<DashboardReport> {
    let transactions =
        transaction::list_transactions(db, user_id, &TransactionFilter::default()).await?;
    let channels = channel::list_channels(db, user_id).await?;
    let budgets = budget::list_budgets(db, user_id).await?;

    debug!(
        transactions = transactions.len(),
        channels = channels.len(),
        budgets = budgets.len(),
        "Aggregating dashboard"
    );

    Ok(DashboardReport {
        stats: aggregate::dashboard_stats(&transactions, &channels),
        category_totals: aggregate::category_totals(&transactions),
        budget_progress: budget::budget_progress(&transactions, &budgets, today, scope),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{entities::transaction::TransactionKind, test_utils::*};
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_empty_dashboard() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "ana@example.com").await?;

        let report = generate_dashboard(&db, user.id, test_today(), BudgetScope::Period).await?;
        assert_eq!(report.stats, DashboardStats::default());
        assert!(report.category_totals.is_empty());
        assert!(report.budget_progress.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_dashboard_end_to_end() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "ana@example.com").await?;
        let other = create_test_user(&db, "other@example.com").await?;
        let a = create_test_channel(&db, user.id, "A").await?;
        let b = create_test_channel(&db, user.id, "B").await?;
        let theirs = create_test_channel(&db, other.id, "Theirs").await?;

        create_categorized_transaction(&db, user.id, a.id, TransactionKind::Income, 1000, "Salary")
            .await?;
        create_categorized_transaction(&db, user.id, a.id, TransactionKind::Expense, 300, "Food")
            .await?;
        create_categorized_transaction(&db, user.id, b.id, TransactionKind::Expense, 150, "Transport")
            .await?;
        create_categorized_transaction(&db, other.id, theirs.id, TransactionKind::Expense, 9, "Food")
            .await?;
        create_test_budget(&db, user.id, "Food", 250).await?;

        let report = generate_dashboard(&db, user.id, test_today(), BudgetScope::Period).await?;

        assert_eq!(report.stats.total_income, Decimal::from(1000));
        assert_eq!(report.stats.total_expenses, Decimal::from(450));
        assert_eq!(report.stats.current_balance, Decimal::from(550));
        assert_eq!(report.stats.channel_balances[&a.id], Decimal::from(700));
        assert_eq!(report.stats.channel_balances[&b.id], Decimal::from(-150));
        assert!(!report.stats.channel_balances.contains_key(&theirs.id));

        let categories: Vec<&str> = report
            .category_totals
            .iter()
            .map(|c| c.category.as_str())
            .collect();
        assert_eq!(categories, vec!["Food", "Transport"]);

        assert_eq!(report.budget_progress.len(), 1);
        assert_eq!(report.budget_progress[0].spent_amount, Decimal::from(300));
        assert_eq!(report.budget_progress[0].percentage_used, Decimal::from(120));
        assert_eq!(report.budget_progress[0].remaining_amount, Decimal::from(-50));
        Ok(())
    }
}
