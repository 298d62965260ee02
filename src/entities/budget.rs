//! Budget entity - A spending cap for one category over a monthly or yearly period.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Length of a budget period.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    /// Calendar month
    #[sea_orm(string_value = "monthly")]
    Monthly,
    /// Calendar year
    #[sea_orm(string_value = "yearly")]
    Yearly,
}

/// Budget database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    /// Unique identifier for the budget
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of the budget
    pub user_id: i64,
    /// Category label the cap applies to
    pub category: String,
    /// Spending cap, always positive
    pub amount: Decimal,
    /// Monthly or yearly
    pub period: BudgetPeriod,
    /// First day of the first eligible period
    pub start_date: Date,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
