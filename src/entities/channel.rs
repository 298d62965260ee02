//! Channel entity - A named money source or sink such as cash or a bank card.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Channel database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "channels")]
pub struct Model {
    /// Unique identifier for the channel
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of the channel
    pub user_id: i64,
    /// Display name (e.g. "Cash", "Main card")
    pub name: String,
    /// Short glyph or emoji
    pub icon: String,
    /// Optional display color
    pub color: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
