//! Session entity - Opaque bearer tokens issued at sign-in.
use sea_orm::entity::prelude::*;

/// Session database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    /// Random token handed to the client
    #[sea_orm(primary_key, auto_increment = false)]
    pub token: String,
    /// Account the session authenticates
    pub user_id: i64,
    /// Instant after which the token is rejected
    pub expires_at: DateTimeUtc,
    /// When the session was issued
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
