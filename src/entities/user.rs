//! User entity - Login identity for the local account service.
use sea_orm::entity::prelude::*;

/// User database model. Not serializable: it carries the password hash.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier; every owned row points at it through `user_id`
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Login address, stored lowercase
    #[sea_orm(unique)]
    pub email: String,
    /// Argon2 PHC string
    pub password_hash: String,
    /// When the account was created
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
