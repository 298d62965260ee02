//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables. Every finance table carries a `user_id`
//! column and all reads and writes in `core` are scoped by it.

pub mod budget;
pub mod category;
pub mod channel;
pub mod profile;
pub mod session;
pub mod transaction;
pub mod user;

// Re-export specific types to avoid conflicts
pub use budget::{Column as BudgetColumn, Entity as Budget, Model as BudgetModel};
pub use category::{Column as CategoryColumn, Entity as Category, Model as CategoryModel};
pub use channel::{Column as ChannelColumn, Entity as Channel, Model as ChannelModel};
pub use profile::{Column as ProfileColumn, Entity as Profile, Model as ProfileModel};
pub use session::{Column as SessionColumn, Entity as Session, Model as SessionModel};
pub use transaction::{
    Column as TransactionColumn, Entity as Transaction, Model as TransactionModel,
};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
