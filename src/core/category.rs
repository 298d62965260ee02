//! Category business logic.
//!
//! Categories are labels with an emoji. Transactions and budgets store the label itself,
//! so renaming a category does not rewrite existing rows.

use crate::{
    core::validation::{self, MAX_ICON_LEN, MAX_NAME_LEN, ValidationError},
    entities::{Category, category},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Fields a user submits when creating or editing a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInput {
    /// Emoji shown next to the name
    pub emoji: String,
    /// Label
    pub name: String,
}

impl CategoryInput {
    /// Checks and normalizes the input.
    pub fn validate(self) -> std::result::Result<Self, ValidationError> {
        Ok(Self {
            emoji: validation::required_text("emoji", &self.emoji, MAX_ICON_LEN)?,
            name: validation::required_text("name", &self.name, MAX_NAME_LEN)?,
        })
    }
}

async fn insert_category<C>(
    conn: &C,
    user_id: i64,
    input: CategoryInput,
) -> Result<category::Model>
where
    C: ConnectionTrait,
{
    let model = category::ActiveModel {
        user_id: Set(user_id),
        emoji: Set(input.emoji),
        name: Set(input.name),
        ..Default::default()
    };
    model.insert(conn).await.map_err(Into::into)
}

/// Retrieves all categories of a user ordered by name.
pub async fn list_categories(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<category::Model>> {
    Category::find()
        .filter(category::Column::UserId.eq(user_id))
        .order_by_asc(category::Column::Name)
        .order_by_asc(category::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists a user's categories, inserting `defaults` first when the user has none.
#[instrument(skip(db, defaults))]
pub async fn list_or_seed_categories(
    db: &DatabaseConnection,
    user_id: i64,
    defaults: &[CategoryInput],
) -> Result<Vec<category::Model>> {
    let existing = list_categories(db, user_id).await?;
    if !existing.is_empty() || defaults.is_empty() {
        return Ok(existing);
    }

    let txn = db.begin().await?;
    let count = Category::find()
        .filter(category::Column::UserId.eq(user_id))
        .count(&txn)
        .await?;
    if count == 0 {
        for input in defaults {
            insert_category(&txn, user_id, input.clone().validate()?).await?;
        }
    }
    txn.commit().await?;
    info!(user_id, seeded = defaults.len(), "Seeded default categories");

    list_categories(db, user_id).await
}

/// Retrieves one category owned by `user_id`.
pub async fn get_category(
    db: &DatabaseConnection,
    user_id: i64,
    category_id: i64,
) -> Result<category::Model> {
    Category::find_by_id(category_id)
        .filter(category::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("category", category_id))
}

/// Validates and stores a new category.
#[instrument(skip(db, input))]
pub async fn create_category(
    db: &DatabaseConnection,
    user_id: i64,
    input: CategoryInput,
) -> Result<category::Model> {
    let created = insert_category(db, user_id, input.validate()?).await?;
    info!(category_id = created.id, name = %created.name, "Category created");
    Ok(created)
}

/// Replaces emoji and name of an existing category.
#[instrument(skip(db, input))]
pub async fn update_category(
    db: &DatabaseConnection,
    user_id: i64,
    category_id: i64,
    input: CategoryInput,
) -> Result<category::Model> {
    let input = input.validate()?;
    let mut model: category::ActiveModel = get_category(db, user_id, category_id).await?.into();
    model.emoji = Set(input.emoji);
    model.name = Set(input.name);
    let updated = model.update(db).await?;
    debug!(category_id, "Category updated");
    Ok(updated)
}

/// Deletes a category owned by `user_id`.
#[instrument(skip(db))]
pub async fn delete_category(
    db: &DatabaseConnection,
    user_id: i64,
    category_id: i64,
) -> Result<()> {
    let result = Category::delete_many()
        .filter(category::Column::Id.eq(category_id))
        .filter(category::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        return Err(Error::not_found("category", category_id));
    }
    info!(category_id, "Category deleted");
    Ok(())
}
