//! Channel business logic - CRUD for the money sources a user moves funds through.
//!
//! A user with no channels gets the configured defaults on their first listing. Deleting
//! a channel never touches the transactions that reference it.

use crate::{
    core::validation::{self, MAX_ICON_LEN, MAX_NAME_LEN, ValidationError},
    entities::{Channel, channel},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Longest accepted color string.
const MAX_COLOR_LEN: usize = 32;

/// Fields a user submits when creating or editing a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelInput {
    /// Display name
    pub name: String,
    /// Short glyph or emoji
    pub icon: String,
    /// Optional display color
    #[serde(default)]
    pub color: Option<String>,
}

impl ChannelInput {
    /// Checks and normalizes the input.
    pub fn validate(self) -> std::result::Result<Self, ValidationError> {
        Ok(Self {
            name: validation::required_text("name", &self.name, MAX_NAME_LEN)?,
            icon: validation::required_text("icon", &self.icon, MAX_ICON_LEN)?,
            color: validation::optional_text("color", self.color.as_deref(), MAX_COLOR_LEN)?,
        })
    }
}

async fn insert_channel<C>(conn: &C, user_id: i64, input: ChannelInput) -> Result<channel::Model>
where
    C: ConnectionTrait,
{
    let model = channel::ActiveModel {
        user_id: Set(user_id),
        name: Set(input.name),
        icon: Set(input.icon),
        color: Set(input.color),
        ..Default::default()
    };
    model.insert(conn).await.map_err(Into::into)
}

/// Retrieves all channels of a user ordered by name.
pub async fn list_channels(db: &DatabaseConnection, user_id: i64) -> Result<Vec<channel::Model>> {
    Channel::find()
        .filter(channel::Column::UserId.eq(user_id))
        .order_by_asc(channel::Column::Name)
        .order_by_asc(channel::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists a user's channels, first inserting `defaults` when the user has none.
///
/// The emptiness check is repeated inside the seeding transaction.
#[instrument(skip(db, defaults))]
pub async fn list_or_seed_channels(
    db: &DatabaseConnection,
    user_id: i64,
    defaults: &[ChannelInput],
) -> Result<Vec<channel::Model>> {
    let existing = list_channels(db, user_id).await?;
    if !existing.is_empty() || defaults.is_empty() {
        return Ok(existing);
    }

    let txn = db.begin().await?;
    let count = Channel::find()
        .filter(channel::Column::UserId.eq(user_id))
        .count(&txn)
        .await?;
    if count == 0 {
        for input in defaults {
            insert_channel(&txn, user_id, input.clone().validate()?).await?;
        }
    }
    txn.commit().await?;
    info!(user_id, seeded = defaults.len(), "Seeded default channels");

    list_channels(db, user_id).await
}

/// Retrieves one channel owned by `user_id`.
pub async fn get_channel(
    db: &DatabaseConnection,
    user_id: i64,
    channel_id: i64,
) -> Result<channel::Model> {
    Channel::find_by_id(channel_id)
        .filter(channel::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("channel", channel_id))
}

/// Validates and stores a new channel.
#[instrument(skip(db, input))]
pub async fn create_channel(
    db: &DatabaseConnection,
    user_id: i64,
    input: ChannelInput,
) -> Result<channel::Model> {
    let created = insert_channel(db, user_id, input.validate()?).await?;
    info!(channel_id = created.id, name = %created.name, "Channel created");
    Ok(created)
}

/// Replaces name, icon and color of an existing channel.
#[instrument(skip(db, input))]
pub async fn update_channel(
    db: &DatabaseConnection,
    user_id: i64,
    channel_id: i64,
    input: ChannelInput,
) -> Result<channel::Model> {
    let input = input.validate()?;
    let mut model: channel::ActiveModel = get_channel(db, user_id, channel_id).await?.into();
    model.name = Set(input.name);
    model.icon = Set(input.icon);
    model.color = Set(input.color);
    let updated = model.update(db).await?;
    debug!(channel_id, "Channel updated");
    Ok(updated)
}

/// Deletes a channel. Transactions that reference it keep their `channel_id`.
#[instrument(skip(db))]
pub async fn delete_channel(db: &DatabaseConnection, user_id: i64, channel_id: i64) -> Result<()> {
    let result = Channel::delete_many()
        .filter(channel::Column::Id.eq(channel_id))
        .filter(channel::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        return Err(Error::not_found("channel", channel_id));
    }
    info!(channel_id, "Channel deleted");
    Ok(())
}
