//! Profile business logic - the first and last name attached to an account.

use crate::{
    core::validation::{self, MAX_NAME_LEN, ValidationError},
    entities::{Profile, profile},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Names submitted through the profile form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileInput {
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
}

impl ProfileInput {
    /// Both names are required.
    pub fn validate(self) -> std::result::Result<Self, ValidationError> {
        Ok(Self {
            first_name: validation::required_text("first_name", &self.first_name, MAX_NAME_LEN)?,
            last_name: validation::required_text("last_name", &self.last_name, MAX_NAME_LEN)?,
        })
    }
}

/// Retrieves the profile of `user_id`.
pub async fn get_profile(db: &DatabaseConnection, user_id: i64) -> Result<profile::Model> {
    Profile::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("profile", user_id))
}

/// Inserts the profile row created alongside a new account.
///
/// Names are stored trimmed and may be empty here; the profile form requires them.
pub async fn create_profile<C>(
    conn: &C,
    user_id: i64,
    first_name: &str,
    last_name: &str,
) -> Result<profile::Model>
where
    C: ConnectionTrait,
{
    let model = profile::ActiveModel {
        user_id: Set(user_id),
        first_name: Set(first_name.trim().to_string()),
        last_name: Set(last_name.trim().to_string()),
        updated_at: Set(chrono::Utc::now()),
    };
    model.insert(conn).await.map_err(Into::into)
}

/// Sets both names, creating the profile row if the account has none.
#[instrument(skip(db, input))]
pub async fn update_profile(
    db: &DatabaseConnection,
    user_id: i64,
    input: ProfileInput,
) -> Result<profile::Model> {
    let input = input.validate()?;
    let updated = match Profile::find_by_id(user_id).one(db).await? {
        Some(existing) => {
            let mut model: profile::ActiveModel = existing.into();
            model.first_name = Set(input.first_name);
            model.last_name = Set(input.last_name);
            model.updated_at = Set(chrono::Utc::now());
            model.update(db).await?
        }
        None => create_profile(db, user_id, &input.first_name, &input.last_name).await?,
    };
    info!(user_id, "Profile updated");
    Ok(updated)
}
