//! Account service - sign-up, sign-in, sessions and account maintenance.
//!
//! [`AuthBackend`] is the seam the [`SessionManager`](crate::core::session::SessionManager)
//! talks to. [`LocalAuth`] implements it on top of the same database as the finance data:
//! argon2 password hashes in `users`, opaque random tokens with an expiry in `sessions`.

use crate::{
    core::{profile, validation},
    entities::{
        Budget, Category, Channel, Profile, Transaction, User, budget, category, channel,
        profile as profile_entity, session, transaction, user,
    },
    errors::{Error, Result},
};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use chrono::{DateTime, Duration, Utc};
use password_hash::{SaltString, rand_core::OsRng};
use sea_orm::{ConnectionTrait, Set, SqlErr, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// An authenticated session as handed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token
    pub token: String,
    /// Account the token authenticates
    pub user_id: i64,
    /// Instant after which the token is rejected unless refreshed
    pub expires_at: DateTime<Utc>,
}

impl From<session::Model> for Session {
    fn from(value: session::Model) -> Self {
        Self {
            token: value.token,
            user_id: value.user_id,
            expires_at: value.expires_at,
        }
    }
}

/// Optional profile names supplied at sign-up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignUpMetadata {
    /// Given name
    pub first_name: Option<String>,
    /// Family name
    pub last_name: Option<String>,
}

/// Session operations a [`SessionManager`](crate::core::session::SessionManager) drives.
pub trait AuthBackend: Send + Sync + 'static {
    /// Exchanges credentials for a new session.
    fn sign_in(&self, email: &str, password: &str)
    -> impl Future<Output = Result<Session>> + Send;

    /// Extends a live session. Fails with [`Error::SessionExpired`] once it has lapsed.
    fn refresh(&self, token: &str) -> impl Future<Output = Result<Session>> + Send;

    /// Invalidates a session. Unknown tokens are not an error.
    fn sign_out(&self, token: &str) -> impl Future<Output = Result<()>> + Send;
}

/// Account service backed by the application database.
#[derive(Debug, Clone)]
pub struct LocalAuth {
    db: DatabaseConnection,
    ttl: Duration,
    params: Params,
}

impl LocalAuth {
    /// Creates the service with argon2's default cost parameters.
    #[must_use]
    pub fn new(db: DatabaseConnection, ttl: Duration) -> Self {
        Self::with_params(db, ttl, Params::default())
    }

    /// Creates the service with explicit argon2 cost parameters.
    #[must_use]
    pub fn with_params(db: DatabaseConnection, ttl: Duration, params: Params) -> Self {
        Self { db, ttl, params }
    }

    fn hasher(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        Ok(self
            .hasher()
            .hash_password(password.as_bytes(), &salt)?
            .to_string())
    }

    fn verify_password(&self, password: &str, hash: &str) -> Result<bool> {
        let parsed = PasswordHash::new(hash)?;
        match self.hasher().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn issue_session(&self, user_id: i64) -> Result<Session> {
        let now = Utc::now();
        let model = session::ActiveModel {
            token: Set(Uuid::new_v4().to_string()),
            user_id: Set(user_id),
            expires_at: Set(now + self.ttl),
            created_at: Set(now),
        };
        Ok(model.insert(&self.db).await?.into())
    }

    /// Looks up a session, deleting and rejecting it when it has lapsed.
    async fn live_session(&self, token: &str) -> Result<session::Model> {
        let found = session::Entity::find_by_id(token.to_string())
            .one(&self.db)
            .await?
            .ok_or(Error::Unauthorized)?;
        if found.expires_at <= Utc::now() {
            session::Entity::delete_by_id(found.token).exec(&self.db).await?;
            return Err(Error::SessionExpired);
        }
        Ok(found)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<user::Model>> {
        User::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(Into::into)
    }

    /// Creates an account and its profile, then signs the new user in.
    ///
    /// # Arguments
    /// * `email` - Login address; trimmed and lowercased before storage
    /// * `password` - Must pass the password complexity rules
    /// * `metadata` - Optional names copied into the new profile
    #[instrument(skip(self, password, metadata))]
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: SignUpMetadata,
    ) -> Result<Session> {
        let email = validation::validate_email(email)?;
        validation::validate_password(password)?;
        if self.find_user_by_email(&email).await?.is_some() {
            return Err(Error::EmailTaken { email });
        }
        let password_hash = self.hash_password(password)?;

        let txn = self.db.begin().await?;
        let created = insert_user(&txn, &email, password_hash).await?;
        profile::create_profile(
            &txn,
            created.id,
            metadata.first_name.as_deref().unwrap_or_default(),
            metadata.last_name.as_deref().unwrap_or_default(),
        )
        .await?;
        txn.commit().await?;

        info!(user_id = created.id, "Account created");
        self.issue_session(created.id).await
    }

    /// Resolves a bearer token to its user id.
    pub async fn authenticate(&self, token: &str) -> Result<i64> {
        Ok(self.live_session(token).await?.user_id)
    }

    /// Replaces the password of `user_id`.
    #[instrument(skip(self, new_password))]
    pub async fn update_password(&self, user_id: i64, new_password: &str) -> Result<()> {
        validation::validate_password(new_password)?;
        let password_hash = self.hash_password(new_password)?;
        let existing = User::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| Error::not_found("user", user_id))?;
        let mut model: user::ActiveModel = existing.into();
        model.password_hash = Set(password_hash);
        model.update(&self.db).await?;
        info!(user_id, "Password updated");
        Ok(())
    }

    /// Changes the login address of `user_id` and returns the normalized address.
    #[instrument(skip(self))]
    pub async fn update_email(&self, user_id: i64, new_email: &str) -> Result<String> {
        let email = validation::validate_email(new_email)?;
        if let Some(holder) = self.find_user_by_email(&email).await? {
            if holder.id == user_id {
                return Ok(email);
            }
            return Err(Error::EmailTaken { email });
        }
        let existing = User::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| Error::not_found("user", user_id))?;
        let mut model: user::ActiveModel = existing.into();
        model.email = Set(email.clone());
        model
            .update(&self.db)
            .await
            .map_err(|e| email_conflict(e, &email))?;
        info!(user_id, "Email updated");
        Ok(email)
    }

    /// Removes an account together with every row it owns, atomically.
    #[instrument(skip(self))]
    pub async fn delete_account(&self, user_id: i64) -> Result<()> {
        let txn = self.db.begin().await?;
        Transaction::delete_many()
            .filter(transaction::Column::UserId.eq(user_id))
            .exec(&txn)
            .await?;
        Budget::delete_many()
            .filter(budget::Column::UserId.eq(user_id))
            .exec(&txn)
            .await?;
        Category::delete_many()
            .filter(category::Column::UserId.eq(user_id))
            .exec(&txn)
            .await?;
        Channel::delete_many()
            .filter(channel::Column::UserId.eq(user_id))
            .exec(&txn)
            .await?;
        Profile::delete_many()
            .filter(profile_entity::Column::UserId.eq(user_id))
            .exec(&txn)
            .await?;
        session::Entity::delete_many()
            .filter(session::Column::UserId.eq(user_id))
            .exec(&txn)
            .await?;
        let removed = User::delete_by_id(user_id).exec(&txn).await?;
        if removed.rows_affected == 0 {
            return Err(Error::not_found("user", user_id));
        }
        txn.commit().await?;

        warn!(user_id, "Account deleted");
        Ok(())
    }
}

impl AuthBackend for LocalAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let email = email.trim().to_lowercase();
        let Some(account) = self.find_user_by_email(&email).await? else {
            debug!("Sign-in for unknown email");
            return Err(Error::InvalidCredentials);
        };
        if !self.verify_password(password, &account.password_hash)? {
            debug!(user_id = account.id, "Sign-in with wrong password");
            return Err(Error::InvalidCredentials);
        }
        info!(user_id = account.id, "Signed in");
        self.issue_session(account.id).await
    }

    async fn refresh(&self, token: &str) -> Result<Session> {
        let current = self.live_session(token).await?;
        let mut model: session::ActiveModel = current.into();
        model.expires_at = Set(Utc::now() + self.ttl);
        let refreshed = model.update(&self.db).await?;
        debug!(user_id = refreshed.user_id, "Session refreshed");
        Ok(refreshed.into())
    }

    async fn sign_out(&self, token: &str) -> Result<()> {
        let removed = session::Entity::delete_by_id(token.to_string())
            .exec(&self.db)
            .await?;
        debug!(removed = removed.rows_affected, "Signed out");
        Ok(())
    }
}

/// Inserts a user row. A concurrent insert of the same address surfaces as
/// [`Error::EmailTaken`] rather than a database error.
async fn insert_user<C>(conn: &C, email: &str, password_hash: String) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    user::ActiveModel {
        email: Set(email.to_string()),
        password_hash: Set(password_hash),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(conn)
    .await
    .map_err(|e| email_conflict(e, email))
}

fn email_conflict(err: DbErr, email: &str) -> Error {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => Error::EmailTaken {
            email: email.to_string(),
        },
        _ => Error::Database(err),
    }
}
