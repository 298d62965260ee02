//! Database configuration module.
//!
//! Handles the database connection and table creation using `SeaORM`. The schema is
//! generated from the entity definitions with `Schema::create_table_from_entity`, so the
//! tables always match the Rust structs. Any backend `SeaORM` supports can be selected
//! through `DATABASE_URL`; `SQLite` is the default.

use crate::entities::{
    Budget, Category, Channel, Profile, Session, Transaction, TransactionColumn, User,
};
use crate::errors::Result;
use sea_orm::{
    ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema, sea_query::Index,
};
use std::path::Path;
use tracing::{debug, info};

/// Default connection string: a local `SQLite` file, created on first use.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/fintrack.sqlite?mode=rwc";

/// Gets the database URL from environment variable or returns default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// File path of a `SQLite` URL, or `None` for other backends and in-memory databases.
fn sqlite_file_path(url: &str) -> Option<&Path> {
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() || path == ":memory:" || path.starts_with("memory") {
        return None;
    }
    Some(Path::new(path))
}

/// Establishes a connection to the database named by `DATABASE_URL`.
///
/// For a `SQLite` file the parent directory is created first.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    if let Some(parent) = sqlite_file_path(&database_url)
        .and_then(Path::parent)
        .filter(|p| !p.as_os_str().is_empty())
    {
        std::fs::create_dir_all(parent)?;
    }

    let db = Database::connect(&database_url).await?;
    info!(backend = ?db.get_database_backend(), "Connected to database");
    Ok(db)
}

async fn create_table<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}

/// Creates all tables that do not exist yet, plus the transaction lookup index.
///
/// Safe to run on every start.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    create_table(db, &schema, User).await?;
    create_table(db, &schema, Session).await?;
    create_table(db, &schema, Profile).await?;
    create_table(db, &schema, Channel).await?;
    create_table(db, &schema, Category).await?;
    create_table(db, &schema, Budget).await?;
    create_table(db, &schema, Transaction).await?;

    // Every dashboard and listing reads one user's transactions by date
    let index = Index::create()
        .if_not_exists()
        .name("idx_transactions_user_date")
        .table(Transaction)
        .col(TransactionColumn::UserId)
        .col(TransactionColumn::Date)
        .to_owned();
    db.execute(builder.build(&index)).await?;

    debug!("Database schema ready");
    Ok(())
}
