//! Database operations for the lost & found `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `lostfound.user` - Accounts (seeded, never self-registered)
//! - `lostfound.item` - Lost and found listings
//! - `tower_sessions.session` - Session storage, created by the session store
//!
//! # Migrations
//!
//! Migrations are stored in `crates/web/migrations/`, embedded into the
//! binary, and run at startup or via:
//! ```bash
//! cargo run -p lostfound-cli -- migrate
//! ```
//!
//! Storage is reached through the [`UserStore`] and [`ItemStore`] traits so
//! services can run against in-memory stores in tests.

pub mod items;
#[cfg(test)]
pub mod memory;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;
use tower_sessions_sqlx_store::PostgresStore;

pub use items::{ItemStore, PgItemStore};
pub use users::{PgUserStore, UserStore};

/// Embedded schema migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Errors from bringing the schema up to date.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("session store migration error: {0}")]
    SessionStore(#[from] sqlx::Error),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Run the embedded migrations, then the session store's own migration.
///
/// # Errors
///
/// Returns `MigrationError` if either set of migrations fails.
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrationError> {
    MIGRATOR.run(pool).await?;
    PostgresStore::new(pool.clone()).migrate().await?;
    tracing::info!("Database migrations complete");
    Ok(())
}

/// Map a unique-constraint violation to [`RepositoryError::Conflict`].
pub(crate) fn conflict_on_unique(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(e)
}
