//! CLI command implementations.

pub mod migrate;
pub mod seed;
pub mod user;

use sqlx::PgPool;
use thiserror::Error;

use lostfound_web::config::{self, ConfigError};
use lostfound_web::db::{self, MigrationError};
use lostfound_web::services::AuthError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema or session store migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] MigrationError),

    /// Account operation failed.
    #[error("{0}")]
    Auth(#[from] AuthError),
}

/// Connect using `LOSTFOUND_DATABASE_URL` (or `DATABASE_URL`).
async fn connect() -> Result<PgPool, CommandError> {
    dotenvy::dotenv().ok();
    let database_url = config::database_url_from_env()?;

    tracing::info!("Connecting to database...");
    Ok(db::create_pool(&database_url).await?)
}
