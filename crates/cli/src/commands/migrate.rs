//! Database migration command.
//!
//! Applies the embedded schema migrations from `crates/web/migrations/`
//! and creates the session table. The web binary does the same on startup,
//! so this is only needed when migrating ahead of a deploy.

use super::{CommandError, connect};

/// Run all pending migrations.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    lostfound_web::db::run_migrations(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
