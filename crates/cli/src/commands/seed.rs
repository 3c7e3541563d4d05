//! Seed the default accounts.
//!
//! Creates `admin` (administrator) and `mahasiswa` (student) with their
//! default passwords when they do not exist yet. Existing accounts are left
//! alone, so running this twice is harmless.

use lostfound_web::db::PgUserStore;
use lostfound_web::services::AuthService;

use super::{CommandError, connect};

/// Create missing default accounts.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;
    let store = PgUserStore::new(&pool);

    let created = AuthService::new(&store).seed_default_accounts().await?;

    if created.is_empty() {
        tracing::info!("Default accounts already exist, nothing to do");
    } else {
        for username in &created {
            tracing::info!("Created account: {username}");
        }
        tracing::warn!("Default passwords are public; change them with `lf-cli user set-password`");
    }

    Ok(())
}
