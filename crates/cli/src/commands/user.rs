//! User account commands.

use lostfound_web::db::PgUserStore;
use lostfound_web::services::AuthService;

use super::{CommandError, connect};

/// Replace the password of an existing account.
///
/// # Errors
///
/// Fails if the account does not exist or the password is too short.
pub async fn set_password(username: &str, password: &str) -> Result<(), CommandError> {
    let pool = connect().await?;
    let store = PgUserStore::new(&pool);

    AuthService::new(&store)
        .set_password(username, password)
        .await?;

    tracing::info!("Password updated for {username}");
    Ok(())
}
