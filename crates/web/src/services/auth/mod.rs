//! Authentication service.
//!
//! Password login against argon2 hashes, plus bootstrap seeding of the
//! fixed accounts. There is no self-registration.

mod error;

pub use error::AuthError;

use std::sync::LazyLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::db::{RepositoryError, UserStore};
use crate::models::{NewUser, User};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// An account created at bootstrap.
#[derive(Debug, Clone, Copy)]
pub struct SeedAccount {
    pub username: &'static str,
    pub password: &'static str,
    pub is_admin: bool,
}

/// Accounts created by [`AuthService::seed_default_accounts`].
///
/// Change these passwords with `lf-cli user set-password` after deploying.
pub const DEFAULT_ACCOUNTS: [SeedAccount; 2] = [
    SeedAccount {
        username: "admin",
        password: "admin123",
        is_admin: true,
    },
    SeedAccount {
        username: "mahasiswa",
        password: "student123",
        is_admin: false,
    },
];

/// Hash verified against when the username does not exist, so unknown users
/// and wrong passwords take the same time.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("not-a-real-password").ok());

/// Authentication service.
pub struct AuthService<'a, U> {
    users: &'a U,
}

impl<'a, U: UserStore> AuthService<'a, U> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(users: &'a U) -> Self {
        Self { users }
    }

    /// Login with username and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username is unknown or
    /// the password is wrong; the two cases are indistinguishable.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let username = username.trim();

        let Some((user, password_hash)) = self.users.get_password_hash(username).await? else {
            if let Some(dummy) = DUMMY_HASH.as_deref() {
                let _ = verify_password(password, dummy);
            }
            tracing::info!(username, "Login failed: unknown user");
            return Err(AuthError::InvalidCredentials);
        };

        if let Err(e) = verify_password(password, &password_hash) {
            tracing::info!(username, "Login failed: wrong password");
            return Err(e);
        }

        tracing::info!(user_id = %user.id, username, is_admin = user.is_admin, "Login succeeded");
        Ok(user)
    }

    /// Create the default accounts, skipping usernames that already exist.
    ///
    /// Returns the usernames that were created.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the database operation fails.
    pub async fn seed_default_accounts(&self) -> Result<Vec<&'static str>, AuthError> {
        self.seed(&DEFAULT_ACCOUNTS).await
    }

    /// Create the given accounts, skipping usernames that already exist.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the database operation fails.
    pub async fn seed(&self, accounts: &[SeedAccount]) -> Result<Vec<&'static str>, AuthError> {
        let mut created = Vec::new();

        for account in accounts {
            if self.users.get_password_hash(account.username).await?.is_some() {
                tracing::debug!(username = account.username, "Seed account exists, skipping");
                continue;
            }

            let new_user = NewUser {
                username: account.username.to_owned(),
                password_hash: hash_password(account.password)?,
                is_admin: account.is_admin,
            };

            match self.users.insert(&new_user).await {
                Ok(user) => {
                    tracing::info!(user_id = %user.id, username = account.username, "Seeded account");
                    created.push(account.username);
                }
                // Another process seeded it between the lookup and the insert.
                Err(RepositoryError::Conflict(_)) => {}
                Err(e) => return Err(e.into()),
            }
        }

        Ok(created)
    }

    /// Replace an existing account's password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::WeakPassword` if the password is too short.
    /// Returns `AuthError::UserNotFound` if the username does not exist.
    pub async fn set_password(&self, username: &str, password: &str) -> Result<(), AuthError> {
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        self.users
            .update_password(username, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AuthError::UserNotFound,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(username, "Password updated");
        Ok(())
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Validate password requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryUserStore;

    #[tokio::test]
    async fn test_seeded_admin_can_log_in() {
        let store = MemoryUserStore::default();
        let auth = AuthService::new(&store);
        auth.seed_default_accounts().await.unwrap();

        let user = auth.login("admin", "admin123").await.unwrap();
        assert_eq!(user.username, "admin");
        assert!(user.is_admin);

        let student = auth.login("mahasiswa", "student123").await.unwrap();
        assert!(!student.is_admin);
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user_fail_alike() {
        let store = MemoryUserStore::default();
        let auth = AuthService::new(&store);
        auth.seed_default_accounts().await.unwrap();

        let wrong = auth.login("admin", "admin124").await.unwrap_err();
        let unknown = auth.login("nobody", "admin123").await.unwrap_err();
        assert!(matches!(wrong, AuthError::InvalidCredentials));
        assert!(matches!(unknown, AuthError::InvalidCredentials));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn test_passwords_are_stored_hashed() {
        let store = MemoryUserStore::default();
        AuthService::new(&store)
            .seed_default_accounts()
            .await
            .unwrap();

        let hash = store.hash_of("admin").unwrap();
        assert_ne!(hash, "admin123");
        assert!(hash.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn test_seeding_is_idempotent() {
        let store = MemoryUserStore::default();
        let auth = AuthService::new(&store);

        let first = auth.seed_default_accounts().await.unwrap();
        let second = auth.seed_default_accounts().await.unwrap();
        assert_eq!(first, vec!["admin", "mahasiswa"]);
        assert!(second.is_empty());
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_set_password() {
        let store = MemoryUserStore::default();
        let auth = AuthService::new(&store);
        auth.seed_default_accounts().await.unwrap();

        auth.set_password("admin", "a-much-longer-one").await.unwrap();
        assert!(auth.login("admin", "admin123").await.is_err());
        assert!(auth.login("admin", "a-much-longer-one").await.is_ok());
    }

    #[tokio::test]
    async fn test_set_password_rejects_short_or_unknown() {
        let store = MemoryUserStore::default();
        let auth = AuthService::new(&store);
        auth.seed_default_accounts().await.unwrap();

        assert!(matches!(
            auth.set_password("admin", "short").await,
            Err(AuthError::WeakPassword(_))
        ));
        assert!(matches!(
            auth.set_password("ghost", "long-enough-password").await,
            Err(AuthError::UserNotFound)
        ));
    }
}
