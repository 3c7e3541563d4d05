//! User domain types.

use chrono::{DateTime, Utc};

use lostfound_core::UserId;

/// A site account (domain type).
///
/// The password hash is deliberately absent; it only travels alongside the
/// user during login verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login name, unique.
    pub username: String,
    /// Whether the account has cross-user edit/delete authority.
    pub is_admin: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// Data needed to insert a new account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub is_admin: bool,
}
