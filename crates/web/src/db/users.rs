//! User repository.

use std::future::Future;

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use lostfound_core::UserId;

use super::{RepositoryError, conflict_on_unique};
use crate::models::{NewUser, User};

/// Account storage.
pub trait UserStore: Send + Sync {
    /// Look up a user and their password hash by username.
    fn get_password_hash(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<(User, String)>, RepositoryError>> + Send;

    /// Look up a user by ID.
    fn find_by_id(
        &self,
        id: UserId,
    ) -> impl Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Insert an account. Fails with `Conflict` if the username is taken.
    fn insert(
        &self,
        user: &NewUser,
    ) -> impl Future<Output = Result<User, RepositoryError>> + Send;

    /// Replace a user's password hash. Fails with `NotFound` for unknown usernames.
    fn update_password(
        &self,
        username: &str,
        password_hash: &str,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i32,
    username: String,
    is_admin: bool,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::new(row.id),
            username: row.username,
            is_admin: row.is_admin,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct UserWithHashRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

/// `PostgreSQL`-backed [`UserStore`].
pub struct PgUserStore<'a> {
    pool: &'a PgPool,
}

impl<'a> PgUserStore<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

impl UserStore for PgUserStore<'_> {
    async fn get_password_hash(
        &self,
        username: &str,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, UserWithHashRow>(
            r"
            SELECT id, username, is_admin, created_at, password_hash
            FROM lostfound.user
            WHERE username = $1
            ",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| (User::from(r.user), r.password_hash)))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, username, is_admin, created_at
            FROM lostfound.user
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn insert(&self, user: &NewUser) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO lostfound.user (username, password_hash, is_admin)
            VALUES ($1, $2, $3)
            RETURNING id, username, is_admin, created_at
            ",
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.is_admin)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "username"))?;

        Ok(User::from(row))
    }

    async fn update_password(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE lostfound.user
            SET password_hash = $2
            WHERE username = $1
            ",
        )
        .bind(username)
        .bind(password_hash)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
