//! Item repository.

use std::future::Future;

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use lostfound_core::{ContactNumber, ItemId, ItemKind, UserId};

use super::RepositoryError;
use crate::models::{Item, ItemChanges, ItemFilter, NewItem, Page, PageRequest};

/// Listing storage.
pub trait ItemStore: Send + Sync {
    fn find_by_id(
        &self,
        id: ItemId,
    ) -> impl Future<Output = Result<Option<Item>, RepositoryError>> + Send;

    /// One page of matching items, newest first (ties broken by ID).
    fn list_by_filter(
        &self,
        filter: &ItemFilter,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<Item>, RepositoryError>> + Send;

    /// Every location in use, sorted and deduplicated.
    fn distinct_locations(
        &self,
    ) -> impl Future<Output = Result<Vec<String>, RepositoryError>> + Send;

    fn insert(&self, item: &NewItem)
    -> impl Future<Output = Result<Item, RepositoryError>> + Send;

    /// Apply changes; `Ok(None)` if the item no longer exists.
    fn update(
        &self,
        id: ItemId,
        changes: &ItemChanges,
    ) -> impl Future<Output = Result<Option<Item>, RepositoryError>> + Send;

    /// Delete and return the removed item; `Ok(None)` if it did not exist.
    fn delete(
        &self,
        id: ItemId,
    ) -> impl Future<Output = Result<Option<Item>, RepositoryError>> + Send;
}

#[derive(sqlx::FromRow)]
struct ItemRow {
    id: i32,
    kind: String,
    name: String,
    description: String,
    location: String,
    contact: String,
    image: Option<String>,
    created_at: DateTime<Utc>,
    user_id: i32,
}

impl TryFrom<ItemRow> for Item {
    type Error = RepositoryError;

    fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
        let kind = ItemKind::parse(&row.kind).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid item kind in database: {e}"))
        })?;

        Ok(Self {
            id: ItemId::new(row.id),
            kind,
            name: row.name,
            description: row.description,
            location: row.location,
            contact: ContactNumber::from_stored(row.contact),
            image: row.image,
            created_at: row.created_at,
            user_id: UserId::new(row.user_id),
        })
    }
}

/// Build a `LIKE` pattern matching `term` anywhere, with wildcards escaped.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// `PostgreSQL`-backed [`ItemStore`].
pub struct PgItemStore<'a> {
    pool: &'a PgPool,
}

impl<'a> PgItemStore<'a> {
    /// Create a new item repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

impl ItemStore for PgItemStore<'_> {
    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>, RepositoryError> {
        let row = sqlx::query_as::<_, ItemRow>(
            r"
            SELECT id, kind, name, description, location, contact, image, created_at, user_id
            FROM lostfound.item
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(Item::try_from).transpose()
    }

    async fn list_by_filter(
        &self,
        filter: &ItemFilter,
        page: PageRequest,
    ) -> Result<Page<Item>, RepositoryError> {
        let search = filter.search.as_deref().map(like_pattern);

        let total = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*)
            FROM lostfound.item
            WHERE kind = $1
              AND ($2::text IS NULL OR name LIKE $2 ESCAPE '\' OR description LIKE $2 ESCAPE '\')
              AND ($3::text IS NULL OR location = $3)
            ",
        )
        .bind(filter.kind.as_str())
        .bind(search.as_deref())
        .bind(filter.location.as_deref())
        .fetch_one(self.pool)
        .await?;

        let rows = sqlx::query_as::<_, ItemRow>(
            r"
            SELECT id, kind, name, description, location, contact, image, created_at, user_id
            FROM lostfound.item
            WHERE kind = $1
              AND ($2::text IS NULL OR name LIKE $2 ESCAPE '\' OR description LIKE $2 ESCAPE '\')
              AND ($3::text IS NULL OR location = $3)
            ORDER BY created_at DESC, id DESC
            LIMIT $4 OFFSET $5
            ",
        )
        .bind(filter.kind.as_str())
        .bind(search.as_deref())
        .bind(filter.location.as_deref())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool)
        .await?;

        let items = rows
            .into_iter()
            .map(Item::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let total = u64::try_from(total)
            .map_err(|_| RepositoryError::DataCorruption(format!("negative count: {total}")))?;

        Ok(Page::new(items, page, total))
    }

    async fn distinct_locations(&self) -> Result<Vec<String>, RepositoryError> {
        let locations = sqlx::query_scalar::<_, String>(
            r"
            SELECT DISTINCT location
            FROM lostfound.item
            ORDER BY location
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(locations)
    }

    async fn insert(&self, item: &NewItem) -> Result<Item, RepositoryError> {
        let row = sqlx::query_as::<_, ItemRow>(
            r"
            INSERT INTO lostfound.item (kind, name, description, location, contact, image, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, kind, name, description, location, contact, image, created_at, user_id
            ",
        )
        .bind(item.kind.as_str())
        .bind(&item.name)
        .bind(&item.description)
        .bind(&item.location)
        .bind(item.contact.as_str())
        .bind(item.image.as_deref())
        .bind(item.user_id.as_i32())
        .fetch_one(self.pool)
        .await?;

        Item::try_from(row)
    }

    async fn update(
        &self,
        id: ItemId,
        changes: &ItemChanges,
    ) -> Result<Option<Item>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ItemRow>(
            r"
            UPDATE lostfound.item
            SET kind = $2,
                name = $3,
                description = $4,
                location = $5,
                contact = $6,
                image = COALESCE($7, image)
            WHERE id = $1
            RETURNING id, kind, name, description, location, contact, image, created_at, user_id
            ",
        )
        .bind(id.as_i32())
        .bind(changes.kind.as_str())
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(&changes.location)
        .bind(changes.contact.as_str())
        .bind(changes.image.as_deref())
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;

        row.map(Item::try_from).transpose()
    }

    async fn delete(&self, id: ItemId) -> Result<Option<Item>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ItemRow>(
            r"
            DELETE FROM lostfound.item
            WHERE id = $1
            RETURNING id, kind, name, description, location, contact, image, created_at, user_id
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;

        row.map(Item::try_from).transpose()
    }
}
