//! Item service.
//!
//! Creating, editing, deleting and listing lost/found items. Authorization
//! is decided here from the [`CurrentUser`] passed in by the route, so the
//! rules hold regardless of which extractor guarded the handler.

mod error;
mod submission;

pub use error::{FieldError, ItemError, ValidationErrors};
pub use submission::{ItemSubmission, MAX_NAME_LENGTH, ValidatedItem};

use lostfound_core::{ItemId, ItemKind};

use crate::db::ItemStore;
use crate::models::{
    CurrentUser, ITEMS_PER_PAGE, Item, ItemChanges, ItemFilter, NewItem, Page, PageRequest,
};
use crate::services::media::{MediaError, MediaStore, UploadedFile};

/// Number of items of each kind shown on the home page.
pub const LATEST_PER_KIND: u32 = 3;

/// Result of creating an item.
#[derive(Debug)]
pub struct SavedItem {
    pub item: Item,
    /// Why the attached photo was dropped, if it was.
    pub image_error: Option<MediaError>,
}

/// Item service.
pub struct ItemService<'a, S> {
    items: &'a S,
    media: &'a MediaStore,
}

impl<'a, S: ItemStore> ItemService<'a, S> {
    #[must_use]
    pub const fn new(items: &'a S, media: &'a MediaStore) -> Self {
        Self { items, media }
    }

    /// Get an item by ID.
    ///
    /// # Errors
    ///
    /// Returns `ItemError::NotFound` if there is no such item.
    pub async fn get(&self, id: ItemId) -> Result<Item, ItemError> {
        self.items.find_by_id(id).await?.ok_or(ItemError::NotFound)
    }

    /// One page of items of the given kind.
    ///
    /// # Errors
    ///
    /// Returns `ItemError::NotFound` if `kind` is not `lost` or `found`.
    pub async fn list(
        &self,
        kind: &str,
        page: PageRequest,
        search: Option<&str>,
        location: Option<&str>,
    ) -> Result<Page<Item>, ItemError> {
        let kind = ItemKind::parse(kind).map_err(|_| ItemError::NotFound)?;
        let filter = ItemFilter::kind(kind)
            .with_search(search)
            .with_location(location);
        Ok(self.items.list_by_filter(&filter, page).await?)
    }

    /// The newest items of a kind.
    ///
    /// # Errors
    ///
    /// Returns `ItemError::Repository` if the query fails.
    pub async fn latest(&self, kind: ItemKind, count: u32) -> Result<Vec<Item>, ItemError> {
        let page = self
            .items
            .list_by_filter(&ItemFilter::kind(kind), PageRequest::new(1, count))
            .await?;
        Ok(page.items)
    }

    /// Every location in use, for the listing filter.
    ///
    /// # Errors
    ///
    /// Returns `ItemError::Repository` if the query fails.
    pub async fn locations(&self) -> Result<Vec<String>, ItemError> {
        Ok(self.items.distinct_locations().await?)
    }

    /// Create an item owned by `user`.
    ///
    /// A photo that fails validation or storage is dropped and reported in
    /// [`SavedItem::image_error`]; the item is still created.
    ///
    /// # Errors
    ///
    /// Returns `ItemError::Validation` if the form is invalid, or
    /// `ItemError::Repository` if the insert fails (the photo is removed).
    pub async fn create(
        &self,
        submission: &ItemSubmission,
        image: Option<UploadedFile>,
        user: &CurrentUser,
    ) -> Result<SavedItem, ItemError> {
        let valid = submission.validate()?;

        let (image, image_error) = match image {
            Some(file) => match self.media.save_image(&file).await {
                Ok(name) => (Some(name), None),
                Err(e) => {
                    tracing::warn!(user_id = %user.id, error = %e, "Dropping photo from new item");
                    (None, Some(e))
                }
            },
            None => (None, None),
        };

        let new_item = NewItem {
            kind: valid.kind,
            name: valid.name,
            description: valid.description,
            location: valid.location,
            contact: valid.contact,
            image,
            user_id: user.id,
        };

        let item = match self.items.insert(&new_item).await {
            Ok(item) => item,
            Err(e) => {
                if let Some(name) = &new_item.image {
                    self.discard_image(name).await;
                }
                return Err(e.into());
            }
        };

        tracing::info!(
            item_id = %item.id,
            user_id = %user.id,
            kind = %item.kind,
            has_image = item.image.is_some(),
            "Item created"
        );
        Ok(SavedItem { item, image_error })
    }

    /// Replace an item's fields, and its photo if a new one is given.
    ///
    /// The old photo is removed only after the new one is stored and the
    /// row update has committed.
    ///
    /// # Errors
    ///
    /// - `ItemError::NotFound` if the item does not exist
    /// - `ItemError::Forbidden` if `user` is neither owner nor admin
    /// - `ItemError::Validation` if the form or the new photo is invalid
    /// - `ItemError::Media` if the new photo could not be written
    /// - `ItemError::Repository` if the update fails (the new photo is removed)
    pub async fn edit(
        &self,
        id: ItemId,
        submission: &ItemSubmission,
        image: Option<UploadedFile>,
        user: &CurrentUser,
    ) -> Result<Item, ItemError> {
        let existing = self.get(id).await?;
        ensure_can_modify(&existing, user)?;

        let valid = submission.validate_edit(&existing.contact)?;

        let new_image = match image {
            Some(file) => match self.media.save_image(&file).await {
                Ok(name) => Some(name),
                Err(e @ MediaError::Io(_)) => return Err(ItemError::Media(e)),
                Err(invalid) => {
                    return Err(ValidationErrors::single("image", invalid.to_string()).into());
                }
            },
            None => None,
        };

        let changes = ItemChanges {
            kind: valid.kind,
            name: valid.name,
            description: valid.description,
            location: valid.location,
            contact: valid.contact,
            image: new_image,
        };

        let updated = match self.items.update(id, &changes).await {
            Ok(Some(item)) => item,
            Ok(None) => {
                if let Some(name) = &changes.image {
                    self.discard_image(name).await;
                }
                return Err(ItemError::NotFound);
            }
            Err(e) => {
                if let Some(name) = &changes.image {
                    self.discard_image(name).await;
                }
                return Err(e.into());
            }
        };

        if changes.image.is_some()
            && let Some(old) = existing.image.as_deref()
            && updated.image.as_deref() != Some(old)
        {
            self.discard_image(old).await;
        }

        tracing::info!(item_id = %id, user_id = %user.id, "Item updated");
        Ok(updated)
    }

    /// Delete an item and its photo. Admin only.
    ///
    /// # Errors
    ///
    /// - `ItemError::Forbidden` if `user` is not an admin
    /// - `ItemError::NotFound` if the item does not exist
    /// - `ItemError::Repository` if the delete fails
    pub async fn delete(&self, id: ItemId, user: &CurrentUser) -> Result<Item, ItemError> {
        if !user.is_admin {
            tracing::warn!(item_id = %id, user_id = %user.id, "Non-admin delete refused");
            return Err(ItemError::Forbidden);
        }

        let item = self.items.delete(id).await?.ok_or(ItemError::NotFound)?;

        if let Some(name) = &item.image {
            self.discard_image(name).await;
        }

        tracing::info!(item_id = %id, user_id = %user.id, "Item deleted");
        Ok(item)
    }

    /// Remove a photo, logging instead of failing.
    async fn discard_image(&self, name: &str) {
        if let Err(e) = self.media.delete_image(name).await {
            tracing::warn!(file = name, error = %e, "Could not remove photo");
        }
    }
}

/// Whether `user` may edit `item`: its owner or any admin.
#[must_use]
pub fn can_modify(item: &Item, user: &CurrentUser) -> bool {
    user.is_admin || item.is_owned_by(user.id)
}

/// Fail with `Forbidden` unless `user` may edit `item`.
///
/// # Errors
///
/// Returns `ItemError::Forbidden` if `user` is neither owner nor admin.
pub fn ensure_can_modify(item: &Item, user: &CurrentUser) -> Result<(), ItemError> {
    if can_modify(item, user) {
        Ok(())
    } else {
        tracing::warn!(item_id = %item.id, user_id = %user.id, "Edit refused");
        Err(ItemError::Forbidden)
    }
}

/// Default listing page request.
#[must_use]
pub fn page_request(raw_page: Option<&str>) -> PageRequest {
    PageRequest::from_query(raw_page, ITEMS_PER_PAGE)
}
