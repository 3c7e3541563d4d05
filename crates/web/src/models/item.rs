//! Item domain types.

use chrono::{DateTime, Utc};

use lostfound_core::{ContactNumber, ItemId, ItemKind, UserId};

/// A lost or found listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: ItemId,
    pub kind: ItemKind,
    /// Stored name, carrying the kind label (e.g. `"Lost: Wallet"`).
    pub name: String,
    pub description: String,
    /// Resolved location: a campus location name or free text.
    pub location: String,
    pub contact: ContactNumber,
    /// File name under the upload directory.
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Account that posted the listing.
    pub user_id: UserId,
}

impl Item {
    /// The name as the user typed it, without the kind label.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.kind.strip_prefix(&self.name)
    }

    /// Whether `user_id` posted this item.
    #[must_use]
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }
}

/// A validated item ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub kind: ItemKind,
    pub name: String,
    pub description: String,
    pub location: String,
    pub contact: ContactNumber,
    pub image: Option<String>,
    pub user_id: UserId,
}

/// Validated replacement values for an existing item.
///
/// `image: None` keeps the current image; ownership and creation time never
/// change on edit.
#[derive(Debug, Clone)]
pub struct ItemChanges {
    pub kind: ItemKind,
    pub name: String,
    pub description: String,
    pub location: String,
    pub contact: ContactNumber,
    pub image: Option<String>,
}

/// Listing filter.
///
/// Empty strings are treated as "no filter" by the constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFilter {
    pub kind: ItemKind,
    /// Substring matched against name or description.
    pub search: Option<String>,
    /// Exact location match.
    pub location: Option<String>,
}

impl ItemFilter {
    /// Filter on kind only.
    #[must_use]
    pub const fn kind(kind: ItemKind) -> Self {
        Self {
            kind,
            search: None,
            location: None,
        }
    }

    /// Add a search term; blank input leaves the filter unchanged.
    #[must_use]
    pub fn with_search(mut self, search: Option<&str>) -> Self {
        self.search = non_blank(search);
        self
    }

    /// Add a location filter; blank input leaves the filter unchanged.
    #[must_use]
    pub fn with_location(mut self, location: Option<&str>) -> Self {
        self.location = non_blank(location);
        self
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}
