//! Precomputed view data for templates.
//!
//! Templates only read plain fields; formatting, URLs and permission checks
//! happen here.

use chrono::{DateTime, Utc};

use lostfound_core::{CUSTOM_LOCATION_CODE, CUSTOM_LOCATION_LABEL, CampusLocation, ItemKind};

use crate::models::{CurrentUser, Item};
use crate::services::items::{ValidationErrors, can_modify};

/// Characters of description shown on listing cards.
const EXCERPT_LENGTH: usize = 120;

/// An `<option>` in a select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Lost/found choice for the item form.
#[must_use]
pub fn kind_options(selected: &str) -> Vec<SelectOption> {
    ItemKind::ALL
        .iter()
        .map(|kind| SelectOption {
            value: kind.as_str().to_owned(),
            label: kind.label().to_owned(),
            selected: kind.as_str() == selected,
        })
        .collect()
}

/// Fixed campus locations plus the free-text option, for the item form.
#[must_use]
pub fn form_location_options(selected: &str) -> Vec<SelectOption> {
    CampusLocation::ALL
        .iter()
        .map(|loc| SelectOption {
            value: loc.code().to_owned(),
            label: loc.name().to_owned(),
            selected: loc.code() == selected,
        })
        .chain(std::iter::once(SelectOption {
            value: CUSTOM_LOCATION_CODE.to_owned(),
            label: CUSTOM_LOCATION_LABEL.to_owned(),
            selected: selected == CUSTOM_LOCATION_CODE,
        }))
        .collect()
}

/// Locations in use, for the listing filter.
#[must_use]
pub fn filter_location_options(locations: &[String], selected: Option<&str>) -> Vec<SelectOption> {
    locations
        .iter()
        .map(|loc| SelectOption {
            value: loc.clone(),
            label: loc.clone(),
            selected: selected == Some(loc.as_str()),
        })
        .collect()
}

/// Per-field messages for the item form.
#[derive(Debug, Clone, Default)]
pub struct FormErrors {
    pub kind: Vec<String>,
    pub name: Vec<String>,
    pub description: Vec<String>,
    pub location: Vec<String>,
    pub contact: Vec<String>,
    pub image: Vec<String>,
}

impl From<&ValidationErrors> for FormErrors {
    fn from(errors: &ValidationErrors) -> Self {
        let collect = |field: &str| -> Vec<String> {
            errors
                .for_field(field)
                .into_iter()
                .map(str::to_owned)
                .collect()
        };
        Self {
            kind: collect("type"),
            name: collect("name"),
            description: collect("description"),
            location: collect("location"),
            contact: collect("contact"),
            image: collect("image"),
        }
    }
}

/// An item on the home page or a listing page.
#[derive(Debug, Clone)]
pub struct ItemCard {
    pub id: i32,
    pub kind: &'static str,
    pub kind_label: &'static str,
    pub name: String,
    pub excerpt: String,
    pub location: String,
    pub image_url: Option<String>,
    pub posted: String,
}

impl From<&Item> for ItemCard {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id.as_i32(),
            kind: item.kind.as_str(),
            kind_label: item.kind.label(),
            name: item.name.clone(),
            excerpt: truncate_chars(&item.description, EXCERPT_LENGTH),
            location: item.location.clone(),
            image_url: item.image.as_deref().map(image_url),
            posted: format_timestamp(item.created_at),
        }
    }
}

/// Everything the detail page shows.
#[derive(Debug, Clone)]
pub struct ItemDetail {
    pub id: i32,
    pub kind: &'static str,
    pub kind_label: &'static str,
    pub name: String,
    pub description: String,
    pub location: String,
    pub contact: String,
    pub image_url: Option<String>,
    pub posted: String,
    pub can_edit: bool,
    pub can_delete: bool,
}

impl ItemDetail {
    #[must_use]
    pub fn new(item: &Item, viewer: Option<&CurrentUser>) -> Self {
        Self {
            id: item.id.as_i32(),
            kind: item.kind.as_str(),
            kind_label: item.kind.label(),
            name: item.name.clone(),
            description: item.description.clone(),
            location: item.location.clone(),
            contact: item.contact.as_str().to_owned(),
            image_url: item.image.as_deref().map(image_url),
            posted: format_timestamp(item.created_at),
            can_edit: viewer.is_some_and(|user| can_modify(item, user)),
            can_delete: viewer.is_some_and(|user| user.is_admin),
        }
    }
}

/// Public URL of a stored photo.
#[must_use]
pub fn image_url(stored_name: &str) -> String {
    format!("/uploads/{stored_name}")
}

/// Listing URL with the given page and filters.
#[must_use]
pub fn list_url(kind: ItemKind, page: u32, search: Option<&str>, location: Option<&str>) -> String {
    let mut url = format!("/list/{}?page={page}", kind.as_str());
    if let Some(search) = search.filter(|s| !s.is_empty()) {
        url.push_str("&search=");
        url.push_str(&urlencoding::encode(search));
    }
    if let Some(location) = location.filter(|s| !s.is_empty()) {
        url.push_str("&location=");
        url.push_str(&urlencoding::encode(location));
    }
    url
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%d %b %Y, %H:%M").to_string()
}

/// Shortens text to at most `max` characters, appending an ellipsis.
fn truncate_chars(text: &str, max: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max {
        return text.to_owned();
    }
    let mut cut: String = text.chars().take(max).collect();
    cut.truncate(cut.trim_end().len());
    cut.push('…');
    cut
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lostfound_core::{ContactNumber, ItemId, UserId};

    use super::*;

    fn item(owner: i32) -> Item {
        Item {
            id: ItemId::new(9),
            kind: ItemKind::Lost,
            name: "Lost: Wallet".to_owned(),
            description: "Brown".to_owned(),
            location: "Kantin Utama".to_owned(),
            contact: ContactNumber::from_stored("081234567890".to_owned()),
            image: Some("0123456789abcdef.jpg".to_owned()),
            created_at: Utc::now(),
            user_id: UserId::new(owner),
        }
    }

    fn user(id: i32, is_admin: bool) -> CurrentUser {
        CurrentUser {
            id: UserId::new(id),
            username: format!("user{id}"),
            is_admin,
        }
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate_chars("  Dompet coklat ", 50), "Dompet coklat");
        assert_eq!(truncate_chars("Kunci motor Honda", 11), "Kunci motor…");
        assert_eq!(truncate_chars("Kunci motor Honda", 6), "Kunci…");
    }

    #[test]
    fn test_form_location_options_end_with_custom() {
        let options = form_location_options("lainnya");
        assert_eq!(options.len(), 10);
        let last = options.last().unwrap();
        assert_eq!(last.value, "lainnya");
        assert!(last.selected);
        assert_eq!(options.iter().filter(|o| o.selected).count(), 1);
    }

    #[test]
    fn test_detail_permissions() {
        let wallet = item(2);
        let anonymous = ItemDetail::new(&wallet, None);
        assert!(!anonymous.can_edit && !anonymous.can_delete);

        let owner = ItemDetail::new(&wallet, Some(&user(2, false)));
        assert!(owner.can_edit);
        assert!(!owner.can_delete);

        let stranger = ItemDetail::new(&wallet, Some(&user(3, false)));
        assert!(!stranger.can_edit);

        let admin = ItemDetail::new(&wallet, Some(&user(1, true)));
        assert!(admin.can_edit && admin.can_delete);
        assert_eq!(admin.image_url.as_deref(), Some("/uploads/0123456789abcdef.jpg"));
    }

    #[test]
    fn test_list_url_encodes_filters() {
        assert_eq!(list_url(ItemKind::Found, 2, None, Some("")), "/list/found?page=2");
        assert_eq!(
            list_url(ItemKind::Lost, 1, Some("kunci & dompet"), Some("Area Parkir")),
            "/list/lost?page=1&search=kunci%20%26%20dompet&location=Area%20Parkir"
        );
    }
}
