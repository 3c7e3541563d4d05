//! Submitted item form and its validation.

use lostfound_core::{
    CUSTOM_LOCATION_CODE, CampusLocation, ContactError, ContactNumber, ItemKind, LocationError,
    resolve_location,
};

use super::error::ValidationErrors;
use crate::models::Item;

/// Maximum length of the name as typed, before the kind label is added.
pub const MAX_NAME_LENGTH: usize = 100;

/// Raw values of the add/edit form, as submitted.
///
/// Also used to re-render the form, so it holds strings rather than
/// validated types.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemSubmission {
    /// `lost` or `found`.
    pub kind: String,
    pub name: String,
    pub description: String,
    /// Location option code, or `lainnya`.
    pub location: String,
    /// Free-text location, used when `location` is `lainnya`.
    pub location_custom: String,
    pub contact: String,
}

/// A submission that passed validation, ready to store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedItem {
    pub kind: ItemKind,
    /// Name carrying the kind label.
    pub name: String,
    pub description: String,
    pub location: String,
    pub contact: ContactNumber,
}

impl ItemSubmission {
    /// Prefill values for editing an existing item.
    ///
    /// The kind label is removed from the name. A stored location matching
    /// a fixed campus location selects that option; anything else selects
    /// the custom option with the text prefilled.
    #[must_use]
    pub fn from_item(item: &Item) -> Self {
        let (location, location_custom) = match CampusLocation::from_stored(&item.location) {
            Some(loc) => (loc.code().to_owned(), String::new()),
            None => (CUSTOM_LOCATION_CODE.to_owned(), item.location.clone()),
        };

        Self {
            kind: item.kind.as_str().to_owned(),
            name: item.display_name().to_owned(),
            description: item.description.clone(),
            location,
            location_custom,
            contact: item.contact.as_str().to_owned(),
        }
    }

    /// Validate every field, collecting all errors.
    ///
    /// # Errors
    ///
    /// Returns the per-field errors if any field is invalid.
    pub fn validate(&self) -> Result<ValidatedItem, ValidationErrors> {
        self.validate_with(None)
    }

    /// Validate an edit of an item whose contact is `stored_contact`.
    ///
    /// A contact left exactly as prefilled is kept as stored, even if it
    /// would not pass validation as a fresh submission.
    ///
    /// # Errors
    ///
    /// Returns the per-field errors if any field is invalid.
    pub fn validate_edit(
        &self,
        stored_contact: &ContactNumber,
    ) -> Result<ValidatedItem, ValidationErrors> {
        self.validate_with(Some(stored_contact))
    }

    fn validate_with(
        &self,
        stored_contact: Option<&ContactNumber>,
    ) -> Result<ValidatedItem, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let kind = match ItemKind::parse(self.kind.trim()) {
            Ok(kind) => Some(kind),
            Err(_) => {
                errors.add("type", "Choose whether the item was lost or found.");
                None
            }
        };

        let name = self.name.trim();
        if name.is_empty() {
            errors.add("name", "Item name is required.");
        } else if name.chars().count() > MAX_NAME_LENGTH {
            errors.add(
                "name",
                format!("Item name must be at most {MAX_NAME_LENGTH} characters."),
            );
        }

        let description = self.description.trim();
        if description.is_empty() {
            errors.add("description", "Description is required.");
        }

        let location = match resolve_location(&self.location, &self.location_custom) {
            Ok(location) => Some(location),
            Err(e) => {
                errors.add("location", location_message(&self.location, &e));
                None
            }
        };

        let submitted_contact = self.contact.trim();
        let contact = match stored_contact {
            Some(stored) if stored.as_str() == submitted_contact => Some(stored.clone()),
            _ => match ContactNumber::parse(submitted_contact) {
                Ok(contact) => Some(contact),
                Err(e) => {
                    errors.add("contact", contact_message(&e));
                    None
                }
            },
        };

        match (kind, location, contact) {
            (Some(kind), Some(location), Some(contact)) if errors.is_empty() => Ok(ValidatedItem {
                kind,
                name: kind.prefixed_name(name),
                description: description.to_owned(),
                location,
                contact,
            }),
            _ => Err(errors),
        }
    }
}

fn location_message(option: &str, error: &LocationError) -> String {
    match error {
        LocationError::Missing if option.trim() == CUSTOM_LOCATION_CODE => {
            "Type the location when choosing \"Lainnya\".".to_owned()
        }
        LocationError::Missing => "Location is required.".to_owned(),
        LocationError::UnknownOption(_) => "Choose a location from the list.".to_owned(),
        LocationError::TooLong { max } => format!("Location must be at most {max} characters."),
    }
}

fn contact_message(error: &ContactError) -> String {
    match error {
        ContactError::Empty => "Contact number is required.".to_owned(),
        ContactError::BadLength { min, max } => {
            format!("Contact number must be {min} to {max} characters.")
        }
        ContactError::InvalidCharacter | ContactError::NoDigits => {
            "Contact number may only contain digits, spaces, '+' and '-'.".to_owned()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use lostfound_core::{ItemId, UserId};

    use super::*;

    fn wallet() -> ItemSubmission {
        ItemSubmission {
            kind: "lost".to_owned(),
            name: "Wallet".to_owned(),
            description: "Brown leather wallet".to_owned(),
            location: "kantin".to_owned(),
            location_custom: String::new(),
            contact: "+62 812-3456-78".to_owned(),
        }
    }

    #[test]
    fn test_valid_submission() {
        let item = wallet().validate().unwrap();
        assert_eq!(item.kind, ItemKind::Lost);
        assert_eq!(item.name, "Lost: Wallet");
        assert_eq!(item.location, "Kantin Utama");
        assert_eq!(item.contact.as_str(), "62812345678");
    }

    #[test]
    fn test_custom_location_without_text_fails() {
        let mut form = wallet();
        form.location = "lainnya".to_owned();
        let errors = form.validate().unwrap_err();
        assert!(errors.has("location"));
        assert_eq!(errors.iter().count(), 1);
    }

    #[test]
    fn test_custom_location_is_used_verbatim() {
        let mut form = wallet();
        form.location = "lainnya".to_owned();
        form.location_custom = "  Masjid Kampus ".to_owned();
        assert_eq!(form.validate().unwrap().location, "Masjid Kampus");
    }

    #[test]
    fn test_collects_all_errors() {
        let form = ItemSubmission {
            kind: "stolen".to_owned(),
            ..ItemSubmission::default()
        };
        let errors = form.validate().unwrap_err();
        for field in ["type", "name", "description", "location", "contact"] {
            assert!(errors.has(field), "missing error for {field}");
        }
    }

    #[test]
    fn test_name_length_limit() {
        let mut form = wallet();
        form.name = "x".repeat(MAX_NAME_LENGTH);
        assert!(form.validate().is_ok());
        form.name = "x".repeat(MAX_NAME_LENGTH + 1);
        assert!(form.validate().unwrap_err().has("name"));
    }

    #[test]
    fn test_contact_pattern() {
        let mut form = wallet();
        form.contact = "0812 ABC 4567".to_owned();
        assert!(form.validate().unwrap_err().has("contact"));
        form.contact = "08123".to_owned();
        assert!(form.validate().unwrap_err().has("contact"));
    }

    fn stored(location: &str) -> Item {
        Item {
            id: ItemId::new(4),
            kind: ItemKind::Found,
            name: "Found: Umbrella".to_owned(),
            description: "Blue".to_owned(),
            location: location.to_owned(),
            contact: ContactNumber::from_stored("081234567890".to_owned()),
            image: None,
            created_at: Utc::now(),
            user_id: UserId::new(2),
        }
    }

    #[test]
    fn test_prefill_fixed_location() {
        let form = ItemSubmission::from_item(&stored("Perpustakaan Pusat"));
        assert_eq!(form.kind, "found");
        assert_eq!(form.name, "Umbrella");
        assert_eq!(form.location, "perpustakaan");
        assert!(form.location_custom.is_empty());
    }

    #[test]
    fn test_prefill_custom_location() {
        let form = ItemSubmission::from_item(&stored("Masjid Kampus"));
        assert_eq!(form.location, "lainnya");
        assert_eq!(form.location_custom, "Masjid Kampus");
    }

    #[test]
    fn test_edit_keeps_unchanged_short_stored_contact() {
        // 9 digits, stored from "+62 812 345 6"
        let mut item = stored("Kantin Utama");
        item.contact = ContactNumber::from_stored("628123456".to_owned());

        let mut form = ItemSubmission::from_item(&item);
        form.description = "Blue, with a wooden handle".to_owned();

        assert!(form.validate().unwrap_err().has("contact"));
        let validated = form.validate_edit(&item.contact).unwrap();
        assert_eq!(validated.contact, item.contact);

        form.contact = "0812".to_owned();
        assert!(form.validate_edit(&item.contact).unwrap_err().has("contact"));
    }

    #[test]
    fn test_prefill_round_trips_through_validation() {
        let item = stored("Masjid Kampus");
        let validated = ItemSubmission::from_item(&item).validate().unwrap();
        assert_eq!(validated.name, item.name);
        assert_eq!(validated.location, item.location);
    }
}
