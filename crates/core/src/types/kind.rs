//! Listing kind: whether an item was lost or found.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a string is not a known [`ItemKind`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown item kind: {0:?} (expected \"lost\" or \"found\")")]
pub struct ItemKindError(pub String);

/// Whether a listing reports a lost item or a found item.
///
/// Stored and routed as the lowercase code (`lost`, `found`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Lost,
    Found,
}

impl ItemKind {
    /// Every kind, in display order.
    pub const ALL: [Self; 2] = [Self::Lost, Self::Found];

    /// Parse a kind from its lowercase code.
    ///
    /// # Errors
    ///
    /// Returns [`ItemKindError`] for anything other than `lost` or `found`.
    pub fn parse(s: &str) -> Result<Self, ItemKindError> {
        match s {
            "lost" => Ok(Self::Lost),
            "found" => Ok(Self::Found),
            other => Err(ItemKindError(other.to_owned())),
        }
    }

    /// Lowercase code used in URLs, forms and the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lost => "lost",
            Self::Found => "found",
        }
    }

    /// Capitalized label prefixed onto listing names (`"Lost: Wallet"`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Lost => "Lost",
            Self::Found => "Found",
        }
    }

    /// Heading shown above listings of this kind.
    #[must_use]
    pub const fn heading(self) -> &'static str {
        match self {
            Self::Lost => "Lost Items",
            Self::Found => "Found Items",
        }
    }

    /// Build the stored listing name from a submitted name.
    #[must_use]
    pub fn prefixed_name(self, name: &str) -> String {
        format!("{}: {name}", self.label())
    }

    /// Strip this kind's label prefix from a stored listing name.
    ///
    /// Names without the prefix are returned unchanged.
    #[must_use]
    pub fn strip_prefix(self, stored: &str) -> &str {
        stored
            .strip_prefix(self.label())
            .and_then(|rest| rest.strip_prefix(": "))
            .unwrap_or(stored)
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ItemKind {
    type Err = ItemKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_kinds() {
        assert_eq!(ItemKind::parse("lost").unwrap(), ItemKind::Lost);
        assert_eq!(ItemKind::parse("found").unwrap(), ItemKind::Found);
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!(ItemKind::parse("Lost").is_err());
        assert!(ItemKind::parse("FOUND").is_err());
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = ItemKind::parse("stolen").unwrap_err();
        assert_eq!(err, ItemKindError("stolen".to_owned()));
        assert!(ItemKind::parse("").is_err());
    }

    #[test]
    fn test_prefixed_name_uses_capitalized_label() {
        assert_eq!(ItemKind::Lost.prefixed_name("Wallet"), "Lost: Wallet");
        assert_eq!(ItemKind::Found.prefixed_name("Umbrella"), "Found: Umbrella");
    }

    #[test]
    fn test_strip_prefix() {
        assert_eq!(ItemKind::Lost.strip_prefix("Lost: Wallet"), "Wallet");
        assert_eq!(ItemKind::Found.strip_prefix("Lost: Wallet"), "Lost: Wallet");
        assert_eq!(ItemKind::Lost.strip_prefix("Wallet"), "Wallet");
        assert_eq!(ItemKind::Lost.strip_prefix("Lost: Lost: Keys"), "Lost: Keys");
    }

    #[test]
    fn test_display_matches_code() {
        for kind in ItemKind::ALL {
            assert_eq!(kind.to_string(), kind.as_str());
            assert_eq!(kind.as_str().parse::<ItemKind>().unwrap(), kind);
        }
    }
}
