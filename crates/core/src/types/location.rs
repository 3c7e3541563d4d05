//! Campus locations and submitted-location resolution.
//!
//! Listing forms offer a fixed set of campus locations plus a "lainnya"
//! (other) option backed by a free-text field. Fixed options are stored
//! under their human-readable name, custom values verbatim (trimmed).

use core::fmt;

/// Form code of the "other" option that enables the free-text field.
pub const CUSTOM_LOCATION_CODE: &str = "lainnya";

/// Label shown for the "other" option.
pub const CUSTOM_LOCATION_LABEL: &str = "Lainnya (ketik sendiri)";

/// Maximum stored length of a location, in characters.
pub const MAX_LOCATION_LENGTH: usize = 100;

/// Errors produced while resolving a submitted location.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    /// No option chosen, or "other" chosen with an empty free-text value.
    #[error("location is required")]
    Missing,
    /// The submitted option is not one of the offered codes.
    #[error("unknown location option: {0:?}")]
    UnknownOption(String),
    /// The free-text value exceeds the column size.
    #[error("location must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// A predefined campus location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CampusLocation {
    GedungA,
    GedungB,
    GedungC,
    Perpustakaan,
    Kantin,
    LabKomputer,
    Auditorium,
    Lapangan,
    Parkiran,
}

impl CampusLocation {
    /// Every predefined location, in form order.
    pub const ALL: [Self; 9] = [
        Self::GedungA,
        Self::GedungB,
        Self::GedungC,
        Self::Perpustakaan,
        Self::Kantin,
        Self::LabKomputer,
        Self::Auditorium,
        Self::Lapangan,
        Self::Parkiran,
    ];

    /// Form code submitted by the location select.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::GedungA => "gedung_a",
            Self::GedungB => "gedung_b",
            Self::GedungC => "gedung_c",
            Self::Perpustakaan => "perpustakaan",
            Self::Kantin => "kantin",
            Self::LabKomputer => "lab_komputer",
            Self::Auditorium => "auditorium",
            Self::Lapangan => "lapangan",
            Self::Parkiran => "parkiran",
        }
    }

    /// Human-readable name, which is what gets stored on the item.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::GedungA => "Gedung A - Fakultas Teknik",
            Self::GedungB => "Gedung B - Fakultas Ekonomi",
            Self::GedungC => "Gedung C - Fakultas Hukum",
            Self::Perpustakaan => "Perpustakaan Pusat",
            Self::Kantin => "Kantin Utama",
            Self::LabKomputer => "Lab Komputer",
            Self::Auditorium => "Auditorium",
            Self::Lapangan => "Lapangan Olahraga",
            Self::Parkiran => "Area Parkir",
        }
    }

    /// Look up a location by form code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|loc| loc.code() == code)
    }

    /// Find the location a stored value refers to.
    ///
    /// Accepts either the human-readable name or the bare code, so rows
    /// written before names were stored still map back to their option.
    #[must_use]
    pub fn from_stored(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|loc| loc.name() == value || loc.code() == value)
    }
}

impl fmt::Display for CampusLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolve a submitted location option into the value to store.
///
/// The "other" option is checked first: its free-text value must be
/// non-empty after trimming. Any other option must be one of the
/// predefined codes and resolves to that location's name.
///
/// # Errors
///
/// - [`LocationError::Missing`] for an empty option, or "other" with no text
/// - [`LocationError::UnknownOption`] for codes outside the fixed table
/// - [`LocationError::TooLong`] when the custom text exceeds the column
///
/// # Examples
///
/// ```
/// use lostfound_core::{resolve_location, LocationError};
///
/// assert_eq!(resolve_location("kantin", "").unwrap(), "Kantin Utama");
/// assert_eq!(resolve_location("lainnya", "  Masjid ").unwrap(), "Masjid");
/// assert_eq!(resolve_location("lainnya", "   "), Err(LocationError::Missing));
/// ```
pub fn resolve_location(option: &str, custom: &str) -> Result<String, LocationError> {
    let option = option.trim();

    if option == CUSTOM_LOCATION_CODE {
        let custom = custom.trim();
        if custom.is_empty() {
            return Err(LocationError::Missing);
        }
        if custom.chars().count() > MAX_LOCATION_LENGTH {
            return Err(LocationError::TooLong {
                max: MAX_LOCATION_LENGTH,
            });
        }
        return Ok(custom.to_owned());
    }

    if option.is_empty() {
        return Err(LocationError::Missing);
    }

    CampusLocation::from_code(option)
        .map(|loc| loc.name().to_owned())
        .ok_or_else(|| LocationError::UnknownOption(option.to_owned()))
}
