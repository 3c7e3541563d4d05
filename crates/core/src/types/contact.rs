//! Contact phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ContactNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ContactError {
    /// The input is empty.
    #[error("contact number cannot be empty")]
    Empty,
    /// The input is not between 10 and 15 characters long.
    #[error("contact number must be {min}-{max} characters")]
    BadLength {
        /// Minimum allowed length.
        min: usize,
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains something other than digits, `+`, `-` or spaces.
    #[error("contact number may only contain digits, '+', '-' and spaces")]
    InvalidCharacter,
    /// The input contains separators only.
    #[error("contact number must contain digits")]
    NoDigits,
}

/// A normalized contact number (WhatsApp-style), digits only.
///
/// ## Constraints
///
/// The submitted value must be 10-15 characters made of digits, `+`, `-`
/// and whitespace. Separators are stripped on parse, so the stored value is
/// a bare digit string.
///
/// ## Examples
///
/// ```
/// use lostfound_core::ContactNumber;
///
/// let contact = ContactNumber::parse("+62 812-3456-78").unwrap();
/// assert_eq!(contact.as_str(), "62812345678");
///
/// assert!(ContactNumber::parse("0812").is_err());        // too short
/// assert!(ContactNumber::parse("0812-ABCD-999").is_err()); // letters
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ContactNumber(String);

impl ContactNumber {
    /// Minimum submitted length, separators included.
    pub const MIN_LENGTH: usize = 10;
    /// Maximum submitted length, separators included.
    pub const MAX_LENGTH: usize = 15;

    /// Validate and normalize a submitted contact number.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Is empty
    /// - Is not 10-15 characters long
    /// - Contains characters other than digits, `+`, `-` and whitespace
    /// - Contains no digits at all
    pub fn parse(s: &str) -> Result<Self, ContactError> {
        if s.is_empty() {
            return Err(ContactError::Empty);
        }

        let len = s.chars().count();
        if !(Self::MIN_LENGTH..=Self::MAX_LENGTH).contains(&len) {
            return Err(ContactError::BadLength {
                min: Self::MIN_LENGTH,
                max: Self::MAX_LENGTH,
            });
        }

        if !s
            .chars()
            .all(|c| c.is_ascii_digit() || c == '+' || c == '-' || c.is_whitespace())
        {
            return Err(ContactError::InvalidCharacter);
        }

        let digits: String = s.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return Err(ContactError::NoDigits);
        }

        Ok(Self(digits))
    }

    /// Wrap a value read back from storage without re-validating it.
    #[must_use]
    pub const fn from_stored(digits: String) -> Self {
        Self(digits)
    }

    /// Returns the normalized digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the number and returns the normalized digits.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ContactNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ContactNumber {
    type Err = ContactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ContactNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
