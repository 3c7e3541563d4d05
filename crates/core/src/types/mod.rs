//! Core types for the lost & found service.
//!
//! This module provides type-safe wrappers for the domain concepts that
//! submitted forms are validated against.

pub mod contact;
pub mod id;
pub mod kind;
pub mod location;

pub use contact::{ContactError, ContactNumber};
pub use id::*;
pub use kind::{ItemKind, ItemKindError};
pub use location::{
    CUSTOM_LOCATION_CODE, CUSTOM_LOCATION_LABEL, CampusLocation, LocationError,
    MAX_LOCATION_LENGTH, resolve_location,
};
