//! Lost & Found Core - Shared domain types.
//!
//! This crate provides the types shared by every component of the campus
//! lost & found service:
//! - `web` - Server-rendered listing site
//! - `cli` - Command-line tools for migrations and account management
//!
//! # Architecture
//!
//! The core crate contains only types and pure validation - no I/O, no
//! database access, no HTTP. Form handling in the web crate builds on these
//! types so the rules for item kinds, campus locations and contact numbers
//! live in exactly one place.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, item kinds, campus locations and contact numbers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
