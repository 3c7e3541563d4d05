//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Password login and bootstrap account seeding
//! - `items` - Lost/found item create, edit, delete and listing
//! - `media` - Uploaded photo storage

pub mod auth;
pub mod items;
pub mod media;

pub use auth::{AuthError, AuthService};
pub use items::{ItemError, ItemService, ItemSubmission, ValidationErrors};
pub use media::{MediaError, MediaStore, UploadedFile};
