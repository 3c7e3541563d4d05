//! Domain models for the lost & found site.
//!
//! These are validated domain objects, separate from the database row types
//! in [`crate::db`].

pub mod item;
pub mod page;
pub mod session;
pub mod user;

pub use item::{Item, ItemChanges, ItemFilter, NewItem};
pub use page::{ITEMS_PER_PAGE, Page, PageRequest};
pub use session::{CurrentUser, Flash, FlashLevel};
pub use user::{NewUser, User};
