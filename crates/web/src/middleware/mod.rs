//! HTTP middleware stack.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, added in `main`)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions with `PostgreSQL` store)
//! 4. Body limit (uploads capped a little above 2 MiB)

pub mod auth;
pub mod flash;
pub mod session;

pub use auth::{
    RequireAdmin, RequireAuth, clear_current_user, is_local_path, login_url,
    set_current_user,
};
pub use flash::{PageContext, set_flash, take_flash};
pub use session::create_session_layer;
