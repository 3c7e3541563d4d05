//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                 - Home page (latest 3 lost + 3 found)
//! GET  /health           - Liveness check
//! GET  /health/ready     - Readiness check (database)
//!
//! # Auth
//! GET  /login            - Login page
//! POST /login            - Login action
//! GET  /logout           - Logout action
//!
//! # Items
//! GET  /add              - Add item form (requires login)
//! POST /add              - Add item action (multipart)
//! GET  /list/{type}      - Listing (?page, ?search, ?location)
//! GET  /item/{id}        - Item detail
//! GET  /edit/{id}        - Edit form (owner or admin)
//! POST /edit/{id}        - Edit action (multipart)
//! POST /delete/{id}      - Delete action (admin)
//! ```

pub mod auth;
pub mod health;
pub mod home;
pub mod items;

use axum::{
    Router,
    response::IntoResponse,
    routing::{get, post},
};

use crate::error::AppError;
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
}

/// Create the item routes router.
pub fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/add", get(items::add_page).post(items::add))
        .route("/list/{kind}", get(items::list))
        .route("/item/{id}", get(items::detail))
        .route("/edit/{id}", get(items::edit_page).post(items::edit))
        .route("/delete/{id}", post(items::delete))
}

/// Create all routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(auth_routes())
        .merge(item_routes())
        .fallback(not_found)
}

/// Render the 404 page for unknown routes.
async fn not_found() -> impl IntoResponse {
    AppError::NotFound("route".to_string())
}
