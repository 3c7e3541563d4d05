//! Campus Lost & Found web library.
//!
//! The binary in `main.rs` and the integration tests both build the
//! application through [`app`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod views;

use axum::{Router, extract::DefaultBodyLimit};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::services::media::MAX_UPLOAD_BYTES;
use crate::state::AppState;

/// Room for the text fields and multipart framing around the photo.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Build the application router.
///
/// Sentry layers are added by the binary so tests can run without a DSN.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.pool(), state.config());
    let static_dir = ServeDir::new(&state.config().static_dir);
    let upload_dir = ServeDir::new(state.media().upload_dir());

    routes::routes()
        .nest_service("/static", static_dir)
        .nest_service("/uploads", upload_dir)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + FORM_OVERHEAD_BYTES))
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
