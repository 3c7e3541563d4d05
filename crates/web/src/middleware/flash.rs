//! One-shot flash messages and the per-page context extractor.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::models::{CurrentUser, Flash, session::keys};

/// Queue a message for the next rendered page.
///
/// Failures are logged; a lost flash message never fails the request.
pub async fn set_flash(session: &Session, flash: Flash) {
    if let Err(e) = session.insert(keys::FLASH, flash).await {
        tracing::warn!(error = %e, "Failed to store flash message");
    }
}

/// Take the pending flash message, if any.
///
/// The session is only modified when a message was present.
pub async fn take_flash(session: &Session) -> Option<Flash> {
    let flash = session.get::<Flash>(keys::FLASH).await.ok().flatten()?;
    if let Err(e) = session.remove_value(keys::FLASH).await {
        tracing::warn!(error = %e, "Failed to clear flash message");
    }
    Some(flash)
}

/// What every page needs for its layout: who is logged in, and any pending
/// flash message (consumed by this extraction).
pub struct PageContext {
    pub user: Option<CurrentUser>,
    pub flash: Option<Flash>,
}

impl<S> FromRequestParts<S> for PageContext
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(session) = parts.extensions.get::<Session>() else {
            return Ok(Self {
                user: None,
                flash: None,
            });
        };

        let user = session
            .get::<CurrentUser>(keys::CURRENT_USER)
            .await
            .ok()
            .flatten();
        let flash = take_flash(session).await;

        Ok(Self { user, flash })
    }
}
