//! Authentication route handlers.
//!
//! Username/password login and logout. Accounts are seeded; there is no
//! registration page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::db::PgUserStore;
use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{
    PageContext, clear_current_user, is_local_path, login_url, set_current_user, set_flash,
};
use crate::models::{CurrentUser, Flash};
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    /// Where to go after logging in.
    #[serde(default)]
    pub next: String,
}

/// Query parameters for the login page.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub user: Option<CurrentUser>,
    pub flash: Option<Flash>,
    /// Local path to return to, empty for the home page.
    pub next: String,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(ctx: PageContext, Query(query): Query<LoginQuery>) -> Response {
    if ctx.user.is_some() {
        return Redirect::to("/").into_response();
    }

    let next = query.next.filter(|n| is_local_path(n)).unwrap_or_default();
    let flash = ctx.flash.or_else(|| {
        (!next.is_empty()).then(|| Flash::info("Please log in to continue."))
    });

    LoginTemplate {
        user: None,
        flash,
        next,
    }
    .into_response()
}

/// Handle login form submission.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let store = PgUserStore::new(state.pool());
    let auth = AuthService::new(&store);

    let user = match auth.login(&form.username, &form.password).await {
        Ok(user) => user,
        Err(AuthError::InvalidCredentials) => {
            set_flash(&session, Flash::error("Invalid username or password.")).await;
            return Ok(Redirect::to(&login_url(&form.next)).into_response());
        }
        Err(e) => return Err(e.into()),
    };

    let current = CurrentUser::from(&user);
    set_current_user(&session, &current).await?;
    set_sentry_user(&current);
    set_flash(
        &session,
        Flash::success(format!("Welcome, {}!", current.username)),
    )
    .await;

    let target = if is_local_path(&form.next) {
        form.next.as_str()
    } else {
        "/"
    };
    Ok(Redirect::to(target).into_response())
}

/// Log out and return to the home page.
pub async fn logout(session: Session) -> Result<Redirect, AppError> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    set_flash(&session, Flash::info("You have been logged out.")).await;
    Ok(Redirect::to("/"))
}
