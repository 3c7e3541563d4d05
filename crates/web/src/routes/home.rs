//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;

use lostfound_core::ItemKind;

use crate::db::PgItemStore;
use crate::error::Result;
use crate::filters;
use crate::middleware::PageContext;
use crate::models::{CurrentUser, Flash};
use crate::services::items::{ItemService, LATEST_PER_KIND};
use crate::state::AppState;
use crate::views::ItemCard;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub user: Option<CurrentUser>,
    pub flash: Option<Flash>,
    pub lost: Vec<ItemCard>,
    pub found: Vec<ItemCard>,
}

/// Display the home page: the latest lost and found items.
#[tracing::instrument(skip_all)]
pub async fn home(State(state): State<AppState>, ctx: PageContext) -> Result<HomeTemplate> {
    let store = PgItemStore::new(state.pool());
    let service = ItemService::new(&store, state.media());

    let lost = service.latest(ItemKind::Lost, LATEST_PER_KIND).await?;
    let found = service.latest(ItemKind::Found, LATEST_PER_KIND).await?;

    Ok(HomeTemplate {
        user: ctx.user,
        flash: ctx.flash,
        lost: lost.iter().map(ItemCard::from).collect(),
        found: found.iter().map(ItemCard::from).collect(),
    })
}
