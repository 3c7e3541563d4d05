//! Item route handlers.
//!
//! Add, list, detail, edit and delete. Forms are multipart because of the
//! optional photo; invalid submissions re-render the form with 422.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{
        Multipart, Path, Query, State,
        multipart::MultipartError,
    },
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use lostfound_core::{ItemId, ItemKind};

use crate::db::PgItemStore;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{PageContext, RequireAdmin, RequireAuth, set_flash};
use crate::models::{CurrentUser, Flash};
use crate::services::items::{
    ItemError, ItemService, ItemSubmission, ValidationErrors, ensure_can_modify, page_request,
};
use crate::services::media::UploadedFile;
use crate::state::AppState;
use crate::views::{
    FormErrors, ItemCard, ItemDetail, SelectOption, filter_location_options,
    form_location_options, kind_options, list_url,
};

// =============================================================================
// Query Types
// =============================================================================

/// Listing query parameters. `page` stays a string so junk falls back to 1.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub search: Option<String>,
    pub location: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Add/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "items/form.html")]
pub struct ItemFormTemplate {
    pub user: Option<CurrentUser>,
    pub flash: Option<Flash>,
    pub title: &'static str,
    pub action: String,
    pub submit_label: &'static str,
    pub form: ItemSubmission,
    pub errors: FormErrors,
    pub kinds: Vec<SelectOption>,
    pub locations: Vec<SelectOption>,
    pub custom_selected: bool,
    /// Photo currently attached (edit only).
    pub current_image: Option<String>,
}

/// Listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "items/list.html")]
pub struct ListTemplate {
    pub user: Option<CurrentUser>,
    pub flash: Option<Flash>,
    pub kind: &'static str,
    pub heading: &'static str,
    pub items: Vec<ItemCard>,
    pub page: u32,
    pub total: u64,
    pub total_pages: u32,
    pub prev_url: Option<String>,
    pub next_url: Option<String>,
    pub search: String,
    pub locations: Vec<SelectOption>,
}

/// Detail page for lost items.
#[derive(Template, WebTemplate)]
#[template(path = "items/detail_lost.html")]
pub struct DetailLostTemplate {
    pub user: Option<CurrentUser>,
    pub flash: Option<Flash>,
    pub item: ItemDetail,
}

/// Detail page for found items.
#[derive(Template, WebTemplate)]
#[template(path = "items/detail_found.html")]
pub struct DetailFoundTemplate {
    pub user: Option<CurrentUser>,
    pub flash: Option<Flash>,
    pub item: ItemDetail,
}

impl ItemFormTemplate {
    fn new(user: CurrentUser, form: ItemSubmission, errors: &ValidationErrors) -> Self {
        Self {
            user: Some(user),
            flash: None,
            title: "Report an Item",
            action: "/add".to_string(),
            submit_label: "Submit",
            kinds: kind_options(&form.kind),
            locations: form_location_options(&form.location),
            custom_selected: form.location == lostfound_core::CUSTOM_LOCATION_CODE,
            errors: FormErrors::from(errors),
            form,
            current_image: None,
        }
    }

    fn for_edit(mut self, id: ItemId, current_image: Option<String>) -> Self {
        self.title = "Edit Item";
        self.action = format!("/edit/{id}");
        self.submit_label = "Save Changes";
        self.current_image = current_image.as_deref().map(crate::views::image_url);
        self
    }

    fn with_flash(mut self, flash: Option<Flash>) -> Self {
        self.flash = flash;
        self
    }

    /// Render as a 422 response.
    fn unprocessable(self) -> Response {
        (StatusCode::UNPROCESSABLE_ENTITY, self).into_response()
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Parse a path ID; anything that is not an ID is a missing item.
fn parse_item_id(raw: &str) -> Result<ItemId> {
    raw.parse::<ItemId>()
        .map_err(|_| AppError::NotFound(format!("item {raw}")))
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::BadRequest(e.body_text())
    }
}

/// Read the item form fields and optional photo from a multipart body.
async fn read_item_form(mut multipart: Multipart) -> Result<(ItemSubmission, Option<UploadedFile>)> {
    let mut form = ItemSubmission::default();
    let mut image = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        if name == "image" {
            let file_name = field.file_name().unwrap_or_default().to_owned();
            let bytes = field.bytes().await.map_err(multipart_error)?;
            // Browsers send an empty part when no file was chosen
            if !file_name.is_empty() {
                image = Some(UploadedFile {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            }
            continue;
        }

        let value = field.text().await.map_err(multipart_error)?;
        match name.as_str() {
            "type" => form.kind = value,
            "name" => form.name = value,
            "description" => form.description = value,
            "location" => form.location = value,
            "location_custom" => form.location_custom = value,
            "contact" => form.contact = value,
            _ => {}
        }
    }

    Ok((form, image))
}

// =============================================================================
// Add
// =============================================================================

/// Display the add item form.
pub async fn add_page(RequireAuth(user): RequireAuth, ctx: PageContext) -> ItemFormTemplate {
    ItemFormTemplate::new(user, ItemSubmission::default(), &ValidationErrors::new())
        .with_flash(ctx.flash)
}

/// Handle add item form submission.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    multipart: Multipart,
) -> Result<Response> {
    let (form, image) = read_item_form(multipart).await?;

    let store = PgItemStore::new(state.pool());
    let service = ItemService::new(&store, state.media());

    match service.create(&form, image, &user).await {
        Ok(saved) => {
            let flash = match saved.image_error {
                None => Flash::success("Item added."),
                Some(e) => Flash::info(format!("Item added without a photo: {e}.")),
            };
            set_flash(&session, flash).await;
            Ok(Redirect::to(&format!("/list/{}", saved.item.kind)).into_response())
        }
        Err(ItemError::Validation(errors)) => {
            Ok(ItemFormTemplate::new(user, form, &errors).unprocessable())
        }
        Err(e) => Err(e.into()),
    }
}

// =============================================================================
// List & Detail
// =============================================================================

/// List items of one kind, with search, location filter and pagination.
#[instrument(skip(state, ctx))]
pub async fn list(
    State(state): State<AppState>,
    ctx: PageContext,
    Path(kind): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<ListTemplate> {
    let store = PgItemStore::new(state.pool());
    let service = ItemService::new(&store, state.media());

    let search = query.search.as_deref().map(str::trim).unwrap_or_default();
    let location = query.location.as_deref().map(str::trim).unwrap_or_default();

    // Unknown kinds are rejected before anything touches the database
    let page = service
        .list(
            &kind,
            page_request(query.page.as_deref()),
            Some(search),
            Some(location),
        )
        .await?;
    let kind = ItemKind::parse(&kind).map_err(|_| AppError::NotFound(kind.clone()))?;
    let locations = service.locations().await?;

    let url = |p: u32| list_url(kind, p, Some(search), Some(location));

    Ok(ListTemplate {
        user: ctx.user,
        flash: ctx.flash,
        kind: kind.as_str(),
        heading: kind.heading(),
        items: page.items.iter().map(ItemCard::from).collect(),
        page: page.page,
        total: page.total,
        total_pages: page.total_pages(),
        prev_url: page.has_prev().then(|| url(page.page - 1)),
        next_url: page.has_next().then(|| url(page.page + 1)),
        search: search.to_owned(),
        locations: filter_location_options(&locations, Some(location)),
    })
}

/// Show one item, using the lost or found detail page.
#[instrument(skip(state, ctx))]
pub async fn detail(
    State(state): State<AppState>,
    ctx: PageContext,
    Path(id): Path<String>,
) -> Result<Response> {
    let id = parse_item_id(&id)?;
    let store = PgItemStore::new(state.pool());
    let item = ItemService::new(&store, state.media()).get(id).await?;

    let view = ItemDetail::new(&item, ctx.user.as_ref());
    let response = match item.kind {
        ItemKind::Lost => DetailLostTemplate {
            user: ctx.user,
            flash: ctx.flash,
            item: view,
        }
        .into_response(),
        ItemKind::Found => DetailFoundTemplate {
            user: ctx.user,
            flash: ctx.flash,
            item: view,
        }
        .into_response(),
    };
    Ok(response)
}

// =============================================================================
// Edit
// =============================================================================

/// Display the edit form, prefilled from the stored item.
#[instrument(skip(state, ctx, user))]
pub async fn edit_page(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ctx: PageContext,
    Path(id): Path<String>,
) -> Result<ItemFormTemplate> {
    let id = parse_item_id(&id)?;
    let store = PgItemStore::new(state.pool());
    let item = ItemService::new(&store, state.media()).get(id).await?;
    ensure_can_modify(&item, &user)?;

    Ok(ItemFormTemplate::new(
        user,
        ItemSubmission::from_item(&item),
        &ValidationErrors::new(),
    )
    .for_edit(id, item.image)
    .with_flash(ctx.flash))
}

/// Handle edit form submission.
#[instrument(skip_all, fields(user_id = %user.id, item = %id))]
pub async fn edit(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Response> {
    let id = parse_item_id(&id)?;
    let store = PgItemStore::new(state.pool());
    let service = ItemService::new(&store, state.media());

    // Authorize before reading the upload
    let existing = service.get(id).await?;
    ensure_can_modify(&existing, &user)?;

    let (form, image) = read_item_form(multipart).await?;

    match service.edit(id, &form, image, &user).await {
        Ok(item) => {
            set_flash(&session, Flash::success("Item updated.")).await;
            Ok(Redirect::to(&format!("/item/{}", item.id)).into_response())
        }
        Err(ItemError::Validation(errors)) => Ok(ItemFormTemplate::new(user, form, &errors)
            .for_edit(id, existing.image)
            .unprocessable()),
        Err(e) => Err(e.into()),
    }
}

// =============================================================================
// Delete
// =============================================================================

/// Delete an item. Admin only.
#[instrument(skip_all, fields(user_id = %user.id, item = %id))]
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let id = parse_item_id(&id)?;
    let store = PgItemStore::new(state.pool());
    let item = ItemService::new(&store, state.media())
        .delete(id, &user)
        .await?;

    set_flash(&session, Flash::success("Item deleted.")).await;
    Ok(Redirect::to(&format!("/list/{}", item.kind)))
}
