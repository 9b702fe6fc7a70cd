//! Admin routes for menu items.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::menu::public_link;
use crate::models::menu_item::NewMenuItem;
use crate::models::{MenuItem, MenuItemForm, Page};
use crate::state::AppState;

use super::helpers::LangQuery;

/// Create the menu admin router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/menuitem/", get(list_items).post(create_item))
        .route(
            "/admin/menuitem/{id}/",
            get(get_item).put(update_item).delete(delete_item),
        )
}

/// Menu item as shown in the admin, with the `/api` prefix stripped from its link.
#[derive(Debug, Serialize)]
struct MenuItemRow {
    id: i64,
    title: String,
    link: Option<String>,
    parent_id: Option<i64>,
    page_id: Option<i64>,
    newtab: bool,
    order: i32,
    lang: String,
}

impl From<MenuItem> for MenuItemRow {
    fn from(item: MenuItem) -> Self {
        Self {
            link: public_link(item.link.as_deref()),
            id: item.id,
            title: item.title,
            parent_id: item.parent_id,
            page_id: item.page_id,
            newtab: item.newtab,
            order: item.sort_order,
            lang: item.lang,
        }
    }
}

/// Resolve the form, binding the link to the chosen page when there is one.
async fn prepare(state: &AppState, form: &MenuItemForm) -> AppResult<NewMenuItem> {
    let mut input = form.resolve(state.languages())?;

    if let Some(page_id) = input.page_id {
        let page = Page::find_by_id(state.db(), page_id)
            .await?
            .ok_or_else(|| AppError::Validation(format!("page {page_id} does not exist")))?;
        input.bind_page(&page);
    }

    Ok(input)
}

/// GET /admin/menuitem/?lang=
async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<LangQuery>,
) -> AppResult<Json<Vec<MenuItemRow>>> {
    let lang = query.resolve(&state)?;
    let items = MenuItem::list(state.db(), lang.as_deref()).await?;
    Ok(Json(items.into_iter().map(MenuItemRow::from).collect()))
}

/// GET /admin/menuitem/{id}/
async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MenuItemRow>> {
    MenuItem::find_by_id(state.db(), id)
        .await?
        .map(|item| Json(MenuItemRow::from(item)))
        .ok_or(AppError::NotFound)
}

/// POST /admin/menuitem/
async fn create_item(
    State(state): State<AppState>,
    Json(form): Json<MenuItemForm>,
) -> AppResult<(StatusCode, Json<MenuItemRow>)> {
    let input = prepare(&state, &form).await?;
    let item = MenuItem::create(state.db(), &input)
        .await
        .map_err(AppError::from_write)?;
    Ok((StatusCode::CREATED, Json(MenuItemRow::from(item))))
}

/// PUT /admin/menuitem/{id}/
async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(form): Json<MenuItemForm>,
) -> AppResult<Json<MenuItemRow>> {
    let input = prepare(&state, &form).await?;

    let cycle = match input.parent_id {
        Some(parent_id) => MenuItem::would_cycle(state.db(), id, parent_id).await?,
        None => false,
    };
    if cycle {
        return Err(AppError::Validation(
            "a menu item cannot be placed under itself or its descendants".to_string(),
        ));
    }

    MenuItem::update(state.db(), id, &input)
        .await
        .map_err(AppError::from_write)?
        .map(|item| Json(MenuItemRow::from(item)))
        .ok_or(AppError::NotFound)
}

/// Deletes the item and, through the schema, its descendants.
///
/// DELETE /admin/menuitem/{id}/
async fn delete_item(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<StatusCode> {
    if !MenuItem::delete(state.db(), id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!(id, "deleted menu item");
    Ok(StatusCode::NO_CONTENT)
}
