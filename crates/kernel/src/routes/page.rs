//! Public page endpoints.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::content::ListingFilter;
use crate::error::{AppError, AppResult};
use crate::models::Page;
use crate::representation::{self, PageRepr};
use crate::state::AppState;

use super::helpers::ListingQuery;

/// Create the page router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/pages/", get(list_all))
        .route("/api/{lang}/pages/", get(list_in_language))
        .route("/api/{lang}/page/{slug}/", get(detail))
}

/// List pages in every language.
///
/// GET /api/pages/?category=&tag=
async fn list_all(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> AppResult<Json<Vec<PageRepr>>> {
    let filter = ListingFilter::new().category(query.category).tag(query.tag);
    list(&state, &filter).await
}

/// List pages in one language.
///
/// GET /api/{lang}/pages/?category=&tag=
async fn list_in_language(
    State(state): State<AppState>,
    Path(lang): Path<String>,
    Query(query): Query<ListingQuery>,
) -> AppResult<Json<Vec<PageRepr>>> {
    let lang = state.require_language(&lang)?;
    let filter = ListingFilter::new()
        .lang(lang)
        .category(query.category)
        .tag(query.tag);
    list(&state, &filter).await
}

async fn list(state: &AppState, filter: &ListingFilter) -> AppResult<Json<Vec<PageRepr>>> {
    let pages = Page::list(state.db(), filter).await?;
    Ok(Json(representation::pages(state.db(), state.media(), pages).await?))
}

/// First page with the slug in the language.
///
/// GET /api/{lang}/page/{slug}/
async fn detail(
    State(state): State<AppState>,
    Path((lang, slug)): Path<(String, String)>,
) -> AppResult<Json<PageRepr>> {
    let lang = state.require_language(&lang)?;
    let filter = ListingFilter::new().lang(lang).slug(slug);
    let page = Page::find_one(state.db(), &filter)
        .await?
        .ok_or(AppError::NotFound)?;

    representation::pages(state.db(), state.media(), vec![page])
        .await?
        .pop()
        .map(Json)
        .ok_or(AppError::NotFound)
}
