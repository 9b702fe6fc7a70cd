//! Public product endpoints.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::content::ListingFilter;
use crate::error::{AppError, AppResult};
use crate::models::Product;
use crate::representation::{self, ProductRepr};
use crate::state::AppState;

use super::helpers::ListingQuery;

/// Create the product router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/products/", get(list_all))
        .route("/api/{lang}/products/", get(list_in_language))
        .route("/api/{lang}/product/{slug}/", get(detail))
}

/// GET /api/products/?category=&tag=
async fn list_all(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> AppResult<Json<Vec<ProductRepr>>> {
    let filter = ListingFilter::new().category(query.category).tag(query.tag);
    list(&state, &filter).await
}

/// GET /api/{lang}/products/?category=&tag=
async fn list_in_language(
    State(state): State<AppState>,
    Path(lang): Path<String>,
    Query(query): Query<ListingQuery>,
) -> AppResult<Json<Vec<ProductRepr>>> {
    let lang = state.require_language(&lang)?;
    let filter = ListingFilter::new()
        .lang(lang)
        .category(query.category)
        .tag(query.tag);
    list(&state, &filter).await
}

/// Products matching a filter, with nested relations.
pub(crate) async fn list(
    state: &AppState,
    filter: &ListingFilter,
) -> AppResult<Json<Vec<ProductRepr>>> {
    let products = Product::list(state.db(), filter).await?;
    Ok(Json(
        representation::products(state.db(), state.media(), products).await?,
    ))
}

/// GET /api/{lang}/product/{slug}/
async fn detail(
    State(state): State<AppState>,
    Path((lang, slug)): Path<(String, String)>,
) -> AppResult<Json<ProductRepr>> {
    let lang = state.require_language(&lang)?;
    let filter = ListingFilter::new().lang(lang).slug(slug);
    let product = Product::find_one(state.db(), &filter)
        .await?
        .ok_or(AppError::NotFound)?;

    representation::products(state.db(), state.media(), vec![product])
        .await?
        .pop()
        .map(Json)
        .ok_or(AppError::NotFound)
}
