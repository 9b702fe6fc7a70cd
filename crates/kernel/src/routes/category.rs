//! Public category and tag endpoints.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::content::ListingFilter;
use crate::error::{AppError, AppResult};
use crate::models::{Category, Tag};
use crate::representation::{self, CategoryRepr, ProductRepr, TagRepr};
use crate::state::AppState;

use super::product;

/// Create the category router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/categories/", get(list_all_categories))
        .route("/api/tags/", get(list_tags))
        .route("/api/{lang}/categories/", get(list_categories))
        .route("/api/{lang}/category/{slug}/", get(category_detail))
        .route("/api/{lang}/category/{slug}/products/", get(category_products))
        .route("/api/{lang}/tags/{slug}/", get(tag_products))
}

// =============================================================================
// Categories
// =============================================================================

/// GET /api/categories/
async fn list_all_categories(State(state): State<AppState>) -> AppResult<Json<Vec<CategoryRepr>>> {
    let categories = Category::list(state.db(), None).await?;
    Ok(Json(
        representation::categories(state.db(), state.media(), &categories).await?,
    ))
}

/// GET /api/{lang}/categories/
async fn list_categories(
    State(state): State<AppState>,
    Path(lang): Path<String>,
) -> AppResult<Json<Vec<CategoryRepr>>> {
    let lang = state.require_language(&lang)?;
    let categories = Category::list(state.db(), Some(&lang)).await?;
    Ok(Json(
        representation::categories(state.db(), state.media(), &categories).await?,
    ))
}

/// GET /api/{lang}/category/{slug}/
async fn category_detail(
    State(state): State<AppState>,
    Path((lang, slug)): Path<(String, String)>,
) -> AppResult<Json<CategoryRepr>> {
    let lang = state.require_language(&lang)?;
    let category = Category::find_by_slug(state.db(), &slug, Some(&lang))
        .await?
        .ok_or(AppError::NotFound)?;

    representation::categories(state.db(), state.media(), &[category])
        .await?
        .pop()
        .map(Json)
        .ok_or(AppError::NotFound)
}

/// Products in a category of the language.
///
/// GET /api/{lang}/category/{slug}/products/
async fn category_products(
    State(state): State<AppState>,
    Path((lang, slug)): Path<(String, String)>,
) -> AppResult<Json<Vec<ProductRepr>>> {
    let lang = state.require_language(&lang)?;
    let category = Category::find_by_slug(state.db(), &slug, Some(&lang))
        .await?
        .ok_or(AppError::NotFound)?;

    let filter = ListingFilter::new().lang(lang).category(Some(category.slug));
    product::list(&state, &filter).await
}

// =============================================================================
// Tags
// =============================================================================

/// GET /api/tags/
async fn list_tags(State(state): State<AppState>) -> AppResult<Json<Vec<TagRepr>>> {
    let tags = Tag::list(state.db()).await?;
    Ok(Json(tags.iter().map(TagRepr::from).collect()))
}

/// Products of the language carrying a tag.
///
/// GET /api/{lang}/tags/{slug}/
async fn tag_products(
    State(state): State<AppState>,
    Path((lang, slug)): Path<(String, String)>,
) -> AppResult<Json<Vec<ProductRepr>>> {
    let lang = state.require_language(&lang)?;
    let tag = Tag::find_by_slug(state.db(), &slug)
        .await?
        .ok_or(AppError::NotFound)?;

    let filter = ListingFilter::new().lang(lang).tag(Some(tag.slug));
    product::list(&state, &filter).await
}
