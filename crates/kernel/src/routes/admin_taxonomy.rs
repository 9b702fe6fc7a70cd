//! Admin routes for category and tag management.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::error::{AppError, AppResult};
use crate::models::{Category, CategoryForm, Tag, TagForm};
use crate::state::AppState;

use super::helpers::{AdminRow, LangQuery, with_thumbnail, with_thumbnails};

/// Create the taxonomy admin router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/category/", get(list_categories).post(create_category))
        .route(
            "/admin/category/{id}/",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
        .route("/admin/tag/", get(list_tags).post(create_tag))
        .route(
            "/admin/tag/{id}/",
            get(get_tag).put(update_tag).delete(delete_tag),
        )
}

// =============================================================================
// Category handlers
// =============================================================================

/// GET /admin/category/?lang=
async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<LangQuery>,
) -> AppResult<Json<Vec<AdminRow<Category>>>> {
    let lang = query.resolve(&state)?;
    let categories = Category::list(state.db(), lang.as_deref()).await?;
    Ok(Json(
        with_thumbnails(&state, categories, |c| c.image_id).await?,
    ))
}

/// GET /admin/category/{id}/
async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AdminRow<Category>>> {
    let category = Category::find_by_id(state.db(), id)
        .await?
        .ok_or(AppError::NotFound)?;
    let image_id = category.image_id;
    Ok(Json(with_thumbnail(&state, category, image_id).await?))
}

/// POST /admin/category/
async fn create_category(
    State(state): State<AppState>,
    Json(form): Json<CategoryForm>,
) -> AppResult<(StatusCode, Json<AdminRow<Category>>)> {
    let input = form.resolve(state.languages())?;
    let category = Category::create(state.db(), &input)
        .await
        .map_err(AppError::from_write)?;
    let image_id = category.image_id;
    Ok((
        StatusCode::CREATED,
        Json(with_thumbnail(&state, category, image_id).await?),
    ))
}

/// PUT /admin/category/{id}/
async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(form): Json<CategoryForm>,
) -> AppResult<Json<AdminRow<Category>>> {
    let input = form.resolve(state.languages())?;
    let category = Category::update(state.db(), id, &input)
        .await
        .map_err(AppError::from_write)?
        .ok_or(AppError::NotFound)?;
    let image_id = category.image_id;
    Ok(Json(with_thumbnail(&state, category, image_id).await?))
}

/// DELETE /admin/category/{id}/
async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    if !Category::delete(state.db(), id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!(id, "deleted category");
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Tag handlers
// =============================================================================

/// GET /admin/tag/
async fn list_tags(State(state): State<AppState>) -> AppResult<Json<Vec<Tag>>> {
    Ok(Json(Tag::list(state.db()).await?))
}

/// GET /admin/tag/{id}/
async fn get_tag(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<Tag>> {
    Tag::find_by_id(state.db(), id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

/// POST /admin/tag/
async fn create_tag(
    State(state): State<AppState>,
    Json(form): Json<TagForm>,
) -> AppResult<(StatusCode, Json<Tag>)> {
    let input = form.resolve()?;
    let tag = Tag::create(state.db(), &input)
        .await
        .map_err(AppError::from_write)?;
    Ok((StatusCode::CREATED, Json(tag)))
}

/// PUT /admin/tag/{id}/
async fn update_tag(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(form): Json<TagForm>,
) -> AppResult<Json<Tag>> {
    let input = form.resolve()?;
    Tag::update(state.db(), id, &input)
        .await
        .map_err(AppError::from_write)?
        .map(Json)
        .ok_or(AppError::NotFound)
}

/// DELETE /admin/tag/{id}/
async fn delete_tag(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<StatusCode> {
    if !Tag::delete(state.db(), id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!(id, "deleted tag");
    Ok(StatusCode::NO_CONTENT)
}
