//! Admin routes for images and the image picker.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::admin::{ImageChoice, image_display};
use crate::error::{AppError, AppResult};
use crate::models::{Image, ImageForm};
use crate::state::AppState;

use super::helpers::AdminRow;

/// Create the image admin router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/image/", get(list_images).post(create_image))
        .route("/admin/image/choices/", get(image_choices))
        .route(
            "/admin/image/{id}/",
            get(get_image).put(update_image).delete(delete_image),
        )
}

fn row(state: &AppState, image: Image) -> AdminRow<Image> {
    AdminRow {
        image_display: image_display(Some(&image), state.media()),
        record: image,
    }
}

/// GET /admin/image/
async fn list_images(State(state): State<AppState>) -> AppResult<Json<Vec<AdminRow<Image>>>> {
    let images = Image::list(state.db()).await?;
    Ok(Json(images.into_iter().map(|i| row(&state, i)).collect()))
}

/// Options for image pickers, each with a thumbnail URL.
///
/// GET /admin/image/choices/
async fn image_choices(State(state): State<AppState>) -> AppResult<Json<Vec<ImageChoice>>> {
    let images = Image::list(state.db()).await?;
    Ok(Json(
        images
            .iter()
            .map(|image| ImageChoice::new(image, state.media()))
            .collect(),
    ))
}

/// GET /admin/image/{id}/
async fn get_image(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AdminRow<Image>>> {
    let image = Image::find_by_id(state.db(), id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(row(&state, image)))
}

/// POST /admin/image/
async fn create_image(
    State(state): State<AppState>,
    Json(form): Json<ImageForm>,
) -> AppResult<(StatusCode, Json<AdminRow<Image>>)> {
    form.validate().map_err(AppError::Validation)?;
    let image = Image::create(state.db(), &form).await?;
    tracing::info!(id = image.id, file = %image.file, "created image");
    Ok((StatusCode::CREATED, Json(row(&state, image))))
}

/// PUT /admin/image/{id}/
async fn update_image(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(form): Json<ImageForm>,
) -> AppResult<Json<AdminRow<Image>>> {
    form.validate().map_err(AppError::Validation)?;
    let image = Image::update(state.db(), id, &form)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(row(&state, image)))
}

/// DELETE /admin/image/{id}/
async fn delete_image(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    if !Image::delete(state.db(), id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!(id, "deleted image");
    Ok(StatusCode::NO_CONTENT)
}
