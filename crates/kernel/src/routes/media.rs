//! Public image endpoints.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::error::{AppError, AppResult};
use crate::models::Image;
use crate::representation::{self, ImageRepr};
use crate::state::AppState;

/// Create the image router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/images/", get(list_images))
        .route("/api/images/{id}/", get(image_detail))
}

/// GET /api/images/
async fn list_images(State(state): State<AppState>) -> AppResult<Json<Vec<ImageRepr>>> {
    let images = Image::list(state.db()).await?;
    Ok(Json(representation::images(&images, state.media())))
}

/// GET /api/images/{id}/
async fn image_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ImageRepr>> {
    let image = Image::find_by_id(state.db(), id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(ImageRepr::new(&image, state.media())))
}
