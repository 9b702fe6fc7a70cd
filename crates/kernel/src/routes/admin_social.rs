//! Admin routes for the social links singleton.

use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use crate::error::{AppError, AppResult};
use crate::models::{SOCIAL_ID, SingletonViolation, Social, SocialForm};
use crate::state::AppState;

/// Change form of the singleton.
const SOCIAL_ADMIN_URL: &str = "/admin/social/1/";

/// Create the social admin router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/social/", get(list_social).post(create_social))
        .route(
            "/admin/social/{id}/",
            get(get_social).put(update_social).delete(delete_social),
        )
}

/// Any id other than the singleton's is sent to the singleton's form.
fn is_singleton(id: &str) -> bool {
    id.parse::<i64>() == Ok(SOCIAL_ID)
}

fn redirect_to_singleton() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, SOCIAL_ADMIN_URL)]).into_response()
}

/// The singleton, loaded (and created if needed) on access.
///
/// GET /admin/social/
async fn list_social(State(state): State<AppState>) -> AppResult<Json<Vec<Social>>> {
    Social::load(state.db()).await?;
    Ok(Json(Social::list(state.db()).await?))
}

/// Fails once the singleton exists, which is always after a load.
///
/// POST /admin/social/
async fn create_social(
    State(state): State<AppState>,
    Json(form): Json<SocialForm>,
) -> AppResult<(StatusCode, Json<Social>)> {
    let form = form.validate().map_err(AppError::Validation)?;
    match Social::create(state.db(), &form).await? {
        Some(social) => Ok((StatusCode::CREATED, Json(social))),
        None => {
            tracing::warn!("rejected creation of a second social instance");
            Err(AppError::Validation(
                SingletonViolation::AlreadyExists.to_string(),
            ))
        }
    }
}

/// GET /admin/social/{id}/
async fn get_social(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    if !is_singleton(&id) {
        return redirect_to_singleton();
    }
    match Social::load(state.db()).await {
        Ok(social) => Json(social).into_response(),
        Err(e) => AppError::from(e).into_response(),
    }
}

/// PUT /admin/social/{id}/
async fn update_social(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(form): Json<SocialForm>,
) -> Response {
    if !is_singleton(&id) {
        return redirect_to_singleton();
    }
    let form = match form.validate() {
        Ok(form) => form,
        Err(message) => return AppError::Validation(message).into_response(),
    };
    match Social::update(state.db(), &form).await {
        Ok(social) => Json(social).into_response(),
        Err(e) => AppError::from(e).into_response(),
    }
}

/// Deletion is refused for every id.
///
/// DELETE /admin/social/{id}/
async fn delete_social(Path(id): Path<String>) -> AppError {
    tracing::warn!(id = %id, "rejected deletion of the social instance");
    AppError::Validation(Social::delete().to_string())
}
