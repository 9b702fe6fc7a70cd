//! Core admin routes: model index and drag-and-drop reordering.

use axum::extract::State;
use axum::routing::{MethodRouter, get, post};
use axum::{Json, Router};
use serde::Serialize;

use crate::admin::{AdminApp, app_list};
use crate::content::ordering::{self, SortableTable};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

use super::helpers::ReorderRequest;

/// Models whose admin lists can be reordered, by URL segment.
const SORTABLE_MODELS: &[&str] = &["page", "product", "category", "menuitem", "social"];

/// Admin index response.
#[derive(Debug, Serialize)]
struct IndexResponse {
    apps: Vec<AdminApp>,
}

/// Reorder response.
#[derive(Debug, Serialize)]
struct ReorderResponse {
    reordered: usize,
}

/// Create the core admin router.
///
/// Reorder routes are registered per model so they take precedence over the
/// `/admin/{model}/{id}/` detail routes.
pub fn router() -> Router<AppState> {
    let mut router = Router::new().route("/admin/", get(index));

    for model in SORTABLE_MODELS {
        if let Some(target) = SortableTable::from_model(model) {
            router = router.route(&format!("/admin/{model}/reorder/"), reorder_route(target));
        }
    }

    router
}

/// Grouped, ordered model index.
///
/// GET /admin/
async fn index() -> Json<IndexResponse> {
    Json(IndexResponse { apps: app_list() })
}

fn reorder_route(target: SortableTable) -> MethodRouter<AppState> {
    post(
        move |State(state): State<AppState>, Json(request): Json<ReorderRequest>| async move {
            reorder(&state, target, &request.ids).await
        },
    )
}

/// Assign display order 0..n following the submitted id sequence.
///
/// POST /admin/{model}/reorder/
async fn reorder(
    state: &AppState,
    target: SortableTable,
    ids: &[i64],
) -> AppResult<Json<ReorderResponse>> {
    ordering::validate_order(ids).map_err(AppError::Validation)?;

    if !ordering::reorder(state.db(), target, ids).await? {
        return Err(AppError::Validation(
            "one or more ids do not exist".to_string(),
        ));
    }

    Ok(Json(ReorderResponse {
        reordered: ids.len(),
    }))
}
