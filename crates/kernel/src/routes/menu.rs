//! Public menu endpoints.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::error::AppResult;
use crate::menu::{MenuNode, MenuTree};
use crate::models::MenuItem;
use crate::state::AppState;

/// Create the menu router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/menuitems/", get(all_menus))
        .route("/api/{lang}/menuitems/", get(menu_in_language))
}

/// Top-level items of every language.
///
/// GET /api/menuitems/
async fn all_menus(State(state): State<AppState>) -> AppResult<Json<Vec<MenuNode>>> {
    menu(&state, None).await
}

/// GET /api/{lang}/menuitems/
async fn menu_in_language(
    State(state): State<AppState>,
    Path(lang): Path<String>,
) -> AppResult<Json<Vec<MenuNode>>> {
    let lang = state.require_language(&lang)?;
    menu(&state, Some(&lang)).await
}

async fn menu(state: &AppState, lang: Option<&str>) -> AppResult<Json<Vec<MenuNode>>> {
    let tree = MenuTree::build(MenuItem::tree_rows(state.db()).await?);
    Ok(Json(tree.top_level(lang)))
}
