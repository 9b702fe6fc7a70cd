//! Public home page endpoints.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::error::AppResult;
use crate::models::HomePage;
use crate::representation::{self, HomePageRepr};
use crate::state::AppState;

/// Create the home page router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/homepage/", get(all_home_pages))
        .route("/api/{lang}/homepage/", get(home_page_in_language))
}

/// GET /api/homepage/
async fn all_home_pages(State(state): State<AppState>) -> AppResult<Json<Vec<HomePageRepr>>> {
    home_pages(&state, None).await
}

/// A list holding at most the one home page of the language.
///
/// GET /api/{lang}/homepage/
async fn home_page_in_language(
    State(state): State<AppState>,
    Path(lang): Path<String>,
) -> AppResult<Json<Vec<HomePageRepr>>> {
    let lang = state.require_language(&lang)?;
    home_pages(&state, Some(&lang)).await
}

async fn home_pages(state: &AppState, lang: Option<&str>) -> AppResult<Json<Vec<HomePageRepr>>> {
    let homes = HomePage::list(state.db(), lang).await?;
    Ok(Json(
        representation::home_pages(state.db(), state.media(), homes).await?,
    ))
}
