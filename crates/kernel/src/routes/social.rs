//! Public social links endpoint.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::error::AppResult;
use crate::models::Social;
use crate::representation::SocialRepr;
use crate::state::AppState;

/// Create the social router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/social/", get(social))
}

/// The social links singleton, created on first access.
///
/// GET /api/social/
async fn social(State(state): State<AppState>) -> AppResult<Json<SocialRepr>> {
    let social = Social::load(state.db()).await?;
    Ok(Json(SocialRepr::from(social)))
}
