//! HTTP route handlers and router assembly.

pub mod admin;
pub mod admin_content;
pub mod admin_media;
pub mod admin_menu;
pub mod admin_social;
pub mod admin_taxonomy;
pub mod category;
pub mod health;
pub mod helpers;
pub mod home;
pub mod media;
pub mod menu;
pub mod page;
pub mod product;
pub mod social;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::Config;
use crate::middleware::require_admin_token;
use crate::state::AppState;

/// Build the full application router.
///
/// Admin routes sit behind the admin token check; the public API and the
/// health check do not.
pub fn app(state: AppState) -> Router {
    let admin = Router::new()
        .merge(admin::router())
        .merge(admin_content::router())
        .merge(admin_taxonomy::router())
        .merge(admin_media::router())
        .merge(admin_menu::router())
        .merge(admin_social::router())
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_admin_token,
        ));

    Router::new()
        .merge(health::router())
        .merge(home::router())
        .merge(menu::router())
        .merge(page::router())
        .merge(product::router())
        .merge(category::router())
        .merge(media::router())
        .merge(social::router())
        .merge(admin)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Build the CORS layer from configuration. `*` allows any origin.
pub fn cors_layer(config: &Config) -> CorsLayer {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let headers = [header::CONTENT_TYPE, header::AUTHORIZATION];

    if config.cors_allowed_origins.len() == 1 && config.cors_allowed_origins[0] == "*" {
        CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods(methods)
            .allow_headers(headers)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_allowed_origins
            .iter()
            .filter_map(|o| match o.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(_) => {
                    warn!(origin = %o, "ignoring unparseable CORS origin");
                    None
                }
            })
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(headers)
    }
}
