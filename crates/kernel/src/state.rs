//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::Result;
use sqlx::PgPool;
use tracing::info;

use crate::config::Config;
use crate::db;
use crate::error::{AppError, AppResult};
use crate::models::language::Languages;
use crate::representation::MediaUrls;

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// PostgreSQL connection pool.
    db: PgPool,

    /// Site languages; the first is the default.
    languages: Languages,

    /// Public URL builder for image files.
    media: MediaUrls,

    /// Bearer token guarding `/admin`.
    admin_token: Option<String>,
}

impl AppState {
    /// Connect to the database, apply migrations and build the state.
    pub async fn new(config: &Config) -> Result<Self> {
        let pool = db::create_pool(config).await?;
        info!("connected to PostgreSQL");

        db::run_migrations(&pool).await?;
        info!("database migrations applied");

        Ok(Self::from_parts(pool, config))
    }

    /// Build state around an existing pool.
    pub fn from_parts(db: PgPool, config: &Config) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                db,
                languages: config.languages.clone(),
                media: MediaUrls::new(config.media_url.clone()),
                admin_token: config.admin_token.clone(),
            }),
        }
    }

    /// Get the database pool.
    pub fn db(&self) -> &PgPool {
        &self.inner.db
    }

    /// Get the configured languages.
    pub fn languages(&self) -> &Languages {
        &self.inner.languages
    }

    /// Get the media URL builder.
    pub fn media(&self) -> &MediaUrls {
        &self.inner.media
    }

    /// Get the admin bearer token, if one is configured.
    pub fn admin_token(&self) -> Option<&str> {
        self.inner.admin_token.as_deref()
    }

    /// Accept a language path segment only when it is configured.
    pub fn require_language(&self, lang: &str) -> AppResult<String> {
        if self.inner.languages.contains(lang) {
            Ok(lang.to_string())
        } else {
            Err(AppError::NotFound)
        }
    }

    /// Check if PostgreSQL is healthy.
    pub async fn postgres_healthy(&self) -> bool {
        db::check_health(&self.inner.db).await
    }
}
