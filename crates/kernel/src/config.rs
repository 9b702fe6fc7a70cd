//! Configuration loaded from environment variables.

use std::env;

use anyhow::{Context, Result};

use crate::models::language::Languages;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// PostgreSQL connection URL.
    pub database_url: String,

    /// Maximum database connections in pool (default: 10).
    pub database_max_connections: u32,

    /// URL prefix for stored image files (default: /media/).
    pub media_url: String,

    /// Site languages, first entry is the default (default: "en:English,tr:Turkish").
    pub languages: Languages,

    /// CORS allowed origins (comma-separated, default: "*").
    pub cors_allowed_origins: Vec<String>,

    /// Bearer token required by the admin endpoints. When None, admin is open.
    pub admin_token: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let database_url =
            env::var("DATABASE_URL").context("DATABASE_URL environment variable is required")?;

        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .context("DATABASE_MAX_CONNECTIONS must be a valid u32")?;

        let media_url = normalize_media_url(
            &env::var("MEDIA_URL").unwrap_or_else(|_| "/media/".to_string()),
        );

        let languages = env::var("LANGUAGES")
            .unwrap_or_else(|_| "en:English,tr:Turkish".to_string())
            .parse::<Languages>()
            .context("LANGUAGES must be a comma-separated list of code:label pairs")?;

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
            .unwrap_or_else(|_| vec!["*".to_string()]);

        let admin_token = env::var("ADMIN_TOKEN")
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        Ok(Self {
            port,
            database_url,
            database_max_connections,
            media_url,
            languages,
            cors_allowed_origins,
            admin_token,
        })
    }
}

/// Ensure the media prefix ends with exactly one slash.
fn normalize_media_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    format!("{trimmed}/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_url_gets_trailing_slash() {
        assert_eq!(normalize_media_url("/media"), "/media/");
        assert_eq!(normalize_media_url("/media/"), "/media/");
        assert_eq!(
            normalize_media_url("https://cdn.example.com/m//"),
            "https://cdn.example.com/m/"
        );
    }

    #[test]
    fn empty_media_url_is_root() {
        assert_eq!(normalize_media_url(""), "/");
    }
}
