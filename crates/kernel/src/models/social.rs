//! Social links singleton.
//!
//! Exactly one row exists, with id [`SOCIAL_ID`]. It is created on first
//! load, a second one can never be created, and it can never be deleted.
//! The schema enforces the same with a `CHECK (id = 1)` and a delete rule.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use thiserror::Error;
use url::Url;

/// The only valid Social id.
pub const SOCIAL_ID: i64 = 1;

/// Width of each link column.
const MAX_LINK_LEN: usize = 255;

const SOCIAL_COLUMNS: &str = "id, facebook, twitter, instagram, threads, youtube, sort_order";

/// Violations of the singleton lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SingletonViolation {
    #[error("There can be only one Social instance")]
    AlreadyExists,
    #[error("Social instance can't be deleted")]
    Delete,
}

/// Social links record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Social {
    pub id: i64,
    pub facebook: String,
    pub twitter: String,
    pub instagram: String,
    pub threads: String,
    pub youtube: String,
    #[serde(rename = "order")]
    pub sort_order: i32,
}

/// Admin form for the social links.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SocialForm {
    #[serde(default)]
    pub facebook: String,
    #[serde(default)]
    pub twitter: String,
    #[serde(default)]
    pub instagram: String,
    #[serde(default)]
    pub threads: String,
    #[serde(default)]
    pub youtube: String,
    #[serde(default)]
    pub order: i32,
}

impl SocialForm {
    /// Trim every link and check it is blank or an absolute http(s) URL.
    pub fn validate(&self) -> Result<SocialForm, String> {
        let check = |name: &str, value: &str| -> Result<String, String> {
            let value = value.trim();
            if value.is_empty() {
                return Ok(String::new());
            }
            if value.chars().count() > MAX_LINK_LEN {
                return Err(format!(
                    "{name}: ensure this value has at most {MAX_LINK_LEN} characters"
                ));
            }
            match Url::parse(value) {
                Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {
                    Ok(value.to_string())
                }
                _ => Err(format!("{name}: enter a valid URL")),
            }
        };

        if self.order < 0 {
            return Err("order must not be negative".to_string());
        }

        Ok(SocialForm {
            facebook: check("facebook", &self.facebook)?,
            twitter: check("twitter", &self.twitter)?,
            instagram: check("instagram", &self.instagram)?,
            threads: check("threads", &self.threads)?,
            youtube: check("youtube", &self.youtube)?,
            order: self.order,
        })
    }
}

impl Social {
    /// Load the singleton, creating it with empty links if absent.
    pub async fn load(pool: &PgPool) -> Result<Self> {
        sqlx::query("INSERT INTO social (id) VALUES ($1) ON CONFLICT (id) DO NOTHING")
            .bind(SOCIAL_ID)
            .execute(pool)
            .await
            .context("failed to ensure social row")?;

        let social = sqlx::query_as::<_, Self>(&format!(
            "SELECT {SOCIAL_COLUMNS} FROM social WHERE id = $1"
        ))
        .bind(SOCIAL_ID)
        .fetch_one(pool)
        .await
        .context("failed to load social")?;

        Ok(social)
    }

    /// List social rows (the singleton, once loaded).
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>> {
        let rows = sqlx::query_as::<_, Self>(&format!(
            "SELECT {SOCIAL_COLUMNS} FROM social ORDER BY sort_order, id"
        ))
        .fetch_all(pool)
        .await
        .context("failed to list social")?;

        Ok(rows)
    }

    /// Create the singleton. Returns `None` when it already exists.
    pub async fn create(pool: &PgPool, form: &SocialForm) -> Result<Option<Self>> {
        let social = sqlx::query_as::<_, Self>(&format!(
            r#"
            INSERT INTO social (id, facebook, twitter, instagram, threads, youtube, sort_order)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO NOTHING
            RETURNING {SOCIAL_COLUMNS}
            "#
        ))
        .bind(SOCIAL_ID)
        .bind(&form.facebook)
        .bind(&form.twitter)
        .bind(&form.instagram)
        .bind(&form.threads)
        .bind(&form.youtube)
        .bind(form.order)
        .fetch_optional(pool)
        .await
        .context("failed to create social")?;

        Ok(social)
    }

    /// Overwrite the singleton's links, creating it first if needed.
    pub async fn update(pool: &PgPool, form: &SocialForm) -> Result<Self> {
        let social = sqlx::query_as::<_, Self>(&format!(
            r#"
            INSERT INTO social (id, facebook, twitter, instagram, threads, youtube, sort_order)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE
            SET facebook = EXCLUDED.facebook, twitter = EXCLUDED.twitter,
                instagram = EXCLUDED.instagram, threads = EXCLUDED.threads,
                youtube = EXCLUDED.youtube, sort_order = EXCLUDED.sort_order
            RETURNING {SOCIAL_COLUMNS}
            "#
        ))
        .bind(SOCIAL_ID)
        .bind(&form.facebook)
        .bind(&form.twitter)
        .bind(&form.instagram)
        .bind(&form.threads)
        .bind(&form.youtube)
        .bind(form.order)
        .fetch_one(pool)
        .await
        .context("failed to update social")?;

        tracing::info!("updated social links");
        Ok(social)
    }

    /// Deleting the singleton is never allowed; this is the refusal.
    pub fn delete() -> SingletonViolation {
        SingletonViolation::Delete
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn accepts_blank_and_absolute_urls() {
        let form = SocialForm {
            facebook: " https://facebook.com/vitrine ".to_string(),
            youtube: "http://youtube.com/@vitrine".to_string(),
            ..Default::default()
        };
        let cleaned = form.validate().unwrap();
        assert_eq!(cleaned.facebook, "https://facebook.com/vitrine");
        assert_eq!(cleaned.twitter, "");
    }

    #[test]
    fn rejects_relative_and_non_http_urls() {
        for bad in ["facebook.com/vitrine", "/local/path", "ftp://example.com/x", "javascript:alert(1)"] {
            let form = SocialForm {
                instagram: bad.to_string(),
                ..Default::default()
            };
            let err = form.validate().unwrap_err();
            assert!(err.starts_with("instagram"), "{bad}: {err}");
        }
    }

    #[test]
    fn rejects_link_wider_than_column() {
        let form = SocialForm {
            facebook: format!("https://facebook.com/{}", "v".repeat(294)),
            ..Default::default()
        };
        assert_eq!(
            form.validate().unwrap_err(),
            "facebook: ensure this value has at most 255 characters"
        );
    }

    #[test]
    fn delete_is_always_refused() {
        assert_eq!(Social::delete(), SingletonViolation::Delete);
        assert_eq!(
            SingletonViolation::Delete.to_string(),
            "Social instance can't be deleted"
        );
        assert_eq!(
            SingletonViolation::AlreadyExists.to_string(),
            "There can be only one Social instance"
        );
    }
}
