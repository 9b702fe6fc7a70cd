//! Image asset model.
//!
//! Images are owned independently; pages, products, categories and home
//! pages reference them without ownership.

use std::collections::HashMap;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Width of the `file` column.
const MAX_FILE_LEN: usize = 500;

/// Width of the `alt_text` column.
const MAX_ALT_TEXT_LEN: usize = 255;

/// Image record. `file` is relative to the configured media URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Image {
    pub id: i64,
    pub file: String,
    pub alt_text: String,
}

/// Admin form for an image.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageForm {
    pub file: String,
    #[serde(default)]
    pub alt_text: String,
}

impl ImageForm {
    /// Check the file reference is a plain relative path.
    pub fn validate(&self) -> Result<(), String> {
        let file = self.file.trim();
        if file.is_empty() {
            return Err("file must not be empty".to_string());
        }
        if file.starts_with('/') || file.contains("://") {
            return Err("file must be relative to the media directory".to_string());
        }
        if file.split('/').any(|segment| segment == "..") {
            return Err("file must not contain '..' segments".to_string());
        }
        if file.chars().count() > MAX_FILE_LEN {
            return Err(format!(
                "file: ensure this value has at most {MAX_FILE_LEN} characters"
            ));
        }
        if self.alt_text.trim().chars().count() > MAX_ALT_TEXT_LEN {
            return Err(format!(
                "alt_text: ensure this value has at most {MAX_ALT_TEXT_LEN} characters"
            ));
        }
        Ok(())
    }
}

impl Image {
    /// Find an image by ID.
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>> {
        let image =
            sqlx::query_as::<_, Self>("SELECT id, file, alt_text FROM image WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await
                .context("failed to fetch image")?;

        Ok(image)
    }

    /// Load images by ID, keyed by ID.
    pub async fn find_by_ids(pool: &PgPool, ids: &[i64]) -> Result<HashMap<i64, Self>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let images = sqlx::query_as::<_, Self>(
            "SELECT id, file, alt_text FROM image WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(pool)
        .await
        .context("failed to fetch images")?;

        Ok(images.into_iter().map(|i| (i.id, i)).collect())
    }

    /// List all images, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>> {
        let images =
            sqlx::query_as::<_, Self>("SELECT id, file, alt_text FROM image ORDER BY id DESC")
                .fetch_all(pool)
                .await
                .context("failed to list images")?;

        Ok(images)
    }

    /// Create an image record.
    pub async fn create(pool: &PgPool, form: &ImageForm) -> Result<Self> {
        let image = sqlx::query_as::<_, Self>(
            "INSERT INTO image (file, alt_text) VALUES ($1, $2) RETURNING id, file, alt_text",
        )
        .bind(form.file.trim())
        .bind(form.alt_text.trim())
        .fetch_one(pool)
        .await
        .context("failed to create image")?;

        Ok(image)
    }

    /// Update an image record.
    pub async fn update(pool: &PgPool, id: i64, form: &ImageForm) -> Result<Option<Self>> {
        let image = sqlx::query_as::<_, Self>(
            "UPDATE image SET file = $1, alt_text = $2 WHERE id = $3 RETURNING id, file, alt_text",
        )
        .bind(form.file.trim())
        .bind(form.alt_text.trim())
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to update image")?;

        Ok(image)
    }

    /// Delete an image. References from content are cleared by the schema.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM image WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .context("failed to delete image")?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn form(file: &str) -> ImageForm {
        ImageForm {
            file: file.to_string(),
            alt_text: String::new(),
        }
    }

    #[test]
    fn relative_paths_are_accepted() {
        assert!(form("images/cover.jpg").validate().is_ok());
    }

    #[test]
    fn rejects_bad_paths() {
        assert!(form("  ").validate().is_err());
        assert!(form("/etc/passwd").validate().is_err());
        assert!(form("images/../../secret").validate().is_err());
        assert!(form("https://example.com/a.png").validate().is_err());
    }

    #[test]
    fn rejects_values_wider_than_column() {
        let long_file = format!("images/{}.jpg", "f".repeat(MAX_FILE_LEN));
        assert!(form(&long_file).validate().unwrap_err().starts_with("file:"));

        let mut wordy = form("images/cover.jpg");
        wordy.alt_text = "a".repeat(MAX_ALT_TEXT_LEN + 1);
        assert!(wordy.validate().unwrap_err().starts_with("alt_text:"));
    }
}
