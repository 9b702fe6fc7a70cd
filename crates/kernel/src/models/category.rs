//! Category and tag models.
//!
//! Categories are language-scoped and carry a translation link (`langslug`)
//! pairing them with their counterparts in other languages. Tags are
//! language-neutral labels.

use std::collections::HashMap;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::content::resolve::{self, ResolveError, SlugFields};
use crate::content::sanitize_rich_text;
use crate::models::language::Languages;

const CATEGORY_COLUMNS: &str =
    "id, title, slug, langslug, categoryinfo, content, image_id, lang, sort_order";

/// A category.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub langslug: String,
    pub categoryinfo: String,
    pub content: String,
    pub image_id: Option<i64>,
    pub lang: String,
    #[serde(rename = "order")]
    pub sort_order: i32,
}

/// A tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    pub id: i64,
    pub title: String,
    pub slug: String,
}

/// Admin form for a category.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryForm {
    pub title: String,
    pub slug: Option<String>,
    pub langslug: Option<String>,
    #[serde(default)]
    pub categoryinfo: String,
    #[serde(default)]
    pub content: String,
    pub image_id: Option<i64>,
    pub lang: Option<String>,
}

/// A category form with derived fields filled in.
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub fields: SlugFields,
    pub categoryinfo: String,
    pub content: String,
    pub image_id: Option<i64>,
}

/// Admin form for a tag.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagForm {
    pub title: String,
    pub slug: Option<String>,
}

/// A tag form with its slug derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTag {
    pub title: String,
    pub slug: String,
}

impl CategoryForm {
    /// Derive slug, translation link and language; clean the body.
    pub fn resolve(&self, languages: &Languages) -> Result<NewCategory, ResolveError> {
        let fields = resolve::resolve_slugged(
            languages,
            &self.title,
            self.slug.as_deref(),
            self.langslug.as_deref(),
            self.lang.as_deref(),
        )?;

        Ok(NewCategory {
            fields,
            categoryinfo: self.categoryinfo.trim().to_string(),
            content: sanitize_rich_text(&self.content),
            image_id: self.image_id,
        })
    }
}

impl TagForm {
    /// Derive the slug when blank.
    pub fn resolve(&self) -> Result<NewTag, ResolveError> {
        let title = resolve::resolve_title(&self.title, resolve::MAX_TITLE_LEN)?;
        let slug = resolve::resolve_slug(self.slug.as_deref(), &title)?;
        Ok(NewTag { title, slug })
    }
}

impl Category {
    /// Find a category by ID.
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>> {
        let category = sqlx::query_as::<_, Self>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM category WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch category")?;

        Ok(category)
    }

    /// Find a category by slug, optionally restricted to a language.
    pub async fn find_by_slug(pool: &PgPool, slug: &str, lang: Option<&str>) -> Result<Option<Self>> {
        let category = sqlx::query_as::<_, Self>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM category WHERE slug = $1 AND ($2::TEXT IS NULL OR lang = $2)"
        ))
        .bind(slug)
        .bind(lang)
        .fetch_optional(pool)
        .await
        .context("failed to fetch category by slug")?;

        Ok(category)
    }

    /// Load categories by ID, keyed by ID.
    pub async fn find_by_ids(pool: &PgPool, ids: &[i64]) -> Result<HashMap<i64, Self>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let categories = sqlx::query_as::<_, Self>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM category WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(pool)
        .await
        .context("failed to fetch categories")?;

        Ok(categories.into_iter().map(|c| (c.id, c)).collect())
    }

    /// List categories, optionally restricted to a language.
    pub async fn list(pool: &PgPool, lang: Option<&str>) -> Result<Vec<Self>> {
        let categories = sqlx::query_as::<_, Self>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM category \
             WHERE ($1::TEXT IS NULL OR lang = $1) ORDER BY sort_order, id"
        ))
        .bind(lang)
        .fetch_all(pool)
        .await
        .context("failed to list categories")?;

        Ok(categories)
    }

    /// Create a category, appended at the end of the display order.
    pub async fn create(pool: &PgPool, input: &NewCategory) -> Result<Self> {
        let category = sqlx::query_as::<_, Self>(&format!(
            r#"
            INSERT INTO category (title, slug, langslug, categoryinfo, content, image_id, lang, sort_order)
            VALUES ($1, $2, $3, $4, $5, $6, $7, (SELECT COALESCE(MAX(sort_order) + 1, 0) FROM category))
            RETURNING {CATEGORY_COLUMNS}
            "#
        ))
        .bind(&input.fields.title)
        .bind(&input.fields.slug)
        .bind(&input.fields.langslug)
        .bind(&input.categoryinfo)
        .bind(&input.content)
        .bind(input.image_id)
        .bind(&input.fields.lang)
        .fetch_one(pool)
        .await
        .context("failed to create category")?;

        tracing::info!(id = category.id, slug = %category.slug, "created category");
        Ok(category)
    }

    /// Update a category.
    pub async fn update(pool: &PgPool, id: i64, input: &NewCategory) -> Result<Option<Self>> {
        let category = sqlx::query_as::<_, Self>(&format!(
            r#"
            UPDATE category
            SET title = $1, slug = $2, langslug = $3, categoryinfo = $4, content = $5,
                image_id = $6, lang = $7
            WHERE id = $8
            RETURNING {CATEGORY_COLUMNS}
            "#
        ))
        .bind(&input.fields.title)
        .bind(&input.fields.slug)
        .bind(&input.fields.langslug)
        .bind(&input.categoryinfo)
        .bind(&input.content)
        .bind(input.image_id)
        .bind(&input.fields.lang)
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to update category")?;

        Ok(category)
    }

    /// Delete a category.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM category WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .context("failed to delete category")?;

        Ok(result.rows_affected() > 0)
    }
}

impl Tag {
    /// Find a tag by ID.
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>> {
        let tag = sqlx::query_as::<_, Self>("SELECT id, title, slug FROM tag WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .context("failed to fetch tag")?;

        Ok(tag)
    }

    /// Find a tag by slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Self>> {
        let tag = sqlx::query_as::<_, Self>("SELECT id, title, slug FROM tag WHERE slug = $1")
            .bind(slug)
            .fetch_optional(pool)
            .await
            .context("failed to fetch tag by slug")?;

        Ok(tag)
    }

    /// Load tags by ID, keyed by ID.
    pub async fn find_by_ids(pool: &PgPool, ids: &[i64]) -> Result<HashMap<i64, Self>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let tags = sqlx::query_as::<_, Self>("SELECT id, title, slug FROM tag WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(pool)
            .await
            .context("failed to fetch tags")?;

        Ok(tags.into_iter().map(|t| (t.id, t)).collect())
    }

    /// List all tags alphabetically.
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>> {
        let tags = sqlx::query_as::<_, Self>("SELECT id, title, slug FROM tag ORDER BY title, id")
            .fetch_all(pool)
            .await
            .context("failed to list tags")?;

        Ok(tags)
    }

    /// Create a tag.
    pub async fn create(pool: &PgPool, input: &NewTag) -> Result<Self> {
        let tag = sqlx::query_as::<_, Self>(
            "INSERT INTO tag (title, slug) VALUES ($1, $2) RETURNING id, title, slug",
        )
        .bind(&input.title)
        .bind(&input.slug)
        .fetch_one(pool)
        .await
        .context("failed to create tag")?;

        tracing::info!(id = tag.id, slug = %tag.slug, "created tag");
        Ok(tag)
    }

    /// Update a tag.
    pub async fn update(pool: &PgPool, id: i64, input: &NewTag) -> Result<Option<Self>> {
        let tag = sqlx::query_as::<_, Self>(
            "UPDATE tag SET title = $1, slug = $2 WHERE id = $3 RETURNING id, title, slug",
        )
        .bind(&input.title)
        .bind(&input.slug)
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to update tag")?;

        Ok(tag)
    }

    /// Delete a tag.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tag WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .context("failed to delete tag")?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn languages() -> Languages {
        "en:English,tr:Turkish".parse().unwrap()
    }

    #[test]
    fn category_form_derives_identity() {
        let form = CategoryForm {
            title: "Running Shoes".to_string(),
            lang: Some("en".to_string()),
            content: "<p>Fast</p><script>x()</script>".to_string(),
            ..Default::default()
        };
        let resolved = form.resolve(&languages()).unwrap();
        assert_eq!(resolved.fields.slug, "running-shoes");
        assert_eq!(resolved.fields.langslug, "en-running-shoes");
        assert_eq!(resolved.content, "<p>Fast</p>");
    }

    #[test]
    fn category_form_defaults_language() {
        let form = CategoryForm {
            title: "Koşu".to_string(),
            ..Default::default()
        };
        let resolved = form.resolve(&languages()).unwrap();
        assert_eq!(resolved.fields.lang, "en");
        assert_eq!(resolved.fields.slug, "kosu");
    }

    #[test]
    fn tag_form_keeps_given_slug() {
        let form = TagForm {
            title: "On Sale".to_string(),
            slug: Some("sale".to_string()),
        };
        assert_eq!(
            form.resolve().unwrap(),
            NewTag {
                title: "On Sale".to_string(),
                slug: "sale".to_string()
            }
        );
    }

    #[test]
    fn tag_form_requires_title() {
        let form = TagForm::default();
        assert_eq!(form.resolve(), Err(ResolveError::EmptyTitle));
    }
}
