//! Page model.

use std::collections::HashMap;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::content::listing::{ListingFilter, ListingTable};
use crate::content::relations::LinkTable;
use crate::content::resolve::{self, ResolveError, SlugFields};
use crate::content::sanitize_rich_text;
use crate::menu::link::page_detail_path;
use crate::models::language::Languages;
use crate::models::menu_item::MenuItem;

const PAGE_COLUMNS: &str = "id, title, slug, langslug, pageinfo, content, image_id, lang, sort_order";

/// Page record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Page {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub langslug: String,
    pub pageinfo: String,
    pub content: String,
    pub image_id: Option<i64>,
    pub lang: String,
    #[serde(rename = "order")]
    pub sort_order: i32,
}

/// Admin form for a page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageForm {
    pub title: String,
    pub slug: Option<String>,
    pub langslug: Option<String>,
    #[serde(default)]
    pub pageinfo: String,
    #[serde(default)]
    pub content: String,
    pub image_id: Option<i64>,
    pub lang: Option<String>,
    #[serde(default)]
    pub images: Vec<i64>,
    #[serde(default)]
    pub categories: Vec<i64>,
    #[serde(default)]
    pub tags: Vec<i64>,
}

/// A page form with derived fields filled in.
#[derive(Debug, Clone)]
pub struct NewPage {
    pub fields: SlugFields,
    pub pageinfo: String,
    pub content: String,
    pub image_id: Option<i64>,
    pub images: Vec<i64>,
    pub categories: Vec<i64>,
    pub tags: Vec<i64>,
}

impl PageForm {
    /// Derive slug, translation link and language; clean the body.
    pub fn resolve(&self, languages: &Languages) -> Result<NewPage, ResolveError> {
        let fields = resolve::resolve_slugged(
            languages,
            &self.title,
            self.slug.as_deref(),
            self.langslug.as_deref(),
            self.lang.as_deref(),
        )?;

        Ok(NewPage {
            fields,
            pageinfo: self.pageinfo.trim().to_string(),
            content: sanitize_rich_text(&self.content),
            image_id: self.image_id,
            images: self.images.clone(),
            categories: self.categories.clone(),
            tags: self.tags.clone(),
        })
    }
}

impl Page {
    /// Public path of this page, as stored in bound menu links.
    pub fn detail_path(&self) -> String {
        page_detail_path(&self.lang, &self.slug)
    }

    /// Find a page by ID.
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>> {
        let page = sqlx::query_as::<_, Self>(&format!(
            "SELECT {PAGE_COLUMNS} FROM page WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch page")?;

        Ok(page)
    }

    /// List pages matching a listing filter.
    pub async fn list(pool: &PgPool, filter: &ListingFilter) -> Result<Vec<Self>> {
        let sql = filter.build(ListingTable::Page);
        let pages = sqlx::query_as::<_, Self>(&sql)
            .fetch_all(pool)
            .await
            .context("failed to list pages")?;

        Ok(pages)
    }

    /// Find the first page matching a listing filter.
    pub async fn find_one(pool: &PgPool, filter: &ListingFilter) -> Result<Option<Self>> {
        let sql = filter.build(ListingTable::Page);
        let page = sqlx::query_as::<_, Self>(&sql)
            .fetch_optional(pool)
            .await
            .context("failed to fetch page")?;

        Ok(page)
    }

    /// Load pages by ID, keyed by ID.
    pub async fn find_by_ids(pool: &PgPool, ids: &[i64]) -> Result<HashMap<i64, Self>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let pages = sqlx::query_as::<_, Self>(&format!(
            "SELECT {PAGE_COLUMNS} FROM page WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(pool)
        .await
        .context("failed to fetch pages")?;

        Ok(pages.into_iter().map(|p| (p.id, p)).collect())
    }

    /// Create a page with its relations, appended at the end of the display order.
    pub async fn create(pool: &PgPool, input: &NewPage) -> Result<Self> {
        let mut tx = pool.begin().await.context("failed to start transaction")?;

        let page = sqlx::query_as::<_, Self>(&format!(
            r#"
            INSERT INTO page (title, slug, langslug, pageinfo, content, image_id, lang, sort_order)
            VALUES ($1, $2, $3, $4, $5, $6, $7, (SELECT COALESCE(MAX(sort_order) + 1, 0) FROM page))
            RETURNING {PAGE_COLUMNS}
            "#
        ))
        .bind(&input.fields.title)
        .bind(&input.fields.slug)
        .bind(&input.fields.langslug)
        .bind(&input.pageinfo)
        .bind(&input.content)
        .bind(input.image_id)
        .bind(&input.fields.lang)
        .fetch_one(&mut *tx)
        .await
        .context("failed to create page")?;

        LinkTable::PageImage.replace(&mut tx, page.id, &input.images).await?;
        LinkTable::PageCategory.replace(&mut tx, page.id, &input.categories).await?;
        LinkTable::PageTag.replace(&mut tx, page.id, &input.tags).await?;

        tx.commit().await.context("failed to commit page")?;

        tracing::info!(id = page.id, slug = %page.slug, lang = %page.lang, "created page");
        Ok(page)
    }

    /// Update a page and its relations.
    ///
    /// Menu items bound to the page have their link recomputed in the same
    /// transaction, since slug and language may have changed.
    pub async fn update(pool: &PgPool, id: i64, input: &NewPage) -> Result<Option<Self>> {
        let mut tx = pool.begin().await.context("failed to start transaction")?;

        let page = sqlx::query_as::<_, Self>(&format!(
            r#"
            UPDATE page
            SET title = $1, slug = $2, langslug = $3, pageinfo = $4, content = $5,
                image_id = $6, lang = $7
            WHERE id = $8
            RETURNING {PAGE_COLUMNS}
            "#
        ))
        .bind(&input.fields.title)
        .bind(&input.fields.slug)
        .bind(&input.fields.langslug)
        .bind(&input.pageinfo)
        .bind(&input.content)
        .bind(input.image_id)
        .bind(&input.fields.lang)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .context("failed to update page")?;

        let Some(page) = page else {
            return Ok(None);
        };

        LinkTable::PageImage.replace(&mut tx, page.id, &input.images).await?;
        LinkTable::PageCategory.replace(&mut tx, page.id, &input.categories).await?;
        LinkTable::PageTag.replace(&mut tx, page.id, &input.tags).await?;
        let relinked = MenuItem::relink_page(&mut tx, page.id, &page.detail_path()).await?;

        tx.commit().await.context("failed to commit page")?;

        tracing::info!(id = page.id, slug = %page.slug, relinked, "updated page");
        Ok(Some(page))
    }

    /// Delete a page. Bound menu items keep their last link.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM page WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .context("failed to delete page")?;

        Ok(result.rows_affected() > 0)
    }
}
