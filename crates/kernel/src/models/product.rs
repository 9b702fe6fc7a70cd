//! Product model.

use std::collections::HashMap;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::content::listing::{ListingFilter, ListingTable};
use crate::content::relations::LinkTable;
use crate::content::resolve::{self, ResolveError, SlugFields};
use crate::content::sanitize_rich_text;
use crate::models::language::Languages;

/// Width of the `shoplink` column.
const MAX_SHOPLINK_LEN: usize = 255;

const PRODUCT_COLUMNS: &str = "id, title, slug, langslug, pageinfo, content, shoplink, image_id, \
                               date_posted, lang, sort_order";

/// Product record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub langslug: String,
    pub pageinfo: String,
    pub content: String,
    pub shoplink: String,
    pub image_id: Option<i64>,
    pub date_posted: DateTime<Utc>,
    pub lang: String,
    #[serde(rename = "order")]
    pub sort_order: i32,
}

/// Admin form for a product.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductForm {
    pub title: String,
    pub slug: Option<String>,
    pub langslug: Option<String>,
    #[serde(default)]
    pub pageinfo: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub shoplink: String,
    pub image_id: Option<i64>,
    pub lang: Option<String>,
    #[serde(default)]
    pub images: Vec<i64>,
    #[serde(default)]
    pub categories: Vec<i64>,
    #[serde(default)]
    pub tags: Vec<i64>,
}

/// A product form with derived fields filled in.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub fields: SlugFields,
    pub pageinfo: String,
    pub content: String,
    pub shoplink: String,
    pub image_id: Option<i64>,
    pub images: Vec<i64>,
    pub categories: Vec<i64>,
    pub tags: Vec<i64>,
}

impl ProductForm {
    /// Derive slug, translation link and language; clean the body.
    pub fn resolve(&self, languages: &Languages) -> Result<NewProduct, ResolveError> {
        let fields = resolve::resolve_slugged(
            languages,
            &self.title,
            self.slug.as_deref(),
            self.langslug.as_deref(),
            self.lang.as_deref(),
        )?;
        let shoplink = self.shoplink.trim().to_string();
        resolve::check_length("shoplink", &shoplink, MAX_SHOPLINK_LEN)?;

        Ok(NewProduct {
            fields,
            pageinfo: self.pageinfo.trim().to_string(),
            content: sanitize_rich_text(&self.content),
            shoplink,
            image_id: self.image_id,
            images: self.images.clone(),
            categories: self.categories.clone(),
            tags: self.tags.clone(),
        })
    }
}

impl Product {
    /// Find a product by ID.
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>> {
        let product = sqlx::query_as::<_, Self>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch product")?;

        Ok(product)
    }

    /// List products matching a listing filter.
    pub async fn list(pool: &PgPool, filter: &ListingFilter) -> Result<Vec<Self>> {
        let sql = filter.build(ListingTable::Product);
        let products = sqlx::query_as::<_, Self>(&sql)
            .fetch_all(pool)
            .await
            .context("failed to list products")?;

        Ok(products)
    }

    /// Find the first product matching a listing filter.
    pub async fn find_one(pool: &PgPool, filter: &ListingFilter) -> Result<Option<Self>> {
        let sql = filter.build(ListingTable::Product);
        let product = sqlx::query_as::<_, Self>(&sql)
            .fetch_optional(pool)
            .await
            .context("failed to fetch product")?;

        Ok(product)
    }

    /// Load products by ID, keyed by ID.
    pub async fn find_by_ids(pool: &PgPool, ids: &[i64]) -> Result<HashMap<i64, Self>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let products = sqlx::query_as::<_, Self>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(pool)
        .await
        .context("failed to fetch products")?;

        Ok(products.into_iter().map(|p| (p.id, p)).collect())
    }

    /// Create a product with its relations, appended at the end of the display order.
    pub async fn create(pool: &PgPool, input: &NewProduct) -> Result<Self> {
        let mut tx = pool.begin().await.context("failed to start transaction")?;

        let product = sqlx::query_as::<_, Self>(&format!(
            r#"
            INSERT INTO product (title, slug, langslug, pageinfo, content, shoplink, image_id, lang, sort_order)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, (SELECT COALESCE(MAX(sort_order) + 1, 0) FROM product))
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(&input.fields.title)
        .bind(&input.fields.slug)
        .bind(&input.fields.langslug)
        .bind(&input.pageinfo)
        .bind(&input.content)
        .bind(&input.shoplink)
        .bind(input.image_id)
        .bind(&input.fields.lang)
        .fetch_one(&mut *tx)
        .await
        .context("failed to create product")?;

        LinkTable::ProductImage.replace(&mut tx, product.id, &input.images).await?;
        LinkTable::ProductCategory.replace(&mut tx, product.id, &input.categories).await?;
        LinkTable::ProductTag.replace(&mut tx, product.id, &input.tags).await?;

        tx.commit().await.context("failed to commit product")?;

        tracing::info!(id = product.id, slug = %product.slug, lang = %product.lang, "created product");
        Ok(product)
    }

    /// Update a product and its relations. `date_posted` never changes.
    pub async fn update(pool: &PgPool, id: i64, input: &NewProduct) -> Result<Option<Self>> {
        let mut tx = pool.begin().await.context("failed to start transaction")?;

        let product = sqlx::query_as::<_, Self>(&format!(
            r#"
            UPDATE product
            SET title = $1, slug = $2, langslug = $3, pageinfo = $4, content = $5,
                shoplink = $6, image_id = $7, lang = $8
            WHERE id = $9
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(&input.fields.title)
        .bind(&input.fields.slug)
        .bind(&input.fields.langslug)
        .bind(&input.pageinfo)
        .bind(&input.content)
        .bind(&input.shoplink)
        .bind(input.image_id)
        .bind(&input.fields.lang)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .context("failed to update product")?;

        let Some(product) = product else {
            return Ok(None);
        };

        LinkTable::ProductImage.replace(&mut tx, product.id, &input.images).await?;
        LinkTable::ProductCategory.replace(&mut tx, product.id, &input.categories).await?;
        LinkTable::ProductTag.replace(&mut tx, product.id, &input.tags).await?;

        tx.commit().await.context("failed to commit product")?;

        tracing::info!(id = product.id, slug = %product.slug, "updated product");
        Ok(Some(product))
    }

    /// Delete a product.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM product WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .context("failed to delete product")?;

        Ok(result.rows_affected() > 0)
    }
}
