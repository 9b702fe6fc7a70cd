//! Home page model. At most one home page exists per language.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::content::relations::LinkTable;
use crate::content::resolve::{self, ResolveError};
use crate::content::sanitize_rich_text;
use crate::models::language::Languages;

const HOME_PAGE_COLUMNS: &str = "id, title, pageinfo, content, lang";

/// Home page record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct HomePage {
    pub id: i64,
    pub title: String,
    pub pageinfo: String,
    pub content: String,
    pub lang: String,
}

/// Admin form for a home page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HomePageForm {
    pub title: String,
    #[serde(default)]
    pub pageinfo: String,
    #[serde(default)]
    pub content: String,
    pub lang: Option<String>,
    #[serde(default)]
    pub images: Vec<i64>,
    #[serde(default)]
    pub products: Vec<i64>,
}

#[derive(Debug, Clone)]
pub struct NewHomePage {
    pub title: String,
    pub pageinfo: String,
    pub content: String,
    pub lang: String,
    pub images: Vec<i64>,
    pub products: Vec<i64>,
}

impl HomePageForm {
    pub fn resolve(&self, languages: &Languages) -> Result<NewHomePage, ResolveError> {
        Ok(NewHomePage {
            title: resolve::resolve_title(&self.title, resolve::MAX_TITLE_LEN)?,
            pageinfo: self.pageinfo.trim().to_string(),
            content: sanitize_rich_text(&self.content),
            lang: resolve::resolve_lang(languages, self.lang.as_deref())?,
            images: self.images.clone(),
            products: self.products.clone(),
        })
    }
}

impl HomePage {
    /// Find a home page by ID.
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>> {
        let home = sqlx::query_as::<_, Self>(&format!(
            "SELECT {HOME_PAGE_COLUMNS} FROM home_page WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch home page")?;

        Ok(home)
    }

    /// List home pages, optionally restricted to a language.
    pub async fn list(pool: &PgPool, lang: Option<&str>) -> Result<Vec<Self>> {
        let homes = sqlx::query_as::<_, Self>(&format!(
            "SELECT {HOME_PAGE_COLUMNS} FROM home_page \
             WHERE ($1::TEXT IS NULL OR lang = $1) ORDER BY id"
        ))
        .bind(lang)
        .fetch_all(pool)
        .await
        .context("failed to list home pages")?;

        Ok(homes)
    }

    /// Create a home page with its images and featured products.
    pub async fn create(pool: &PgPool, input: &NewHomePage) -> Result<Self> {
        let mut tx = pool.begin().await.context("failed to start transaction")?;

        let home = sqlx::query_as::<_, Self>(&format!(
            r#"
            INSERT INTO home_page (title, pageinfo, content, lang)
            VALUES ($1, $2, $3, $4)
            RETURNING {HOME_PAGE_COLUMNS}
            "#
        ))
        .bind(&input.title)
        .bind(&input.pageinfo)
        .bind(&input.content)
        .bind(&input.lang)
        .fetch_one(&mut *tx)
        .await
        .context("failed to create home page")?;

        LinkTable::HomePageImage.replace(&mut tx, home.id, &input.images).await?;
        LinkTable::HomePageProduct.replace(&mut tx, home.id, &input.products).await?;

        tx.commit().await.context("failed to commit home page")?;

        tracing::info!(id = home.id, lang = %home.lang, "created home page");
        Ok(home)
    }

    /// Update a home page and its relations.
    pub async fn update(pool: &PgPool, id: i64, input: &NewHomePage) -> Result<Option<Self>> {
        let mut tx = pool.begin().await.context("failed to start transaction")?;

        let home = sqlx::query_as::<_, Self>(&format!(
            r#"
            UPDATE home_page SET title = $1, pageinfo = $2, content = $3, lang = $4
            WHERE id = $5
            RETURNING {HOME_PAGE_COLUMNS}
            "#
        ))
        .bind(&input.title)
        .bind(&input.pageinfo)
        .bind(&input.content)
        .bind(&input.lang)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .context("failed to update home page")?;

        let Some(home) = home else {
            return Ok(None);
        };

        LinkTable::HomePageImage.replace(&mut tx, home.id, &input.images).await?;
        LinkTable::HomePageProduct.replace(&mut tx, home.id, &input.products).await?;

        tx.commit().await.context("failed to commit home page")?;
        Ok(Some(home))
    }

    /// Delete a home page.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM home_page WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .context("failed to delete home page")?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn resolves_default_language() {
        let languages: Languages = "en:English,tr:Turkish".parse().unwrap();
        let form = HomePageForm {
            title: "Welcome".to_string(),
            products: vec![3, 1],
            ..Default::default()
        };
        let home = form.resolve(&languages).unwrap();
        assert_eq!(home.lang, "en");
        assert_eq!(home.products, vec![3, 1]);
    }

    #[test]
    fn requires_title() {
        let languages: Languages = "en:English".parse().unwrap();
        let form = HomePageForm::default();
        assert_eq!(
            form.resolve(&languages).unwrap_err(),
            ResolveError::EmptyTitle
        );
    }
}
