//! Menu item model.
//!
//! Items form a forest through `parent_id`. An item bound to a page takes
//! its link from that page on every save.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};

use crate::content::resolve::{self, ResolveError};
use crate::menu::MenuRow;
use crate::models::language::Languages;
use crate::models::page::Page;

/// Width of the `title` column.
const MAX_MENU_TITLE_LEN: usize = 200;

/// Width of the `link` column.
const MAX_LINK_LEN: usize = 500;

const MENU_ITEM_COLUMNS: &str = "id, title, link, parent_id, page_id, newtab, sort_order, lang";

/// Menu item record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MenuItem {
    pub id: i64,
    pub title: String,
    pub link: Option<String>,
    pub parent_id: Option<i64>,
    pub page_id: Option<i64>,
    pub newtab: bool,
    #[serde(rename = "order")]
    pub sort_order: i32,
    pub lang: String,
}

/// Admin form for a menu item.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MenuItemForm {
    pub title: String,
    pub link: Option<String>,
    pub parent_id: Option<i64>,
    pub page_id: Option<i64>,
    #[serde(default)]
    pub newtab: bool,
    pub lang: Option<String>,
}

/// A menu item form with language resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMenuItem {
    pub title: String,
    pub link: Option<String>,
    pub parent_id: Option<i64>,
    pub page_id: Option<i64>,
    pub newtab: bool,
    pub lang: String,
}

impl MenuItemForm {
    /// Validate the title and resolve the language. A blank link is stored as null.
    pub fn resolve(&self, languages: &Languages) -> Result<NewMenuItem, ResolveError> {
        let title = resolve::resolve_title(&self.title, MAX_MENU_TITLE_LEN)?;
        let lang = resolve::resolve_lang(languages, self.lang.as_deref())?;
        let link = self
            .link
            .as_deref()
            .map(str::trim)
            .filter(|link| !link.is_empty())
            .map(str::to_string);
        if let Some(link) = &link {
            resolve::check_length("link", link, MAX_LINK_LEN)?;
        }

        Ok(NewMenuItem {
            title,
            link,
            parent_id: self.parent_id,
            page_id: self.page_id,
            newtab: self.newtab,
            lang,
        })
    }
}

impl NewMenuItem {
    /// Point the link at the bound page, replacing any manual link.
    pub fn bind_page(&mut self, page: &Page) {
        self.page_id = Some(page.id);
        self.link = Some(page.detail_path());
    }
}

impl MenuItem {
    /// Find a menu item by ID.
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>> {
        let item = sqlx::query_as::<_, Self>(&format!(
            "SELECT {MENU_ITEM_COLUMNS} FROM menu_item WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch menu item")?;

        Ok(item)
    }

    /// List menu items in display order, optionally restricted to a language.
    pub async fn list(pool: &PgPool, lang: Option<&str>) -> Result<Vec<Self>> {
        let items = sqlx::query_as::<_, Self>(&format!(
            "SELECT {MENU_ITEM_COLUMNS} FROM menu_item \
             WHERE ($1::TEXT IS NULL OR lang = $1) ORDER BY sort_order, id"
        ))
        .bind(lang)
        .fetch_all(pool)
        .await
        .context("failed to list menu items")?;

        Ok(items)
    }

    /// Load every menu item with its bound page's slug, for tree assembly.
    pub async fn tree_rows(pool: &PgPool) -> Result<Vec<MenuRow>> {
        let rows = sqlx::query_as::<_, MenuRow>(
            r#"
            SELECT m.id, m.title, m.link, m.parent_id, p.slug AS page_slug,
                   m.newtab, m.sort_order, m.lang
            FROM menu_item m
            LEFT JOIN page p ON p.id = m.page_id
            ORDER BY m.sort_order, m.id
            "#,
        )
        .fetch_all(pool)
        .await
        .context("failed to load menu tree")?;

        Ok(rows)
    }

    /// Whether making `parent_id` the parent of item `id` would close a loop.
    ///
    /// Walks the proposed parent's ancestor chain. `UNION` stops the walk on
    /// rows already seen, so an existing cycle cannot make it spin.
    pub async fn would_cycle(pool: &PgPool, id: i64, parent_id: i64) -> Result<bool> {
        if id == parent_id {
            return Ok(true);
        }
        let (cycle,): (bool,) = sqlx::query_as(
            r#"
            WITH RECURSIVE ancestors (id, parent_id) AS (
                SELECT id, parent_id FROM menu_item WHERE id = $1
                UNION
                SELECT m.id, m.parent_id
                FROM menu_item m
                JOIN ancestors a ON m.id = a.parent_id
            )
            SELECT EXISTS (SELECT 1 FROM ancestors WHERE id = $2)
            "#,
        )
        .bind(parent_id)
        .bind(id)
        .fetch_one(pool)
        .await
        .context("failed to check menu ancestry")?;

        Ok(cycle)
    }

    /// Create a menu item, appended at the end of the display order.
    pub async fn create(pool: &PgPool, input: &NewMenuItem) -> Result<Self> {
        let item = sqlx::query_as::<_, Self>(&format!(
            r#"
            INSERT INTO menu_item (title, link, parent_id, page_id, newtab, lang, sort_order)
            VALUES ($1, $2, $3, $4, $5, $6, (SELECT COALESCE(MAX(sort_order) + 1, 0) FROM menu_item))
            RETURNING {MENU_ITEM_COLUMNS}
            "#
        ))
        .bind(&input.title)
        .bind(&input.link)
        .bind(input.parent_id)
        .bind(input.page_id)
        .bind(input.newtab)
        .bind(&input.lang)
        .fetch_one(pool)
        .await
        .context("failed to create menu item")?;

        tracing::info!(id = item.id, title = %item.title, "created menu item");
        Ok(item)
    }

    /// Update a menu item.
    pub async fn update(pool: &PgPool, id: i64, input: &NewMenuItem) -> Result<Option<Self>> {
        let item = sqlx::query_as::<_, Self>(&format!(
            r#"
            UPDATE menu_item
            SET title = $1, link = $2, parent_id = $3, page_id = $4, newtab = $5, lang = $6
            WHERE id = $7
            RETURNING {MENU_ITEM_COLUMNS}
            "#
        ))
        .bind(&input.title)
        .bind(&input.link)
        .bind(input.parent_id)
        .bind(input.page_id)
        .bind(input.newtab)
        .bind(&input.lang)
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to update menu item")?;

        Ok(item)
    }

    /// Rewrite the link of every item bound to `page_id`.
    pub async fn relink_page(conn: &mut PgConnection, page_id: i64, path: &str) -> Result<u64> {
        let result = sqlx::query("UPDATE menu_item SET link = $1 WHERE page_id = $2")
            .bind(path)
            .bind(page_id)
            .execute(conn)
            .await
            .context("failed to refresh menu links")?;

        Ok(result.rows_affected())
    }

    /// Delete a menu item and its descendants.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM menu_item WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .context("failed to delete menu item")?;

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

    fn page() -> Page {
        Page {
            id: 12,
            title: "About Us".to_string(),
            slug: "about-us".to_string(),
            langslug: "en-about-us".to_string(),
            pageinfo: String::new(),
            content: String::new(),
            image_id: None,
            lang: "en".to_string(),
            sort_order: 0,
        }
    }

    #[test]
    fn bound_page_overrides_manual_link() {
        let form = MenuItemForm {
            title: "About".to_string(),
            link: Some("/somewhere-else/".to_string()),
            page_id: Some(12),
            ..Default::default()
        };
        let mut item = form.resolve(&languages()).unwrap();
        item.bind_page(&page());
        assert_eq!(item.link.as_deref(), Some("/api/en/page/about-us/"));
        assert_eq!(item.page_id, Some(12));
    }

    #[test]
    fn blank_link_is_null() {
        let form = MenuItemForm {
            title: "Shop".to_string(),
            link: Some("   ".to_string()),
            lang: Some("tr".to_string()),
            ..Default::default()
        };
        let item = form.resolve(&languages()).unwrap();
        assert_eq!(item.link, None);
        assert_eq!(item.lang, "tr");
    }

    #[test]
    fn rejects_unknown_language() {
        let form = MenuItemForm {
            title: "Shop".to_string(),
            lang: Some("de".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            form.resolve(&languages()),
            Err(ResolveError::UnknownLanguage(_))
        ));
    }

    #[test]
    fn rejects_title_wider_than_column() {
        let form = MenuItemForm {
            title: "m".repeat(MAX_MENU_TITLE_LEN + 1),
            ..Default::default()
        };
        assert_eq!(
            form.resolve(&languages()),
            Err(ResolveError::TooLong {
                field: "title",
                max: MAX_MENU_TITLE_LEN
            })
        );
    }

    #[test]
    fn rejects_link_wider_than_column() {
        let form = MenuItemForm {
            title: "Far away".to_string(),
            link: Some(format!("https://example.com/{}", "p".repeat(MAX_LINK_LEN))),
            ..Default::default()
        };
        assert!(matches!(
            form.resolve(&languages()),
            Err(ResolveError::TooLong { field: "link", .. })
        ));
    }
}
