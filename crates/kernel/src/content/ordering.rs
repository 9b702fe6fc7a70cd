//! Drag-and-drop reordering of admin lists.

use anyhow::{Context, Result};
use sqlx::PgPool;

/// Tables whose rows carry an explicit, admin-controlled `sort_order`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortableTable {
    Page,
    Product,
    Category,
    MenuItem,
    Social,
}

impl SortableTable {
    /// Map an admin model name onto its sortable table.
    pub fn from_model(model: &str) -> Option<Self> {
        match model {
            "page" => Some(SortableTable::Page),
            "product" => Some(SortableTable::Product),
            "category" => Some(SortableTable::Category),
            "menuitem" => Some(SortableTable::MenuItem),
            "social" => Some(SortableTable::Social),
            _ => None,
        }
    }

    fn table(self) -> &'static str {
        match self {
            SortableTable::Page => "page",
            SortableTable::Product => "product",
            SortableTable::Category => "category",
            SortableTable::MenuItem => "menu_item",
            SortableTable::Social => "social",
        }
    }
}

/// Reject empty or repeated id lists.
pub fn validate_order(ids: &[i64]) -> Result<(), String> {
    if ids.is_empty() {
        return Err("ids must not be empty".to_string());
    }
    let mut seen = ids.to_vec();
    seen.sort_unstable();
    if seen.windows(2).any(|w| w[0] == w[1]) {
        return Err("ids must not repeat".to_string());
    }
    Ok(())
}

/// Assign `sort_order` 0..n to `ids` in the given sequence.
///
/// Runs in one transaction. Returns `false` (and changes nothing) when any id
/// does not exist.
pub async fn reorder(pool: &PgPool, target: SortableTable, ids: &[i64]) -> Result<bool> {
    let table = target.table();
    let mut tx = pool.begin().await.context("failed to start transaction")?;

    for (position, id) in ids.iter().enumerate() {
        let position = i32::try_from(position).context("too many rows to reorder")?;
        let result = sqlx::query(&format!("UPDATE {table} SET sort_order = $1 WHERE id = $2"))
            .bind(position)
            .bind(id)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("failed to reorder {table}"))?;

        if result.rows_affected() == 0 {
            tx.rollback().await.context("failed to roll back reorder")?;
            return Ok(false);
        }
    }

    tx.commit().await.context("failed to commit reorder")?;
    tracing::info!(table = %table, count = ids.len(), "reordered rows");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sortable_models() {
        assert_eq!(SortableTable::from_model("page"), Some(SortableTable::Page));
        assert_eq!(
            SortableTable::from_model("menuitem"),
            Some(SortableTable::MenuItem)
        );
        assert_eq!(SortableTable::from_model("tag"), None);
        assert_eq!(SortableTable::MenuItem.table(), "menu_item");
    }

    #[test]
    fn order_validation() {
        assert!(validate_order(&[3, 1, 2]).is_ok());
        assert!(validate_order(&[]).is_err());
        assert!(validate_order(&[1, 2, 1]).is_err());
    }
}
