//! Many-to-many link tables between content entities.
//!
//! Relations of a result set are loaded with one batched query per link
//! table (`owner = ANY($1)`), never row by row.

use std::collections::HashMap;

use anyhow::{Context, Result};
use sqlx::{PgConnection, PgPool};

/// A link table joining an owner entity to a target entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTable {
    PageImage,
    PageCategory,
    PageTag,
    ProductImage,
    ProductCategory,
    ProductTag,
    HomePageImage,
    HomePageProduct,
}

impl LinkTable {
    /// (table, owner column, target column)
    fn columns(self) -> (&'static str, &'static str, &'static str) {
        match self {
            LinkTable::PageImage => ("page_image", "page_id", "image_id"),
            LinkTable::PageCategory => ("page_category", "page_id", "category_id"),
            LinkTable::PageTag => ("page_tag", "page_id", "tag_id"),
            LinkTable::ProductImage => ("product_image", "product_id", "image_id"),
            LinkTable::ProductCategory => ("product_category", "product_id", "category_id"),
            LinkTable::ProductTag => ("product_tag", "product_id", "tag_id"),
            LinkTable::HomePageImage => ("home_page_image", "home_page_id", "image_id"),
            LinkTable::HomePageProduct => ("home_page_product", "home_page_id", "product_id"),
        }
    }

    /// Target ids linked to each owner, in target id order.
    pub async fn targets_by_owner(
        self,
        pool: &PgPool,
        owner_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<i64>>> {
        if owner_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let (table, owner, target) = self.columns();
        let rows: Vec<(i64, i64)> = sqlx::query_as(&format!(
            "SELECT {owner}, {target} FROM {table} WHERE {owner} = ANY($1) ORDER BY {owner}, {target}"
        ))
        .bind(owner_ids)
        .fetch_all(pool)
        .await
        .with_context(|| format!("failed to load {table} links"))?;

        let mut grouped: HashMap<i64, Vec<i64>> = HashMap::new();
        for (owner_id, target_id) in rows {
            grouped.entry(owner_id).or_default().push(target_id);
        }
        Ok(grouped)
    }

    /// Target ids linked to one owner.
    pub async fn targets(self, pool: &PgPool, owner_id: i64) -> Result<Vec<i64>> {
        let mut grouped = self.targets_by_owner(pool, &[owner_id]).await?;
        Ok(grouped.remove(&owner_id).unwrap_or_default())
    }

    /// Replace the owner's links with `target_ids` inside the caller's transaction.
    pub async fn replace(
        self,
        conn: &mut PgConnection,
        owner_id: i64,
        target_ids: &[i64],
    ) -> Result<()> {
        let (table, owner, target) = self.columns();
        sqlx::query(&format!("DELETE FROM {table} WHERE {owner} = $1"))
            .bind(owner_id)
            .execute(&mut *conn)
            .await
            .with_context(|| format!("failed to clear {table} links"))?;

        if target_ids.is_empty() {
            return Ok(());
        }

        sqlx::query(&format!(
            "INSERT INTO {table} ({owner}, {target}) \
             SELECT $1, t FROM UNNEST($2::BIGINT[]) AS t ON CONFLICT DO NOTHING"
        ))
        .bind(owner_id)
        .bind(target_ids)
        .execute(&mut *conn)
        .await
        .with_context(|| format!("failed to write {table} links"))?;

        Ok(())
    }
}

/// Collect the distinct ids of all grouped targets.
pub fn distinct_targets(grouped: &HashMap<i64, Vec<i64>>) -> Vec<i64> {
    let mut ids: Vec<i64> = grouped.values().flatten().copied().collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Resolve grouped target ids against loaded targets, dropping dangling ids.
pub fn attach<T: Clone>(
    ids: Option<&Vec<i64>>,
    loaded: &HashMap<i64, T>,
) -> Vec<T> {
    ids.map(|ids| ids.iter().filter_map(|id| loaded.get(id).cloned()).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_targets_sorted_and_deduped() {
        let mut grouped = HashMap::new();
        grouped.insert(1, vec![5, 3]);
        grouped.insert(2, vec![3, 9]);
        assert_eq!(distinct_targets(&grouped), vec![3, 5, 9]);
    }

    #[test]
    fn attach_keeps_order_and_skips_missing() {
        let loaded: HashMap<i64, &str> = [(3, "three"), (5, "five")].into_iter().collect();
        let ids = vec![5, 4, 3];
        assert_eq!(attach(Some(&ids), &loaded), vec!["five", "three"]);
        assert!(attach::<&str>(None, &loaded).is_empty());
    }

    #[test]
    fn link_tables_name_real_columns() {
        let (table, owner, target) = LinkTable::HomePageProduct.columns();
        assert_eq!(table, "home_page_product");
        assert_eq!(owner, "home_page_id");
        assert_eq!(target, "product_id");
    }
}
