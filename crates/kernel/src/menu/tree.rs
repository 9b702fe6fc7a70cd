//! Menu tree assembly.

use std::collections::HashMap;

use serde::Serialize;

use super::link::public_link;

/// One menu item as loaded for tree assembly, with its bound page's slug.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MenuRow {
    pub id: i64,
    pub title: String,
    pub link: Option<String>,
    pub parent_id: Option<i64>,
    pub page_slug: Option<String>,
    pub newtab: bool,
    pub sort_order: i32,
    pub lang: String,
}

/// Serialized menu node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuNode {
    pub id: i64,
    pub title: String,
    pub link: Option<String>,
    pub order: i32,
    pub parent: Option<i64>,
    pub page_slug: Option<String>,
    pub newtab: bool,
    /// `None` (serialized as `null`) when the item has no children.
    pub children: Option<Vec<MenuNode>>,
    pub lang: String,
}

/// Menu items indexed by parent.
///
/// Rows are kept in display order (`sort_order`, then id) so every child
/// list comes out sorted.
#[derive(Debug)]
pub struct MenuTree {
    rows: Vec<MenuRow>,
    children: HashMap<i64, Vec<usize>>,
}

impl MenuTree {
    /// Index rows by parent.
    pub fn build(mut rows: Vec<MenuRow>) -> Self {
        rows.sort_by_key(|row| (row.sort_order, row.id));

        let mut children: HashMap<i64, Vec<usize>> = HashMap::new();
        for (idx, row) in rows.iter().enumerate() {
            if let Some(parent) = row.parent_id {
                children.entry(parent).or_default().push(idx);
            }
        }

        Self { rows, children }
    }

    /// Top-level items with their full subtrees.
    ///
    /// Only items without a parent appear at the top; when `lang` is given,
    /// only top-level items in that language are kept. Descendants are
    /// included regardless of their own language. Items caught in a parent
    /// cycle have no top-level ancestor and never appear.
    pub fn top_level(&self, lang: Option<&str>) -> Vec<MenuNode> {
        self.rows
            .iter()
            .enumerate()
            .filter_map(|(idx, row)| {
                if row.parent_id.is_some() {
                    return None;
                }
                if lang.is_some_and(|lang| row.lang != lang) {
                    return None;
                }
                Some(self.node(idx))
            })
            .collect()
    }

    /// Number of items in the tree.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn node(&self, idx: usize) -> MenuNode {
        let row = &self.rows[idx];
        let children = self
            .children
            .get(&row.id)
            .map(|kids| kids.iter().map(|&kid| self.node(kid)).collect::<Vec<_>>())
            .filter(|kids| !kids.is_empty());

        MenuNode {
            id: row.id,
            title: row.title.clone(),
            link: public_link(row.link.as_deref()),
            order: row.sort_order,
            parent: row.parent_id,
            page_slug: row.page_slug.clone(),
            newtab: row.newtab,
            children,
            lang: row.lang.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn row(id: i64, parent_id: Option<i64>, sort_order: i32, lang: &str) -> MenuRow {
        MenuRow {
            id,
            title: format!("Item {id}"),
            link: None,
            parent_id,
            page_slug: None,
            newtab: false,
            sort_order,
            lang: lang.to_string(),
        }
    }

    #[test]
    fn nests_children_and_drops_them_from_top_level() {
        let tree = MenuTree::build(vec![
            row(1, None, 0, "en"),
            row(2, Some(1), 0, "en"),
            row(3, None, 1, "en"),
        ]);
        let top = tree.top_level(Some("en"));

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].id, 1);
        let kids = top[0].children.as_ref().unwrap();
        assert_eq!(kids.len(), 1);
        assert_eq!(kids[0].id, 2);
        assert_eq!(kids[0].parent, Some(1));
        assert_eq!(kids[0].children, None);
        assert_eq!(top[1].id, 3);
        assert_eq!(top[1].children, None);
    }

    #[test]
    fn childless_item_serializes_null_children() {
        let tree = MenuTree::build(vec![row(7, None, 0, "en")]);
        let json = serde_json::to_value(tree.top_level(None)).unwrap();
        assert_eq!(json[0]["children"], serde_json::Value::Null);
        assert_eq!(json[0]["order"], 0);
        assert_eq!(json[0]["parent"], serde_json::Value::Null);
    }

    #[test]
    fn orders_by_sort_order_then_id() {
        let tree = MenuTree::build(vec![
            row(5, None, 2, "en"),
            row(4, None, 1, "en"),
            row(3, None, 1, "en"),
            row(9, Some(4), 1, "en"),
            row(8, Some(4), 0, "en"),
        ]);
        let top = tree.top_level(None);
        let ids: Vec<i64> = top.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![3, 4, 5]);
        let kids: Vec<i64> = top[1]
            .children
            .as_ref()
            .unwrap()
            .iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(kids, vec![8, 9]);
    }

    #[test]
    fn filters_top_level_by_language_only() {
        let tree = MenuTree::build(vec![
            row(1, None, 0, "en"),
            row(2, None, 1, "tr"),
            row(3, Some(1), 0, "tr"),
        ]);
        let top = tree.top_level(Some("en"));
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].id, 1);
        assert_eq!(top[0].children.as_ref().unwrap()[0].id, 3);

        let tr = tree.top_level(Some("tr"));
        assert_eq!(tr.len(), 1);
        assert_eq!(tr[0].id, 2);
    }

    #[test]
    fn cycles_are_unreachable() {
        let tree = MenuTree::build(vec![
            row(1, None, 0, "en"),
            row(2, Some(3), 0, "en"),
            row(3, Some(2), 0, "en"),
        ]);
        let top = tree.top_level(None);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].id, 1);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn strips_api_prefix_from_links() {
        let mut item = row(1, None, 0, "en");
        item.link = Some("/api/en/page/about-us/".to_string());
        item.page_slug = Some("about-us".to_string());
        let top = MenuTree::build(vec![item]).top_level(None);
        assert_eq!(top[0].link.as_deref(), Some("/en/page/about-us/"));
        assert_eq!(top[0].page_slug.as_deref(), Some("about-us"));
    }

    #[test]
    fn empty_tree() {
        let tree = MenuTree::build(Vec::new());
        assert!(tree.is_empty());
        assert!(tree.top_level(Some("en")).is_empty());
    }
}
