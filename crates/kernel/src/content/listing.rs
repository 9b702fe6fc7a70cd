//! Listing query builder using SeaQuery.
//!
//! Listing endpoints compose their filters additively: language, category
//! membership, tag membership and slug each narrow the result when present.

use sea_query::{Alias, Asterisk, Expr, Order, PostgresQueryBuilder, Query, SelectStatement};

/// Listing target: a table carrying `lang` and `sort_order` plus its
/// category and tag link tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingTable {
    Page,
    Product,
}

impl ListingTable {
    /// Base table name.
    pub fn table(self) -> &'static str {
        match self {
            ListingTable::Page => "page",
            ListingTable::Product => "product",
        }
    }

    /// Owner column in this table's link tables.
    fn owner_column(self) -> &'static str {
        match self {
            ListingTable::Page => "page_id",
            ListingTable::Product => "product_id",
        }
    }

    fn category_link(self) -> &'static str {
        match self {
            ListingTable::Page => "page_category",
            ListingTable::Product => "product_category",
        }
    }

    fn tag_link(self) -> &'static str {
        match self {
            ListingTable::Page => "page_tag",
            ListingTable::Product => "product_tag",
        }
    }
}

/// Filters applied to a listing. `None` means "do not filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingFilter {
    pub lang: Option<String>,
    pub category_slug: Option<String>,
    pub tag_slug: Option<String>,
    pub slug: Option<String>,
}

impl ListingFilter {
    /// Filter with no restrictions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to one language.
    pub fn lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    /// Restrict to members of a category (blank = no restriction).
    pub fn category(mut self, slug: Option<String>) -> Self {
        self.category_slug = slug.filter(|s| !s.trim().is_empty());
        self
    }

    /// Restrict to carriers of a tag (blank = no restriction).
    pub fn tag(mut self, slug: Option<String>) -> Self {
        self.tag_slug = slug.filter(|s| !s.trim().is_empty());
        self
    }

    /// Restrict to one slug.
    pub fn slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    /// Build the SELECT for `table`, ordered by display order then id.
    pub fn build(&self, target: ListingTable) -> String {
        let table = target.table();
        let mut query = Query::select();
        query
            .column((Alias::new(table), Asterisk))
            .from(Alias::new(table));

        if let Some(ref lang) = self.lang {
            query.and_where(Expr::col((Alias::new(table), Alias::new("lang"))).eq(lang.as_str()));
        }

        if let Some(ref slug) = self.slug {
            query.and_where(Expr::col((Alias::new(table), Alias::new("slug"))).eq(slug.as_str()));
        }

        if let Some(ref category) = self.category_slug {
            let members = membership_subquery(
                target.category_link(),
                target.owner_column(),
                "category",
                "category_id",
                category,
            );
            query.and_where(Expr::col((Alias::new(table), Alias::new("id"))).in_subquery(members));
        }

        if let Some(ref tag) = self.tag_slug {
            let members =
                membership_subquery(target.tag_link(), target.owner_column(), "tag", "tag_id", tag);
            query.and_where(Expr::col((Alias::new(table), Alias::new("id"))).in_subquery(members));
        }

        query
            .order_by((Alias::new(table), Alias::new("sort_order")), Order::Asc)
            .order_by((Alias::new(table), Alias::new("id")), Order::Asc);

        if self.slug.is_some() {
            query.limit(1);
        }

        query.to_string(PostgresQueryBuilder)
    }
}

/// `SELECT link.owner FROM link JOIN target ON target.id = link.target_col WHERE target.slug = ..`
fn membership_subquery(
    link: &str,
    owner: &str,
    target: &str,
    target_col: &str,
    slug: &str,
) -> SelectStatement {
    Query::select()
        .column((Alias::new(link), Alias::new(owner)))
        .from(Alias::new(link))
        .inner_join(
            Alias::new(target),
            Expr::col((Alias::new(target), Alias::new("id")))
                .equals((Alias::new(link), Alias::new(target_col))),
        )
        .and_where(Expr::col((Alias::new(target), Alias::new("slug"))).eq(slug))
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unfiltered_listing() {
        let sql = ListingFilter::new().build(ListingTable::Page);
        assert!(sql.starts_with(r#"SELECT "page".* FROM "page""#));
        assert!(!sql.contains("WHERE"));
        assert!(sql.contains(r#"ORDER BY "page"."sort_order" ASC, "page"."id" ASC"#));
    }

    #[test]
    fn language_filter() {
        let sql = ListingFilter::new().lang("tr").build(ListingTable::Product);
        assert!(sql.contains(r#"WHERE "product"."lang" = 'tr'"#));
    }

    #[test]
    fn category_and_tag_filters_compose() {
        let sql = ListingFilter::new()
            .lang("en")
            .category(Some("shoes".into()))
            .tag(Some("sale".into()))
            .build(ListingTable::Product);

        assert!(sql.contains(r#""product"."lang" = 'en'"#));
        assert!(sql.contains(r#"FROM "product_category" INNER JOIN "category""#));
        assert!(sql.contains(r#""category"."slug" = 'shoes'"#));
        assert!(sql.contains(r#"FROM "product_tag" INNER JOIN "tag""#));
        assert!(sql.contains(r#""tag"."slug" = 'sale'"#));
        assert_eq!(sql.matches(" AND ").count(), 2);
    }

    #[test]
    fn blank_category_is_ignored() {
        let sql = ListingFilter::new()
            .category(Some("  ".into()))
            .tag(None)
            .build(ListingTable::Page);
        assert!(!sql.contains("page_category"));
        assert!(!sql.contains("page_tag"));
    }

    #[test]
    fn slug_lookup_is_limited() {
        let sql = ListingFilter::new()
            .lang("en")
            .slug("about-us")
            .build(ListingTable::Page);
        assert!(sql.contains(r#""page"."slug" = 'about-us'"#));
        assert!(sql.ends_with("LIMIT 1"));
    }

    #[test]
    fn values_are_escaped() {
        let sql = ListingFilter::new()
            .slug("x' OR '1'='1")
            .build(ListingTable::Page);
        assert!(!sql.contains("'x' OR"));
    }
}
