//! Vitrine test utilities.
//!
//! Fixture builders producing admin request bodies, and assertion helpers
//! for JSON responses.

use serde_json::{Value as JsonValue, json};

/// Create a page or product body with default values.
pub fn test_content(title: &str) -> TestContent {
    TestContent {
        title: title.to_string(),
        slug: None,
        lang: None,
        content: String::new(),
        image_id: None,
        images: Vec::new(),
        categories: Vec::new(),
        tags: Vec::new(),
        shoplink: None,
    }
}

/// A page or product body builder.
#[derive(Debug, Clone)]
pub struct TestContent {
    pub title: String,
    pub slug: Option<String>,
    pub lang: Option<String>,
    pub content: String,
    pub image_id: Option<i64>,
    pub images: Vec<i64>,
    pub categories: Vec<i64>,
    pub tags: Vec<i64>,
    pub shoplink: Option<String>,
}

impl TestContent {
    /// Set an explicit slug.
    pub fn with_slug(mut self, slug: &str) -> Self {
        self.slug = Some(slug.to_string());
        self
    }

    /// Set the language.
    pub fn in_lang(mut self, lang: &str) -> Self {
        self.lang = Some(lang.to_string());
        self
    }

    /// Set the rich-text body.
    pub fn with_content(mut self, content: &str) -> Self {
        self.content = content.to_string();
        self
    }

    /// Set the cover image.
    pub fn with_cover(mut self, image_id: i64) -> Self {
        self.image_id = Some(image_id);
        self
    }

    /// Attach categories.
    pub fn in_categories(mut self, ids: &[i64]) -> Self {
        self.categories = ids.to_vec();
        self
    }

    /// Attach tags.
    pub fn with_tags(mut self, ids: &[i64]) -> Self {
        self.tags = ids.to_vec();
        self
    }

    /// Set the shop link (products only).
    pub fn with_shoplink(mut self, link: &str) -> Self {
        self.shoplink = Some(link.to_string());
        self
    }

    /// Render as a request body.
    pub fn to_json(&self) -> JsonValue {
        let mut body = json!({
            "title": self.title,
            "slug": self.slug,
            "lang": self.lang,
            "content": self.content,
            "image_id": self.image_id,
            "images": self.images,
            "categories": self.categories,
            "tags": self.tags,
        });
        if let (Some(link), Some(obj)) = (&self.shoplink, body.as_object_mut()) {
            obj.insert("shoplink".to_string(), json!(link));
        }
        body
    }
}

/// Create a menu item body.
pub fn test_menu_item(title: &str) -> TestMenuItem {
    TestMenuItem {
        title: title.to_string(),
        link: None,
        parent_id: None,
        page_id: None,
        newtab: false,
        lang: None,
    }
}

/// A menu item body builder.
#[derive(Debug, Clone)]
pub struct TestMenuItem {
    pub title: String,
    pub link: Option<String>,
    pub parent_id: Option<i64>,
    pub page_id: Option<i64>,
    pub newtab: bool,
    pub lang: Option<String>,
}

impl TestMenuItem {
    /// Set a manual link.
    pub fn with_link(mut self, link: &str) -> Self {
        self.link = Some(link.to_string());
        self
    }

    /// Nest under a parent item.
    pub fn under(mut self, parent_id: i64) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Bind to a page.
    pub fn for_page(mut self, page_id: i64) -> Self {
        self.page_id = Some(page_id);
        self
    }

    /// Open in a new tab.
    pub fn in_new_tab(mut self) -> Self {
        self.newtab = true;
        self
    }

    /// Set the language.
    pub fn in_lang(mut self, lang: &str) -> Self {
        self.lang = Some(lang.to_string());
        self
    }

    /// Render as a request body.
    pub fn to_json(&self) -> JsonValue {
        json!({
            "title": self.title,
            "link": self.link,
            "parent_id": self.parent_id,
            "page_id": self.page_id,
            "newtab": self.newtab,
            "lang": self.lang,
        })
    }
}

/// Create a social links body with every link blank.
pub fn test_social() -> TestSocial {
    TestSocial {
        links: Vec::new(),
    }
}

/// A social links body builder.
#[derive(Debug, Clone)]
pub struct TestSocial {
    pub links: Vec<(String, String)>,
}

impl TestSocial {
    /// Set one network's link.
    pub fn with_link(mut self, network: &str, url: &str) -> Self {
        self.links.push((network.to_string(), url.to_string()));
        self
    }

    /// Render as a request body.
    pub fn to_json(&self) -> JsonValue {
        let mut body = json!({
            "facebook": "",
            "twitter": "",
            "instagram": "",
            "threads": "",
            "youtube": "",
        });
        if let Some(obj) = body.as_object_mut() {
            for (network, url) in &self.links {
                obj.insert(network.clone(), json!(url));
            }
        }
        body
    }
}

/// Assertion helpers for JSON content.
pub mod assert {
    use serde_json::Value;

    /// Assert that a JSON value has a specific key.
    pub fn has_key(value: &Value, key: &str) {
        assert!(
            value.get(key).is_some(),
            "Expected JSON to have key '{key}', got: {value}"
        );
    }

    /// Assert that an error body carries the expected `detail` message.
    pub fn detail_eq(value: &Value, expected: &str) {
        assert_eq!(
            value.get("detail").and_then(Value::as_str),
            Some(expected),
            "Expected detail '{expected}', got: {value}"
        );
    }

    /// Assert that a string contains a substring.
    pub fn contains(haystack: &str, needle: &str) {
        assert!(
            haystack.contains(needle),
            "Expected string to contain '{needle}'\nActual: {haystack}"
        );
    }
}
