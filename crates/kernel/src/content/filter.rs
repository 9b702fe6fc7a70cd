//! Rich-text filtering for editor-produced HTML.
//!
//! Bodies coming from the admin editor are cleaned against an allow-list
//! before they are stored, so the read API never serves script, style or
//! event-handler markup.

use std::collections::HashSet;

/// Tags the editor may produce.
const ALLOWED_TAGS: &[&str] = &[
    "p",
    "br",
    "strong",
    "b",
    "em",
    "i",
    "u",
    "s",
    "sub",
    "sup",
    "span",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "ul",
    "ol",
    "li",
    "a",
    "blockquote",
    "pre",
    "code",
    "table",
    "caption",
    "thead",
    "tbody",
    "tr",
    "th",
    "td",
    "img",
    "figure",
    "figcaption",
    "hr",
];

/// Clean editor HTML, keeping only allow-listed tags and attributes.
pub fn sanitize_rich_text(input: &str) -> String {
    if input.trim().is_empty() {
        return String::new();
    }

    let tags: HashSet<&str> = ALLOWED_TAGS.iter().copied().collect();
    let mut builder = ammonia::Builder::default();
    builder
        .tags(tags)
        .add_tag_attributes("a", &["href", "title", "target"])
        .add_tag_attributes("img", &["src", "alt", "title", "width", "height"])
        .add_tag_attributes("td", &["colspan", "rowspan"])
        .add_tag_attributes("th", &["colspan", "rowspan"]);

    builder.clean(input).to_string()
}
