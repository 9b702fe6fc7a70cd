//! Menu link paths.

/// Prefix under which the JSON API is mounted.
pub const API_PREFIX: &str = "/api";

/// API path of a page's detail endpoint.
pub fn page_detail_path(lang: &str, slug: &str) -> String {
    format!("{API_PREFIX}/{lang}/page/{slug}/")
}

/// Link as shown to clients: a leading `/api` segment is removed.
///
/// Only an exact `/api/` prefix is stripped; `/apiary` and external URLs
/// pass through untouched.
pub fn public_link(link: Option<&str>) -> Option<String> {
    let link = link?;
    match link.strip_prefix(API_PREFIX) {
        Some(rest) if rest.starts_with('/') => Some(rest.to_string()),
        _ => Some(link.to_string()),
    }
}
