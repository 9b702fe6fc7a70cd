//! Save-time derivation of slug, translation link and language fields.
//!
//! Every slugged entity passes through here before it is written. Slug
//! uniqueness is left to the `UNIQUE` column constraint: a duplicate derived
//! slug fails the write rather than being disambiguated.

use thiserror::Error;

use super::slug::{is_valid_slug, langslug, slugify};
use crate::error::AppError;
use crate::models::language::Languages;

/// A submitted form that cannot be saved as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("title must not be empty")]
    EmptyTitle,

    #[error("no slug can be derived from '{0}'; enter one explicitly")]
    UnsluggableTitle(String),

    #[error("invalid slug '{0}': use letters, digits, hyphens and underscores")]
    InvalidSlug(String),

    #[error("unknown language '{0}'")]
    UnknownLanguage(String),

    #[error("{field}: ensure this value has at most {max} characters")]
    TooLong { field: &'static str, max: usize },
}

impl From<ResolveError> for AppError {
    fn from(e: ResolveError) -> Self {
        AppError::Validation(e.to_string())
    }
}

/// Derived identity fields of a language-scoped, slugged entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlugFields {
    pub title: String,
    pub slug: String,
    pub langslug: String,
    pub lang: String,
}

/// Width of the `title` and `langslug` columns.
pub const MAX_TITLE_LEN: usize = 255;

/// Reject values wider than their column, counted in characters.
pub fn check_length(field: &'static str, value: &str, max: usize) -> Result<(), ResolveError> {
    if value.chars().count() > max {
        return Err(ResolveError::TooLong { field, max });
    }
    Ok(())
}

/// Trim a title and reject blank or over-long ones.
pub fn resolve_title(title: &str, max: usize) -> Result<String, ResolveError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ResolveError::EmptyTitle);
    }
    check_length("title", title, max)?;
    Ok(title.to_string())
}

/// Keep a supplied non-blank slug, otherwise derive one from the title.
pub fn resolve_slug(supplied: Option<&str>, title: &str) -> Result<String, ResolveError> {
    match supplied.map(str::trim).filter(|s| !s.is_empty()) {
        Some(slug) if is_valid_slug(slug) => Ok(slug.to_string()),
        Some(slug) => Err(ResolveError::InvalidSlug(slug.to_string())),
        None => {
            let derived = slugify(title);
            if derived.is_empty() {
                return Err(ResolveError::UnsluggableTitle(title.to_string()));
            }
            Ok(derived)
        }
    }
}

/// Keep a supplied non-blank translation link, otherwise derive it from
/// language and title.
pub fn resolve_langslug(
    supplied: Option<&str>,
    lang: &str,
    title: &str,
) -> Result<String, ResolveError> {
    match supplied.map(str::trim).filter(|s| !s.is_empty()) {
        Some(link) => {
            check_length("langslug", link, MAX_TITLE_LEN)?;
            Ok(link.to_string())
        }
        None => Ok(langslug(lang, title)),
    }
}

/// Map a submitted language tag onto a configured language.
pub fn resolve_lang(languages: &Languages, submitted: Option<&str>) -> Result<String, ResolveError> {
    languages
        .resolve(submitted)
        .ok_or_else(|| ResolveError::UnknownLanguage(submitted.unwrap_or_default().to_string()))
}

/// Resolve all identity fields of a page, product or category.
pub fn resolve_slugged(
    languages: &Languages,
    title: &str,
    slug: Option<&str>,
    langslug: Option<&str>,
    lang: Option<&str>,
) -> Result<SlugFields, ResolveError> {
    let title = resolve_title(title, MAX_TITLE_LEN)?;
    let lang = resolve_lang(languages, lang)?;
    let slug = resolve_slug(slug, &title)?;
    let langslug = resolve_langslug(langslug, &lang, &title)?;

    Ok(SlugFields {
        title,
        slug,
        langslug,
        lang,
    })
}
