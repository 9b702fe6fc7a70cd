//! Site languages.
//!
//! Languages are fixed at startup from configuration. The first configured
//! language is the default for content saved with a blank language tag.

use std::fmt;
use std::str::FromStr;

use anyhow::{Result, bail};
use serde::Serialize;

/// Maximum length of a language code (matches the `lang` column width).
const MAX_CODE_LEN: usize = 7;

/// A configured site language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Language {
    /// Language code (e.g., "en", "tr", "pt-br").
    pub code: String,

    /// Human-readable label (e.g., "English").
    pub label: String,
}

/// Ordered, non-empty set of site languages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Languages {
    entries: Vec<Language>,
}

/// Validate that a language code follows the BCP 47 primary subtag format
/// and fits the storage column.
///
/// Accepts: lowercase alpha 2-3 chars, optionally followed by hyphen-separated
/// alphanumeric subtags (e.g., "en", "tr", "pt-br").
pub fn validate_language_code(code: &str) -> Result<()> {
    if code.is_empty() || code.len() > MAX_CODE_LEN {
        bail!("language code must be 1-{MAX_CODE_LEN} characters, got '{code}'");
    }

    let mut parts = code.split('-');

    match parts.next() {
        Some(primary) if (2..=3).contains(&primary.len()) => {
            if !primary.bytes().all(|b| b.is_ascii_lowercase()) {
                bail!("language code primary subtag must be lowercase letters, got '{code}'");
            }
        }
        _ => bail!("language code must start with a 2-3 letter primary subtag, got '{code}'"),
    }

    for subtag in parts {
        if subtag.is_empty() || !subtag.bytes().all(|b| b.is_ascii_alphanumeric()) {
            bail!("language code subtag must be alphanumeric, got '{subtag}' in '{code}'");
        }
    }

    Ok(())
}

impl Languages {
    /// Build a language set, rejecting empty lists, invalid codes and duplicates.
    pub fn new(entries: Vec<Language>) -> Result<Self> {
        if entries.is_empty() {
            bail!("at least one language must be configured");
        }
        for (i, lang) in entries.iter().enumerate() {
            validate_language_code(&lang.code)?;
            if entries[..i].iter().any(|l| l.code == lang.code) {
                bail!("language '{}' is configured twice", lang.code);
            }
        }
        Ok(Self { entries })
    }

    /// The default language (first configured).
    pub fn default_code(&self) -> &str {
        // `new` guarantees at least one entry.
        self.entries.first().map(|l| l.code.as_str()).unwrap_or("en")
    }

    /// Whether `code` is a configured language.
    pub fn contains(&self, code: &str) -> bool {
        self.entries.iter().any(|l| l.code == code)
    }

    /// Resolve a submitted language tag: blank means the default language.
    ///
    /// Returns `None` for a tag that is not configured.
    pub fn resolve(&self, submitted: Option<&str>) -> Option<String> {
        match submitted.map(str::trim) {
            None | Some("") => Some(self.default_code().to_string()),
            Some(code) if self.contains(code) => Some(code.to_string()),
            Some(_) => None,
        }
    }

    /// All configured languages in order.
    pub fn iter(&self) -> impl Iterator<Item = &Language> {
        self.entries.iter()
    }
}

impl FromStr for Languages {
    type Err = anyhow::Error;

    /// Parse `code:label` pairs separated by commas. A bare code is its own label.
    fn from_str(s: &str) -> Result<Self> {
        let entries = s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                let (code, label) = part.split_once(':').unwrap_or((part, part));
                Language {
                    code: code.trim().to_string(),
                    label: label.trim().to_string(),
                }
            })
            .collect();

        Self::new(entries)
    }
}

impl fmt::Display for Languages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .entries
            .iter()
            .map(|l| format!("{}:{}", l.code, l.label))
            .collect();
        f.write_str(&parts.join(","))
    }
}
