//! URL-safe slug generation.

/// Maximum slug length (matches the `slug` column width).
pub const MAX_SLUG_LEN: usize = 255;

/// ASCII replacement for common Latin letters with diacritics.
fn transliterate(c: char) -> Option<&'static str> {
    let s = match c {
        'ı' | 'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' => "i",
        'ş' | 'ș' | 'š' | 'ś' => "s",
        'ğ' | 'ģ' => "g",
        'ç' | 'č' | 'ć' => "c",
        'ö' | 'ò' | 'ó' | 'ô' | 'õ' | 'ø' | 'ő' | 'ō' => "o",
        'ü' | 'ù' | 'ú' | 'û' | 'ű' | 'ů' | 'ū' | 'ų' => "u",
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ă' | 'ą' | 'ā' => "a",
        'è' | 'é' | 'ê' | 'ë' | 'ė' | 'ę' | 'ě' | 'ē' => "e",
        'ñ' | 'ń' | 'ň' | 'ņ' => "n",
        'ț' | 'ţ' | 'ť' => "t",
        'ř' => "r",
        'ď' | 'đ' | 'ð' => "d",
        'ľ' | 'ĺ' | 'ļ' | 'ł' => "l",
        'ķ' => "k",
        'ý' | 'ÿ' => "y",
        'ž' | 'ź' | 'ż' => "z",
        'ß' => "ss",
        'æ' => "ae",
        'œ' => "oe",
        'þ' => "th",
        _ => return None,
    };
    Some(s)
}

/// Combining diacritical marks, left over from lower-casing letters like 'İ'.
fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

/// Convert text into a URL-safe slug.
///
/// Lower-cases, transliterates common Latin diacritics, drops apostrophes,
/// replaces every other non-alphanumeric run with a single hyphen and trims
/// leading/trailing hyphens. Returns an empty string when nothing usable
/// remains.
pub fn slugify(text: &str) -> String {
    let mut mapped = String::with_capacity(text.len());
    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            mapped.push(c);
        } else if let Some(ascii) = transliterate(c) {
            mapped.push_str(ascii);
        } else if c == '\'' || c == '\u{2019}' || is_combining_mark(c) {
            continue;
        } else {
            mapped.push('-');
        }
    }

    // Collapse consecutive hyphens and trim
    let mut result = String::with_capacity(mapped.len());
    let mut prev_was_hyphen = true; // Start true to skip leading hyphens
    for c in mapped.chars() {
        if c == '-' {
            if !prev_was_hyphen {
                result.push('-');
            }
            prev_was_hyphen = true;
        } else {
            result.push(c);
            prev_was_hyphen = false;
        }
    }

    while result.ends_with('-') {
        result.pop();
    }

    // `result` is pure ASCII, so byte slicing is safe.
    if result.len() > MAX_SLUG_LEN {
        let truncated = &result[..MAX_SLUG_LEN];
        return match truncated.rfind('-') {
            Some(last_hyphen) => truncated[..last_hyphen].to_string(),
            None => truncated.to_string(),
        };
    }

    result
}

/// Translation link key: the slug of `"{lang}-{title}"`.
pub fn langslug(lang: &str, title: &str) -> String {
    slugify(&format!("{lang}-{title}"))
}

/// Whether a hand-entered slug is acceptable as-is.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= MAX_SLUG_LEN
        && slug
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_basic() {
        assert_eq!(slugify("About Us"), "about-us");
        assert_eq!(slugify("My First Product"), "my-first-product");
    }

    #[test]
    fn slugify_special_chars() {
        assert_eq!(slugify("What's New?"), "whats-new");
        assert_eq!(slugify("Item #42: The Answer"), "item-42-the-answer");
        assert_eq!(slugify("foo & bar + baz"), "foo-bar-baz");
    }

    #[test]
    fn slugify_turkish() {
        assert_eq!(slugify("Hakkımızda"), "hakkimizda");
        assert_eq!(slugify("Ürünler ve Çözümler"), "urunler-ve-cozumler");
        assert_eq!(slugify("İletişim"), "iletisim");
        assert_eq!(slugify("Ağaç Şişe"), "agac-sise");
    }

    #[test]
    fn slugify_consecutive_and_edges() {
        assert_eq!(slugify("hello   world"), "hello-world");
        assert_eq!(slugify("a---b"), "a-b");
        assert_eq!(slugify("  hello  "), "hello");
        assert_eq!(slugify("---hello---"), "hello");
    }

    #[test]
    fn slugify_empty() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("---"), "");
        assert_eq!(slugify("日本語"), "");
    }

    #[test]
    fn slugify_long_text_breaks_on_hyphen() {
        let title = "word ".repeat(100);
        let slug = slugify(&title);
        assert!(slug.len() <= MAX_SLUG_LEN);
        assert!(!slug.ends_with('-'));
        assert!(slug.starts_with("word-word"));

        let unbroken = slugify(&"a".repeat(300));
        assert_eq!(unbroken.len(), MAX_SLUG_LEN);
    }

    #[test]
    fn langslug_prefixes_language() {
        assert_eq!(langslug("en", "About Us"), "en-about-us");
        assert_eq!(langslug("tr", "Hakkımızda"), "tr-hakkimizda");
    }

    #[test]
    fn slug_validation() {
        assert!(is_valid_slug("about-us"));
        assert!(is_valid_slug("About_Us-2"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("about us"));
        assert!(!is_valid_slug("about/us"));
    }

    #[test]
    fn transliterates_central_european_letters() {
        assert_eq!(slugify("Brașov"), "brasov");
        assert_eq!(slugify("Timișoara Țară"), "timisoara-tara");
        assert_eq!(slugify("Győr Kőszeg Szűcs"), "gyor-koszeg-szucs");
        assert_eq!(slugify("Gdańsk Łódź Będzin"), "gdansk-lodz-bedzin");
        assert_eq!(slugify("Vilnius Klaipėda"), "vilnius-klaipeda");
        assert_eq!(slugify("Dvořák Třebíč"), "dvorak-trebic");
    }
}
