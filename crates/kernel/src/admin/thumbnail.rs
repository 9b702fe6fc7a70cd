//! Image thumbnails for admin lists and pickers.

use serde::Serialize;

use crate::models::Image;
use crate::representation::MediaUrls;

/// Height, in pixels, of list thumbnails.
const THUMBNAIL_HEIGHT: u32 = 50;

/// Escape HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// List-view thumbnail fragment for an optional cover image, or `-`.
pub fn image_display(image: Option<&Image>, media: &MediaUrls) -> String {
    match image {
        Some(image) => format!(
            r#"<img src="{}" height="{THUMBNAIL_HEIGHT}" />"#,
            html_escape(&media.url(&image.file))
        ),
        None => "-".to_string(),
    }
}

/// One option of the image picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageChoice {
    pub value: i64,
    pub label: String,
    pub thumbnail_url: String,
}

impl ImageChoice {
    /// Label falls back to the file name when the image has no alt text.
    pub fn new(image: &Image, media: &MediaUrls) -> Self {
        let label = if image.alt_text.trim().is_empty() {
            image
                .file
                .rsplit('/')
                .next()
                .unwrap_or(image.file.as_str())
                .to_string()
        } else {
            image.alt_text.clone()
        };

        Self {
            value: image.id,
            label,
            thumbnail_url: media.url(&image.file),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(file: &str, alt_text: &str) -> Image {
        Image {
            id: 4,
            file: file.to_string(),
            alt_text: alt_text.to_string(),
        }
    }

    #[test]
    fn thumbnail_fragment() {
        let media = MediaUrls::new("/media/");
        assert_eq!(
            image_display(Some(&image("covers/a.jpg", "")), &media),
            r#"<img src="/media/covers/a.jpg" height="50" />"#
        );
        assert_eq!(image_display(None, &media), "-");
    }

    #[test]
    fn thumbnail_escapes_url() {
        let media = MediaUrls::new("/media/");
        let html = image_display(Some(&image(r#"a"onload="x.jpg"#, "")), &media);
        assert!(html.contains("&quot;onload=&quot;"));
        assert!(!html.contains(r#""onload=""#));
    }

    #[test]
    fn choice_label_falls_back_to_file_name() {
        let media = MediaUrls::new("/media/");
        let choice = ImageChoice::new(&image("covers/shoe.jpg", "  "), &media);
        assert_eq!(choice.label, "shoe.jpg");
        assert_eq!(choice.value, 4);
        assert_eq!(choice.thumbnail_url, "/media/covers/shoe.jpg");

        let labelled = ImageChoice::new(&image("covers/shoe.jpg", "Red shoe"), &media);
        assert_eq!(labelled.label, "Red shoe");
    }
}
