//! Image URL handling for card metadata.
//!
//! Card records carry a free-text image field that may embed a URL. The
//! rendered draw text must not contain such URLs when it is retained for a
//! later interpretation request.

use regex::Regex;
use std::sync::OnceLock;

static EXTRACT_PATTERN: OnceLock<Regex> = OnceLock::new();
static STRIP_PATTERN: OnceLock<Regex> = OnceLock::new();

/// An http(s) URL ending in a known image extension, bounded by whitespace
/// or end of string. The first capture group is the URL itself.
#[expect(
    clippy::expect_used,
    reason = "Static regex pattern validated at compile time"
)]
fn extract_pattern() -> &'static Regex {
    EXTRACT_PATTERN.get_or_init(|| {
        Regex::new(r"(?i)(https?://\S+?\.(?:png|jpe?g|gif|bmp|webp|svg|tiff|ico))(?:\s|$)")
            .expect("Static regex pattern is guaranteed to be valid")
    })
}

#[expect(
    clippy::expect_used,
    reason = "Static regex pattern validated at compile time"
)]
fn strip_pattern() -> &'static Regex {
    STRIP_PATTERN.get_or_init(|| {
        Regex::new(r"(?i)https?://\S+\.(?:png|jpe?g|gif|bmp|webp|svg|tiff|ico)(?:\s|$)")
            .expect("Static regex pattern is guaranteed to be valid")
    })
}

/// Extract the first embedded image URL from free text.
#[must_use]
pub fn extract_image_url(text: &str) -> Option<String> {
    let url = extract_pattern()
        .captures(text)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string());
    tracing::debug!("Extracted image URL: {url:?}");
    url
}

/// Remove every embedded image URL, together with its trailing separator,
/// from text.
#[must_use]
pub fn strip_image_urls(text: &str) -> String {
    strip_pattern().replace_all(text, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_url_from_prose() {
        let text = "...see https://example.com/a/card.png please";
        assert_eq!(
            extract_image_url(text),
            Some("https://example.com/a/card.png".to_string())
        );
    }

    #[test]
    fn extraction_is_case_insensitive() {
        let text = "图片 HTTPS://CDN.EXAMPLE.COM/Fool.JPG";
        assert_eq!(
            extract_image_url(text),
            Some("HTTPS://CDN.EXAMPLE.COM/Fool.JPG".to_string())
        );
    }

    #[test]
    fn no_url_yields_none() {
        assert_eq!(extract_image_url("愚者，代表新的开始"), None);
        assert_eq!(extract_image_url("see https://example.com/page.html"), None);
    }

    #[test]
    fn url_at_end_of_string_matches() {
        let text = "card: https://example.com/x.webp";
        assert_eq!(
            extract_image_url(text),
            Some("https://example.com/x.webp".to_string())
        );
    }

    #[test]
    fn strips_urls_from_rendered_text() {
        let text = "1. 过去：愚者（正位）\n   https://example.com/a/card.png 含义：新的开始\n";
        let cleaned = strip_image_urls(text);
        assert!(!cleaned.contains("https://example.com/a/card.png"));
        assert!(cleaned.contains("愚者"));
        assert!(cleaned.contains("含义：新的开始"));
    }

    #[test]
    fn strip_without_urls_is_identity() {
        let text = "🃏 抽到了 愚者（正位）\n含义：新的开始\n";
        assert_eq!(strip_image_urls(text), text);
    }
}
