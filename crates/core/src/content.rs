//! Scanning of article HTML for embedded image references.

use std::sync::LazyLock;

use regex::Regex;

/// `<img ... src=...>` with double-quoted, single-quoted or bare values.
const IMG_SRC_PATTERN: &str =
    r#"(?i)<img\b[^>]*?\ssrc\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#;

static IMG_SRC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(IMG_SRC_PATTERN).expect("valid regex"));

/// Every `src` value of every `<img>` tag in `html`, in document order.
pub fn extract_image_sources(html: &str) -> Vec<String> {
    IMG_SRC_RE
        .captures_iter(html)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)))
        .map(|m| m.as_str().trim().to_string())
        .filter(|src| !src.is_empty())
        .collect()
}
