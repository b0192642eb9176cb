pub mod admin_users;
pub mod article_categories;
pub mod articles;
pub mod auth;
pub mod categories;
pub mod linktree;
pub mod links;
pub mod public;
pub mod stats;
pub mod uploads;

use linkumkm_core::slug::{generate_slug, truncate_slug};

/// How many `-2`, `-3`, ... suffixes are tried before giving up on a generated slug.
pub(crate) const MAX_SLUG_ATTEMPTS: u32 = 50;

/// Slug derived from free text, bounded to leave room for a numeric suffix.
pub(crate) fn slug_base(text: &str, max: usize, fallback: &str) -> String {
    let slug = truncate_slug(&generate_slug(text), max.saturating_sub(4));
    if slug.is_empty() {
        fallback.to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_base_from_title() {
        assert_eq!(slug_base("Tips Jualan Online!", 200, "artikel"), "tips-jualan-online");
        assert_eq!(slug_base("???", 200, "artikel"), "artikel");
        assert!(slug_base(&"kata ".repeat(100), 200, "artikel").len() <= 196);
    }
}
