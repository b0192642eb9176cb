//! Slug generation and validation for linktrees, articles and article categories.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use validator::ValidationError;

use crate::error::CoreError;

/// Lowercase alphanumeric words separated by single hyphens.
const SLUG_PATTERN: &str = r"^[a-z0-9]+(?:-[a-z0-9]+)*$";

static SLUG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(SLUG_PATTERN).expect("valid regex"));

pub const LINKTREE_SLUG_MIN: usize = 3;
pub const LINKTREE_SLUG_MAX: usize = 50;
pub const ARTICLE_SLUG_MAX: usize = 200;

/// Linktree slugs share the URL root with application pages, so these are taken.
pub const RESERVED_SLUGS: &[&str] = &[
    "admin",
    "api",
    "artikel",
    "articles",
    "auth",
    "dashboard",
    "login",
    "logout",
    "public",
    "register",
    "settings",
    "uploads",
];

/// Generate a URL-safe slug from free text.
///
/// Converts to lowercase, replaces anything that is not ASCII alphanumeric with
/// hyphens, collapses consecutive hyphens, and trims leading/trailing hyphens.
/// May return an empty string when the input has no usable characters.
pub fn generate_slug(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut prev_hyphen = true;
    for c in text.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c);
            prev_hyphen = false;
        } else if !prev_hyphen {
            result.push('-');
            prev_hyphen = true;
        }
    }
    result.trim_end_matches('-').to_string()
}

/// Truncate a generated slug to `max` characters without leaving a trailing hyphen.
pub fn truncate_slug(slug: &str, max: usize) -> String {
    if slug.len() <= max {
        return slug.to_string();
    }
    slug[..max].trim_end_matches('-').to_string()
}

/// The `n`-th candidate for a base slug: `base`, `base-2`, `base-3`, ...
pub fn with_suffix(base: &str, n: u32) -> String {
    if n <= 1 {
        base.to_string()
    } else {
        format!("{base}-{n}")
    }
}

/// Whether `slug` matches the hyphenated lowercase pattern.
pub fn is_well_formed(slug: &str) -> bool {
    SLUG_RE.is_match(slug)
}

/// Validate a linktree slug: pattern, 3–50 chars, not reserved.
pub fn validate_linktree_slug(slug: &str) -> Result<(), CoreError> {
    if slug.len() < LINKTREE_SLUG_MIN || slug.len() > LINKTREE_SLUG_MAX {
        return Err(CoreError::Validation(format!(
            "Slug must be between {LINKTREE_SLUG_MIN} and {LINKTREE_SLUG_MAX} characters"
        )));
    }
    if !is_well_formed(slug) {
        return Err(CoreError::Validation(
            "Slug may only contain lowercase letters, digits and single hyphens".into(),
        ));
    }
    if RESERVED_SLUGS.contains(&slug) {
        return Err(CoreError::Validation(format!("Slug '{slug}' is reserved")));
    }
    Ok(())
}

/// Validate an article or article-category slug: pattern, at most 200 chars.
pub fn validate_article_slug(slug: &str) -> Result<(), CoreError> {
    if slug.is_empty() || slug.len() > ARTICLE_SLUG_MAX {
        return Err(CoreError::Validation(format!(
            "Slug must be between 1 and {ARTICLE_SLUG_MAX} characters"
        )));
    }
    if !is_well_formed(slug) {
        return Err(CoreError::Validation(
            "Slug may only contain lowercase letters, digits and single hyphens".into(),
        ));
    }
    Ok(())
}

/// `validator` adapter for [`validate_linktree_slug`].
pub fn linktree_slug_rule(slug: &str) -> Result<(), ValidationError> {
    validate_linktree_slug(slug).map_err(|e| field_error("slug", e))
}

/// `validator` adapter for [`validate_article_slug`].
pub fn article_slug_rule(slug: &str) -> Result<(), ValidationError> {
    validate_article_slug(slug).map_err(|e| field_error("slug", e))
}

fn field_error(code: &'static str, err: CoreError) -> ValidationError {
    let message = match err {
        CoreError::Validation(msg) => msg,
        other => other.to_string(),
    };
    ValidationError::new(code).with_message(Cow::Owned(message))
}
