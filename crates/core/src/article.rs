//! Article status lifecycle, tag normalization, and excerpt derivation.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

pub const MAX_TAGS: usize = 10;
pub const MAX_TAG_LENGTH: usize = 30;
pub const DEFAULT_EXCERPT_CHARS: usize = 200;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

/// Publication state of an article. Stored as upper-case text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ArticleStatus {
    Draft,
    Published,
    Archived,
}

impl ArticleStatus {
    pub const ALL: [ArticleStatus; 3] = [Self::Draft, Self::Published, Self::Archived];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Published => "PUBLISHED",
            Self::Archived => "ARCHIVED",
        }
    }
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArticleStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid article status '{s}'. Valid statuses: DRAFT, PUBLISHED, ARCHIVED"
                ))
            })
    }
}

/// `published_at` is stamped the first time an article is published and kept
/// through later archive/unarchive cycles.
pub fn resolve_published_at(
    current: Option<Timestamp>,
    status: ArticleStatus,
    now: Timestamp,
) -> Option<Timestamp> {
    match (current, status) {
        (None, ArticleStatus::Published) => Some(now),
        (current, _) => current,
    }
}

/// Trim, lowercase and de-duplicate tags, preserving first-seen order.
pub fn normalize_tags(tags: &[String]) -> Result<Vec<String>, CoreError> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let normalized = tag.trim().to_lowercase();
        if normalized.is_empty() {
            continue;
        }
        if normalized.chars().count() > MAX_TAG_LENGTH {
            return Err(CoreError::Validation(format!(
                "Each tag must be at most {MAX_TAG_LENGTH} characters"
            )));
        }
        if !out.contains(&normalized) {
            out.push(normalized);
        }
    }
    if out.len() > MAX_TAGS {
        return Err(CoreError::Validation(format!(
            "A maximum of {MAX_TAGS} tags is allowed"
        )));
    }
    Ok(out)
}

/// Plain-text excerpt of HTML content, cut on a char boundary.
pub fn excerpt_from_html(html: &str, max_chars: usize) -> String {
    let text = TAG_RE.replace_all(html, " ");
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }
    let cut: String = collapsed.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}
