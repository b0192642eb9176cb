//! Link entry rules: outbound URL validation and drag-and-drop reordering.

use std::borrow::Cow;
use std::collections::HashSet;

use validator::ValidationError;

use crate::error::CoreError;
use crate::types::DbId;

pub const MAX_URL_LENGTH: usize = 2048;

/// Validate an outbound link target.
///
/// Only absolute `http`/`https` URLs with a plausible host are accepted, so
/// `javascript:` and `data:` targets never reach a public profile.
pub fn validate_link_url(url: &str) -> Result<(), CoreError> {
    if url.len() > MAX_URL_LENGTH {
        return Err(CoreError::Validation(format!(
            "URL must be at most {MAX_URL_LENGTH} characters"
        )));
    }
    if url.chars().any(char::is_whitespace) {
        return Err(CoreError::Validation("URL must not contain whitespace".into()));
    }

    let lower = url.to_ascii_lowercase();
    let rest = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"))
        .ok_or_else(|| CoreError::Validation("URL must start with http:// or https://".into()))?;

    let authority = rest.split(['/', '?', '#']).next().unwrap_or("");
    let host_port = authority.rsplit('@').next().unwrap_or("");
    let host = host_port.split(':').next().unwrap_or("");

    let plausible = host == "localhost"
        || (host.contains('.')
            && !host.starts_with('.')
            && !host.ends_with('.')
            && host
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.'));
    if !plausible {
        return Err(CoreError::Validation(format!("Invalid URL host '{host}'")));
    }
    Ok(())
}

/// `validator` adapter for [`validate_link_url`].
pub fn link_url_rule(url: &str) -> Result<(), ValidationError> {
    validate_link_url(url).map_err(|e| {
        let message = match e {
            CoreError::Validation(msg) => msg,
            other => other.to_string(),
        };
        ValidationError::new("url").with_message(Cow::Owned(message))
    })
}

/// Check that `submitted` is a permutation of the linktree's `existing` link ids.
///
/// A partial list would leave the remaining links with stale sort orders, so
/// every link must appear exactly once.
pub fn validate_reorder(existing: &[DbId], submitted: &[DbId]) -> Result<(), CoreError> {
    if submitted.len() != existing.len() {
        return Err(CoreError::Validation(format!(
            "Expected {} link ids, got {}",
            existing.len(),
            submitted.len()
        )));
    }

    let known: HashSet<DbId> = existing.iter().copied().collect();
    let mut seen = HashSet::with_capacity(submitted.len());
    for id in submitted {
        if !known.contains(id) {
            return Err(CoreError::Validation(format!(
                "Link {id} does not belong to this linktree"
            )));
        }
        if !seen.insert(*id) {
            return Err(CoreError::Validation(format!("Link {id} appears more than once")));
        }
    }
    Ok(())
}

/// Pair each id with its zero-based position, which becomes its `sort_order`.
pub fn sort_orders(ids: &[DbId]) -> Vec<(DbId, i32)> {
    ids.iter()
        .enumerate()
        .map(|(index, id)| (*id, index as i32))
        .collect()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn accepts_http_and_https() {
        assert!(validate_link_url("https://wa.me/628123456789").is_ok());
        assert!(validate_link_url("http://tokopedia.com/toko-bu-sri?ref=bio").is_ok());
        assert!(validate_link_url("https://shopee.co.id:443/shop").is_ok());
        assert!(validate_link_url("http://localhost:3000/x").is_ok());
    }

    #[test]
    fn rejects_other_schemes() {
        assert_matches!(validate_link_url("javascript:alert(1)"), Err(CoreError::Validation(_)));
        assert_matches!(validate_link_url("ftp://example.com"), Err(CoreError::Validation(_)));
        assert_matches!(validate_link_url("example.com"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn rejects_bad_hosts() {
        assert_matches!(validate_link_url("https://"), Err(CoreError::Validation(_)));
        assert_matches!(validate_link_url("https://nodot"), Err(CoreError::Validation(_)));
        assert_matches!(validate_link_url("https://exa mple.com"), Err(CoreError::Validation(_)));
        assert_matches!(validate_link_url("https://.com"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn reorder_requires_permutation() {
        let existing = [10, 11, 12];
        assert!(validate_reorder(&existing, &[12, 10, 11]).is_ok());
        assert_matches!(validate_reorder(&existing, &[12, 10]), Err(CoreError::Validation(_)));
        assert_matches!(validate_reorder(&existing, &[12, 12, 10]), Err(CoreError::Validation(_)));
        assert_matches!(validate_reorder(&existing, &[12, 10, 99]), Err(CoreError::Validation(_)));
    }

    #[test]
    fn sort_orders_follow_submission() {
        assert_eq!(sort_orders(&[7, 3, 5]), vec![(7, 0), (3, 1), (5, 2)]);
        assert!(sort_orders(&[]).is_empty());
    }
}
