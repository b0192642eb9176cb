//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod analytics_repo;
pub mod article_category_repo;
pub mod article_repo;
pub mod category_repo;
pub mod link_repo;
pub mod linktree_repo;
pub mod upload_reference_repo;
pub mod user_repo;

pub use analytics_repo::AnalyticsRepo;
pub use article_category_repo::ArticleCategoryRepo;
pub use article_repo::ArticleRepo;
pub use category_repo::CategoryRepo;
pub use link_repo::LinkRepo;
pub use linktree_repo::LinktreeRepo;
pub use upload_reference_repo::{UploadReferenceRepo, UploadReferences};
pub use user_repo::UserRepo;

/// `%term%` pattern for `ILIKE` filters, or `None` for a blank term.
pub(crate) fn like_pattern(term: Option<&str>) -> Option<String> {
    let term = term?.trim();
    if term.is_empty() {
        return None;
    }
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    Some(format!("%{escaped}%"))
}
