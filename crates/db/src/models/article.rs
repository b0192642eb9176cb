//! Article (CMS) model and DTOs.

use linkumkm_core::article::ArticleStatus;
use linkumkm_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

pub const MAX_CONTENT_LENGTH: u64 = 200_000;

/// A row from the `articles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Article {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    /// Sanitized HTML produced by the rich-text editor.
    pub content: String,
    pub featured_image: Option<String>,
    /// `DRAFT`, `PUBLISHED` or `ARCHIVED`.
    pub status: String,
    pub tags: Vec<String>,
    pub view_count: i64,
    pub category_id: Option<DbId>,
    pub author_id: DbId,
    pub published_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Article with its category and author resolved, for detail views.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ArticleDetail {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub featured_image: Option<String>,
    pub status: String,
    pub tags: Vec<String>,
    pub view_count: i64,
    pub category_id: Option<DbId>,
    pub category_name: Option<String>,
    pub category_slug: Option<String>,
    pub author_id: DbId,
    pub author_name: String,
    pub published_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Listing row without the (potentially large) content body.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ArticleSummary {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub status: String,
    pub tags: Vec<String>,
    pub view_count: i64,
    pub category_id: Option<DbId>,
    pub category_name: Option<String>,
    pub category_slug: Option<String>,
    pub author_id: DbId,
    pub author_name: String,
    pub published_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for `POST /admin/articles`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateArticleRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    /// Derived from the title when omitted.
    #[validate(custom(function = "linkumkm_core::slug::article_slug_rule"))]
    pub slug: Option<String>,
    #[validate(length(max = 500, message = "Excerpt must be at most 500 characters"))]
    pub excerpt: Option<String>,
    #[serde(default)]
    #[validate(length(max = 200_000, message = "Content is too long"))]
    pub content: String,
    #[validate(length(max = 2048, message = "Image path is too long"))]
    pub featured_image: Option<String>,
    pub status: Option<ArticleStatus>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub category_id: Option<DbId>,
}

/// Request body for `PUT /admin/articles/{id}`. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateArticleRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    #[validate(custom(function = "linkumkm_core::slug::article_slug_rule"))]
    pub slug: Option<String>,
    #[validate(length(max = 500, message = "Excerpt must be at most 500 characters"))]
    pub excerpt: Option<String>,
    #[validate(length(max = 200_000, message = "Content is too long"))]
    pub content: Option<String>,
    #[validate(length(max = 2048, message = "Image path is too long"))]
    pub featured_image: Option<String>,
    #[serde(default)]
    pub clear_featured_image: bool,
    pub status: Option<ArticleStatus>,
    pub tags: Option<Vec<String>>,
    pub category_id: Option<DbId>,
    #[serde(default)]
    pub clear_category: bool,
}

/// Request body for `PATCH /admin/articles/{id}/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct SetArticleStatus {
    pub status: ArticleStatus,
}

/// Resolved insert DTO: slug chosen, tags normalized, author from the session.
#[derive(Debug, Clone)]
pub struct CreateArticle {
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub featured_image: Option<String>,
    pub status: ArticleStatus,
    pub tags: Vec<String>,
    pub category_id: Option<DbId>,
    pub author_id: DbId,
    pub published_at: Option<Timestamp>,
}

/// Resolved update DTO. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdateArticle {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub featured_image: Option<String>,
    pub clear_featured_image: bool,
    pub status: Option<ArticleStatus>,
    pub tags: Option<Vec<String>>,
    pub category_id: Option<DbId>,
    pub clear_category: bool,
    pub published_at: Option<Timestamp>,
}

/// Query parameters for `GET /admin/articles`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleListParams {
    pub status: Option<ArticleStatus>,
    pub category_id: Option<DbId>,
    pub author_id: Option<DbId>,
    /// Case-insensitive match on title.
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for `GET /public/articles`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublishedArticleParams {
    /// Article category slug.
    pub category: Option<String>,
    pub tag: Option<String>,
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Article counts per status for the admin dashboard.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ArticleStatusCounts {
    pub draft: i64,
    pub published: i64,
    pub archived: i64,
}
