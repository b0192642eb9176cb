//! Article category model and DTOs.

use linkumkm_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `article_categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ArticleCategory {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Article category plus the number of articles in it.
///
/// `published_count` only counts `PUBLISHED` articles and is what public
/// listings show.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ArticleCategoryWithCount {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub article_count: i64,
    pub published_count: i64,
}

/// Request body for `POST /admin/article-categories`. The slug is derived
/// from the name when omitted.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateArticleCategory {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    #[validate(custom(function = "linkumkm_core::slug::article_slug_rule"))]
    pub slug: Option<String>,
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateArticleCategory {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,
    #[validate(custom(function = "linkumkm_core::slug::article_slug_rule"))]
    pub slug: Option<String>,
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
}
