//! Linktree (public profile page) model and DTOs.

use linkumkm_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `linktrees` table. One per user.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Linktree {
    pub id: DbId,
    pub user_id: DbId,
    pub slug: String,
    pub title: String,
    pub bio: Option<String>,
    pub photo: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An active linktree joined with its owner's name, for the public profile.
#[derive(Debug, Clone, FromRow)]
pub struct LinktreeWithOwner {
    #[sqlx(flatten)]
    pub linktree: Linktree,
    pub owner_name: String,
}

/// Request body for `POST /linktree`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLinktree {
    #[validate(custom(function = "linkumkm_core::slug::linktree_slug_rule"))]
    pub slug: String,
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: String,
    #[validate(length(max = 500, message = "Bio must be at most 500 characters"))]
    pub bio: Option<String>,
}

/// Request body for `PUT /linktree`. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateLinktree {
    #[validate(custom(function = "linkumkm_core::slug::linktree_slug_rule"))]
    pub slug: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 500, message = "Bio must be at most 500 characters"))]
    pub bio: Option<String>,
    pub is_active: Option<bool>,
}

/// A visible link as shown on the public profile.
#[derive(Debug, Clone, Serialize)]
pub struct PublicLink {
    pub id: DbId,
    pub title: String,
    pub url: String,
    pub sort_order: i32,
}

/// Links of one category on the public profile. `category_id` is `None` for
/// uncategorized links.
#[derive(Debug, Clone, Serialize)]
pub struct LinkGroup {
    pub category_id: Option<DbId>,
    pub category_name: Option<String>,
    pub category_icon: Option<String>,
    pub links: Vec<PublicLink>,
}

/// Public profile payload for `GET /public/linktrees/{slug}`.
#[derive(Debug, Clone, Serialize)]
pub struct PublicLinktree {
    pub slug: String,
    pub title: String,
    pub bio: Option<String>,
    pub photo: Option<String>,
    pub owner_name: String,
    pub groups: Vec<LinkGroup>,
}
