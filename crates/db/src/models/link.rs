//! DetailLinktree (link entry) model and DTOs.

use linkumkm_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `detail_linktrees` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Link {
    pub id: DbId,
    pub linktree_id: DbId,
    pub category_id: Option<DbId>,
    pub title: String,
    pub url: String,
    pub sort_order: i32,
    pub is_visible: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Link joined with its category and click total, for owner dashboards and
/// the public profile.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LinkWithCategory {
    pub id: DbId,
    pub linktree_id: DbId,
    pub category_id: Option<DbId>,
    pub category_name: Option<String>,
    pub category_icon: Option<String>,
    pub title: String,
    pub url: String,
    pub sort_order: i32,
    pub is_visible: bool,
    pub click_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for `POST /links`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLink {
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: String,
    #[validate(custom(function = "linkumkm_core::links::link_url_rule"))]
    pub url: String,
    pub category_id: Option<DbId>,
    pub is_visible: Option<bool>,
}

/// Request body for `PUT /links/{id}`. Only non-`None` fields are applied;
/// `clear_category` removes the category.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateLink {
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: Option<String>,
    #[validate(custom(function = "linkumkm_core::links::link_url_rule"))]
    pub url: Option<String>,
    pub category_id: Option<DbId>,
    #[serde(default)]
    pub clear_category: bool,
    pub is_visible: Option<bool>,
}

/// Request body for `PATCH /links/{id}/visibility`.
#[derive(Debug, Clone, Deserialize)]
pub struct SetVisibility {
    pub is_visible: bool,
}

/// Request body for `PUT /links/reorder`: every link id in the new order.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReorderLinks {
    #[validate(length(max = 500, message = "Too many links"))]
    pub ids: Vec<DbId>,
}
