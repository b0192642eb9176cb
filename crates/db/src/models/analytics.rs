//! View/click tracking inputs and analytics read models.

use chrono::NaiveDate;
use linkumkm_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// Request metadata stored with every view or click.
#[derive(Debug, Clone, Default)]
pub struct TrackingContext {
    /// SHA-256 of the client address.
    pub ip_hash: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
}

/// Click total for one link.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LinkClickCount {
    pub link_id: DbId,
    pub title: String,
    pub url: String,
    pub is_visible: bool,
    pub click_count: i64,
}

/// Event count for one UTC day.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DailyCount {
    pub day: NaiveDate,
    pub count: i64,
}

/// Analytics for a single linktree (owner dashboard).
#[derive(Debug, Clone, Serialize)]
pub struct LinktreeStats {
    pub linktree_id: DbId,
    pub total_views: i64,
    pub total_clicks: i64,
    pub links: Vec<LinkClickCount>,
    pub daily_views: Vec<DailyCount>,
    pub daily_clicks: Vec<DailyCount>,
}

/// A most-clicked link across the platform.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TopLink {
    pub link_id: DbId,
    pub title: String,
    pub url: String,
    pub linktree_slug: String,
    pub click_count: i64,
}

/// A most-viewed article across the platform.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TopArticle {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub view_count: i64,
}

/// Platform-wide totals for the admin dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct PlatformStats {
    pub users: i64,
    pub linktrees: i64,
    pub links: i64,
    pub articles: super::article::ArticleStatusCounts,
    pub linktree_views: i64,
    pub link_clicks: i64,
    pub article_views: i64,
    pub top_links: Vec<TopLink>,
    pub top_articles: Vec<TopArticle>,
}
