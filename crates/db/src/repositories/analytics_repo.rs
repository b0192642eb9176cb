//! Repository for the view/click tracking tables and aggregate statistics.

use linkumkm_core::types::DbId;
use sqlx::PgPool;

use super::{ArticleRepo, LinkRepo, LinktreeRepo, UserRepo};
use crate::models::analytics::{
    DailyCount, LinkClickCount, LinktreeStats, PlatformStats, TopArticle, TopLink,
    TrackingContext,
};

/// Longest window accepted for daily series.
pub const MAX_STATS_DAYS: i32 = 90;

/// Provides event recording and read-side aggregation.
pub struct AnalyticsRepo;

impl AnalyticsRepo {
    pub async fn record_linktree_view(
        pool: &PgPool,
        linktree_id: DbId,
        ctx: &TrackingContext,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO linktree_views (linktree_id, ip_hash, user_agent, referrer) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(linktree_id)
        .bind(&ctx.ip_hash)
        .bind(&ctx.user_agent)
        .bind(&ctx.referrer)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn record_link_click(
        pool: &PgPool,
        link_id: DbId,
        ctx: &TrackingContext,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO link_clicks (detail_linktree_id, ip_hash, user_agent, referrer) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(link_id)
        .bind(&ctx.ip_hash)
        .bind(&ctx.user_agent)
        .bind(&ctx.referrer)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Record an article view and bump the article's counter in one transaction.
    pub async fn record_article_view(
        pool: &PgPool,
        article_id: DbId,
        ctx: &TrackingContext,
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query(
            "INSERT INTO article_views (article_id, ip_hash, user_agent, referrer) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(article_id)
        .bind(&ctx.ip_hash)
        .bind(&ctx.user_agent)
        .bind(&ctx.referrer)
        .execute(&mut *tx)
        .await?;
        sqlx::query("UPDATE articles SET view_count = view_count + 1 WHERE id = $1")
            .bind(article_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await
    }

    /// Totals, per-link click counts and `days`-long daily series for one linktree.
    pub async fn linktree_stats(
        pool: &PgPool,
        linktree_id: DbId,
        days: i32,
    ) -> Result<LinktreeStats, sqlx::Error> {
        let days = days.clamp(1, MAX_STATS_DAYS);

        let total_views = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM linktree_views WHERE linktree_id = $1",
        )
        .bind(linktree_id)
        .fetch_one(pool)
        .await?;

        let links = sqlx::query_as::<_, LinkClickCount>(
            "SELECT d.id AS link_id, d.title, d.url, d.is_visible, COUNT(k.id) AS click_count \
             FROM detail_linktrees d \
             LEFT JOIN link_clicks k ON k.detail_linktree_id = d.id \
             WHERE d.linktree_id = $1 \
             GROUP BY d.id \
             ORDER BY d.sort_order, d.id",
        )
        .bind(linktree_id)
        .fetch_all(pool)
        .await?;
        let total_clicks = links.iter().map(|l| l.click_count).sum();

        let daily_views = sqlx::query_as::<_, DailyCount>(
            "SELECT s.day::DATE AS day, COUNT(v.id) AS count \
             FROM generate_series((CURRENT_DATE - ($2::INT - 1))::TIMESTAMP, CURRENT_DATE::TIMESTAMP, INTERVAL '1 day') AS s(day) \
             LEFT JOIN linktree_views v \
                    ON v.linktree_id = $1 AND v.created_at::DATE = s.day::DATE \
             GROUP BY s.day \
             ORDER BY s.day",
        )
        .bind(linktree_id)
        .bind(days)
        .fetch_all(pool)
        .await?;

        let daily_clicks = sqlx::query_as::<_, DailyCount>(
            "SELECT s.day::DATE AS day, COUNT(k.id) AS count \
             FROM generate_series((CURRENT_DATE - ($2::INT - 1))::TIMESTAMP, CURRENT_DATE::TIMESTAMP, INTERVAL '1 day') AS s(day) \
             LEFT JOIN ( \
                 SELECT c.id, c.created_at FROM link_clicks c \
                 JOIN detail_linktrees d ON d.id = c.detail_linktree_id \
                 WHERE d.linktree_id = $1 \
             ) k ON k.created_at::DATE = s.day::DATE \
             GROUP BY s.day \
             ORDER BY s.day",
        )
        .bind(linktree_id)
        .bind(days)
        .fetch_all(pool)
        .await?;

        Ok(LinktreeStats {
            linktree_id,
            total_views,
            total_clicks,
            links,
            daily_views,
            daily_clicks,
        })
    }

    /// Platform-wide counts and the `top_n` most clicked links and most viewed articles.
    pub async fn platform_stats(pool: &PgPool, top_n: i64) -> Result<PlatformStats, sqlx::Error> {
        let top_n = top_n.clamp(1, 50);

        let users = UserRepo::count_all(pool).await?;
        let linktrees = LinktreeRepo::count(pool).await?;
        let links = LinkRepo::count(pool).await?;
        let articles = ArticleRepo::count_by_status(pool).await?;

        let linktree_views = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM linktree_views")
            .fetch_one(pool)
            .await?;
        let link_clicks = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM link_clicks")
            .fetch_one(pool)
            .await?;
        let article_views = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM article_views")
            .fetch_one(pool)
            .await?;

        let top_links = sqlx::query_as::<_, TopLink>(
            "SELECT d.id AS link_id, d.title, d.url, l.slug AS linktree_slug, \
                    COUNT(k.id) AS click_count \
             FROM detail_linktrees d \
             JOIN linktrees l ON l.id = d.linktree_id \
             JOIN link_clicks k ON k.detail_linktree_id = d.id \
             GROUP BY d.id, l.slug \
             ORDER BY click_count DESC, d.id \
             LIMIT $1",
        )
        .bind(top_n)
        .fetch_all(pool)
        .await?;

        let top_articles = sqlx::query_as::<_, TopArticle>(
            "SELECT id, title, slug, view_count FROM articles \
             WHERE status = 'PUBLISHED' \
             ORDER BY view_count DESC, id \
             LIMIT $1",
        )
        .bind(top_n)
        .fetch_all(pool)
        .await?;

        Ok(PlatformStats {
            users,
            linktrees,
            links,
            articles,
            linktree_views,
            link_clicks,
            article_views,
            top_links,
            top_articles,
        })
    }
}
