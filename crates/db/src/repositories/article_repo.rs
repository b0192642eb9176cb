//! Repository for the `articles` table.

use linkumkm_core::article::ArticleStatus;
use linkumkm_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use super::like_pattern;
use crate::models::article::{
    Article, ArticleDetail, ArticleListParams, ArticleStatusCounts, ArticleSummary,
    CreateArticle, PublishedArticleParams, UpdateArticle,
};
use crate::{clamp_limit, clamp_offset};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, slug, excerpt, content, featured_image, status, tags, \
                       view_count, category_id, author_id, published_at, created_at, updated_at";

const DETAIL_SELECT: &str = "\
    SELECT a.id, a.title, a.slug, a.excerpt, a.content, a.featured_image, a.status, a.tags, \
           a.view_count, a.category_id, c.name AS category_name, c.slug AS category_slug, \
           a.author_id, u.name AS author_name, a.published_at, a.created_at, a.updated_at \
    FROM articles a \
    LEFT JOIN article_categories c ON c.id = a.category_id \
    JOIN users u ON u.id = a.author_id";

const SUMMARY_SELECT: &str = "\
    SELECT a.id, a.title, a.slug, a.excerpt, a.featured_image, a.status, a.tags, \
           a.view_count, a.category_id, c.name AS category_name, c.slug AS category_slug, \
           a.author_id, u.name AS author_name, a.published_at, a.created_at, a.updated_at \
    FROM articles a \
    LEFT JOIN article_categories c ON c.id = a.category_id \
    JOIN users u ON u.id = a.author_id";

const ADMIN_FILTER: &str = "\
    WHERE ($1::TEXT IS NULL OR a.status = $1) \
      AND ($2::BIGINT IS NULL OR a.category_id = $2) \
      AND ($3::BIGINT IS NULL OR a.author_id = $3) \
      AND ($4::TEXT IS NULL OR a.title ILIKE $4 OR a.excerpt ILIKE $4)";

const PUBLISHED_FILTER: &str = "\
    WHERE a.status = 'PUBLISHED' \
      AND ($1::TEXT IS NULL OR c.slug = $1) \
      AND ($2::TEXT IS NULL OR $2 = ANY(a.tags)) \
      AND ($3::TEXT IS NULL OR a.title ILIKE $3 OR a.excerpt ILIKE $3)";

const DEFAULT_LIMIT: i64 = 10;
const MAX_LIMIT: i64 = 50;

/// Provides CRUD, listing and lifecycle operations for articles.
pub struct ArticleRepo;

impl ArticleRepo {
    /// Insert a new article.
    pub async fn create(pool: &PgPool, input: &CreateArticle) -> Result<Article, sqlx::Error> {
        let query = format!(
            "INSERT INTO articles
                (title, slug, excerpt, content, featured_image, status, tags,
                 category_id, author_id, published_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Article>(&query)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.excerpt)
            .bind(&input.content)
            .bind(&input.featured_image)
            .bind(input.status.as_str())
            .bind(&input.tags)
            .bind(input.category_id)
            .bind(input.author_id)
            .bind(input.published_at)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Article>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM articles WHERE id = $1");
        sqlx::query_as::<_, Article>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// An article of any status with its category and author names.
    pub async fn find_detail(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ArticleDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE a.id = $1");
        sqlx::query_as::<_, ArticleDetail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A published article by slug. Drafts and archived articles are invisible.
    pub async fn find_published_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<ArticleDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE a.slug = $1 AND a.status = 'PUBLISHED'");
        sqlx::query_as::<_, ArticleDetail>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Whether `slug` is used by an article other than `exclude_id`.
    pub async fn slug_exists(
        pool: &PgPool,
        slug: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM articles WHERE slug = $1 AND ($2::BIGINT IS NULL OR id <> $2))",
        )
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(pool)
        .await
    }

    /// Admin listing across every status, most recently edited first.
    pub async fn list(
        pool: &PgPool,
        params: &ArticleListParams,
    ) -> Result<Vec<ArticleSummary>, sqlx::Error> {
        let limit = clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT);
        let offset = clamp_offset(params.offset);
        let query = format!(
            "{SUMMARY_SELECT} {ADMIN_FILTER} ORDER BY a.updated_at DESC, a.id DESC LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, ArticleSummary>(&query)
            .bind(params.status.map(ArticleStatus::as_str))
            .bind(params.category_id)
            .bind(params.author_id)
            .bind(like_pattern(params.search.as_deref()))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, params: &ArticleListParams) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM articles a {ADMIN_FILTER}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(params.status.map(ArticleStatus::as_str))
            .bind(params.category_id)
            .bind(params.author_id)
            .bind(like_pattern(params.search.as_deref()))
            .fetch_one(pool)
            .await
    }

    /// Public listing of published articles, newest publication first.
    pub async fn list_published(
        pool: &PgPool,
        params: &PublishedArticleParams,
    ) -> Result<Vec<ArticleSummary>, sqlx::Error> {
        let limit = clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT);
        let offset = clamp_offset(params.offset);
        let query = format!(
            "{SUMMARY_SELECT} {PUBLISHED_FILTER} \
             ORDER BY a.published_at DESC NULLS LAST, a.id DESC LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, ArticleSummary>(&query)
            .bind(params.category.as_deref())
            .bind(params.tag.as_deref().map(|t| t.trim().to_lowercase()))
            .bind(like_pattern(params.search.as_deref()))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_published(
        pool: &PgPool,
        params: &PublishedArticleParams,
    ) -> Result<i64, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*) FROM articles a \
             LEFT JOIN article_categories c ON c.id = a.category_id {PUBLISHED_FILTER}"
        );
        sqlx::query_scalar::<_, i64>(&query)
            .bind(params.category.as_deref())
            .bind(params.tag.as_deref().map(|t| t.trim().to_lowercase()))
            .bind(like_pattern(params.search.as_deref()))
            .fetch_one(pool)
            .await
    }

    /// Update an article. Only non-`None` fields in `input` are applied;
    /// the `clear_*` flags null their column.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateArticle,
    ) -> Result<Option<Article>, sqlx::Error> {
        let query = format!(
            "UPDATE articles SET
                title = COALESCE($2, title),
                slug = COALESCE($3, slug),
                excerpt = COALESCE($4, excerpt),
                content = COALESCE($5, content),
                featured_image = CASE WHEN $7 THEN NULL ELSE COALESCE($6, featured_image) END,
                status = COALESCE($8, status),
                tags = COALESCE($9, tags),
                category_id = CASE WHEN $11 THEN NULL ELSE COALESCE($10, category_id) END,
                published_at = COALESCE($12, published_at)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Article>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.excerpt)
            .bind(&input.content)
            .bind(&input.featured_image)
            .bind(input.clear_featured_image)
            .bind(input.status.map(ArticleStatus::as_str))
            .bind(&input.tags)
            .bind(input.category_id)
            .bind(input.clear_category)
            .bind(input.published_at)
            .fetch_optional(pool)
            .await
    }

    /// Move an article to `status`, stamping `published_at` when given.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: ArticleStatus,
        published_at: Option<Timestamp>,
    ) -> Result<Option<Article>, sqlx::Error> {
        let query = format!(
            "UPDATE articles SET status = $2, published_at = COALESCE($3, published_at)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Article>(&query)
            .bind(id)
            .bind(status.as_str())
            .bind(published_at)
            .fetch_optional(pool)
            .await
    }

    /// Bump the denormalized view counter.
    pub async fn increment_view_count(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE articles SET view_count = view_count + 1 WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of articles in each status.
    pub async fn count_by_status(pool: &PgPool) -> Result<ArticleStatusCounts, sqlx::Error> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM articles GROUP BY status")
                .fetch_all(pool)
                .await?;

        let mut counts = ArticleStatusCounts::default();
        for (status, count) in rows {
            match status.parse::<ArticleStatus>() {
                Ok(ArticleStatus::Draft) => counts.draft = count,
                Ok(ArticleStatus::Published) => counts.published = count,
                Ok(ArticleStatus::Archived) => counts.archived = count,
                Err(_) => {}
            }
        }
        Ok(counts)
    }
}
