//! Repository for the `article_categories` table.

use linkumkm_core::types::DbId;
use sqlx::PgPool;

use crate::models::article_category::{
    ArticleCategory, ArticleCategoryWithCount, UpdateArticleCategory,
};

const COLUMNS: &str = "id, name, slug, description, created_at, updated_at";

/// Provides CRUD operations for article categories.
pub struct ArticleCategoryRepo;

impl ArticleCategoryRepo {
    /// Insert a category with an already-resolved slug.
    pub async fn create(
        pool: &PgPool,
        name: &str,
        slug: &str,
        description: Option<&str>,
    ) -> Result<ArticleCategory, sqlx::Error> {
        let query = format!(
            "INSERT INTO article_categories (name, slug, description)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ArticleCategory>(&query)
            .bind(name)
            .bind(slug)
            .bind(description)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ArticleCategory>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM article_categories WHERE id = $1");
        sqlx::query_as::<_, ArticleCategory>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether `slug` is used by a category other than `exclude_id`.
    pub async fn slug_exists(
        pool: &PgPool,
        slug: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM article_categories \
             WHERE slug = $1 AND ($2::BIGINT IS NULL OR id <> $2))",
        )
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(pool)
        .await
    }

    /// All categories ordered by name, with total and published article counts.
    pub async fn list_with_counts(
        pool: &PgPool,
    ) -> Result<Vec<ArticleCategoryWithCount>, sqlx::Error> {
        sqlx::query_as::<_, ArticleCategoryWithCount>(
            "SELECT c.id, c.name, c.slug, c.description, \
                    COUNT(a.id) AS article_count, \
                    COUNT(a.id) FILTER (WHERE a.status = 'PUBLISHED') AS published_count \
             FROM article_categories c \
             LEFT JOIN articles a ON a.category_id = c.id \
             GROUP BY c.id \
             ORDER BY c.name",
        )
        .fetch_all(pool)
        .await
    }

    /// Update a category. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateArticleCategory,
    ) -> Result<Option<ArticleCategory>, sqlx::Error> {
        let query = format!(
            "UPDATE article_categories SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ArticleCategory>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.slug)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Delete a category. Its articles become uncategorized.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM article_categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
