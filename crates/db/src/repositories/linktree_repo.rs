//! Repository for the `linktrees` table.

use linkumkm_core::types::DbId;
use sqlx::PgPool;

use crate::models::linktree::{CreateLinktree, Linktree, LinktreeWithOwner, UpdateLinktree};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, slug, title, bio, photo, is_active, created_at, updated_at";

/// Provides CRUD operations for linktrees. A user owns at most one.
pub struct LinktreeRepo;

impl LinktreeRepo {
    /// Insert a linktree for `user_id`.
    ///
    /// Fails with a unique violation on `uq_linktrees_user_id` if the user
    /// already has one, or on `uq_linktrees_slug` if the slug is taken.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateLinktree,
    ) -> Result<Linktree, sqlx::Error> {
        let query = format!(
            "INSERT INTO linktrees (user_id, slug, title, bio)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Linktree>(&query)
            .bind(user_id)
            .bind(&input.slug)
            .bind(&input.title)
            .bind(&input.bio)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Linktree>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM linktrees WHERE id = $1");
        sqlx::query_as::<_, Linktree>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The linktree owned by `user_id`, if any.
    pub async fn find_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<Linktree>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM linktrees WHERE user_id = $1");
        sqlx::query_as::<_, Linktree>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// An active linktree whose owner is also active, for public rendering.
    pub async fn find_public_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<LinktreeWithOwner>, sqlx::Error> {
        sqlx::query_as::<_, LinktreeWithOwner>(
            "SELECT l.id, l.user_id, l.slug, l.title, l.bio, l.photo, l.is_active, \
                    l.created_at, l.updated_at, u.name AS owner_name \
             FROM linktrees l \
             JOIN users u ON u.id = l.user_id \
             WHERE l.slug = $1 AND l.is_active AND u.is_active",
        )
        .bind(slug)
        .fetch_optional(pool)
        .await
    }

    /// Whether `slug` is used by a linktree other than `exclude_id`.
    pub async fn slug_exists(
        pool: &PgPool,
        slug: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM linktrees WHERE slug = $1 AND ($2::BIGINT IS NULL OR id <> $2))",
        )
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(pool)
        .await
    }

    /// Update a linktree. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateLinktree,
    ) -> Result<Option<Linktree>, sqlx::Error> {
        let query = format!(
            "UPDATE linktrees SET
                slug = COALESCE($2, slug),
                title = COALESCE($3, title),
                bio = COALESCE($4, bio),
                is_active = COALESCE($5, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Linktree>(&query)
            .bind(id)
            .bind(&input.slug)
            .bind(&input.title)
            .bind(&input.bio)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Replace (or clear, with `None`) the profile photo path.
    pub async fn set_photo(
        pool: &PgPool,
        id: DbId,
        photo: Option<&str>,
    ) -> Result<Option<Linktree>, sqlx::Error> {
        let query = format!("UPDATE linktrees SET photo = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Linktree>(&query)
            .bind(id)
            .bind(photo)
            .fetch_optional(pool)
            .await
    }

    /// Delete a linktree and, by cascade, its links and tracking rows.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM linktrees WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM linktrees")
            .fetch_one(pool)
            .await
    }
}
