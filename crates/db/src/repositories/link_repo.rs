//! Repository for the `detail_linktrees` table (link entries).

use linkumkm_core::types::DbId;
use sqlx::PgPool;

use crate::models::link::{CreateLink, Link, LinkWithCategory, UpdateLink};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, linktree_id, category_id, title, url, sort_order, is_visible, \
                       created_at, updated_at";

/// Link rows joined with their category and click total.
const WITH_CATEGORY_SELECT: &str = "\
    SELECT d.id, d.linktree_id, d.category_id, c.name AS category_name, \
           c.icon AS category_icon, d.title, d.url, d.sort_order, d.is_visible, \
           (SELECT COUNT(*) FROM link_clicks k WHERE k.detail_linktree_id = d.id) AS click_count, \
           d.created_at, d.updated_at \
    FROM detail_linktrees d \
    LEFT JOIN categories c ON c.id = d.category_id";

/// Provides CRUD and ordering operations for link entries.
pub struct LinkRepo;

impl LinkRepo {
    /// Append a link to the end of a linktree.
    pub async fn create(
        pool: &PgPool,
        linktree_id: DbId,
        input: &CreateLink,
    ) -> Result<Link, sqlx::Error> {
        let query = format!(
            "INSERT INTO detail_linktrees (linktree_id, category_id, title, url, is_visible, sort_order)
             VALUES ($1, $2, $3, $4, COALESCE($5, true),
                     (SELECT COALESCE(MAX(sort_order) + 1, 0)
                      FROM detail_linktrees WHERE linktree_id = $1))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Link>(&query)
            .bind(linktree_id)
            .bind(input.category_id)
            .bind(&input.title)
            .bind(&input.url)
            .bind(input.is_visible)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Link>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM detail_linktrees WHERE id = $1");
        sqlx::query_as::<_, Link>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All links of a linktree in display order, hidden ones included.
    pub async fn list_by_linktree(
        pool: &PgPool,
        linktree_id: DbId,
    ) -> Result<Vec<LinkWithCategory>, sqlx::Error> {
        let query = format!(
            "{WITH_CATEGORY_SELECT} WHERE d.linktree_id = $1 ORDER BY d.sort_order, d.id"
        );
        sqlx::query_as::<_, LinkWithCategory>(&query)
            .bind(linktree_id)
            .fetch_all(pool)
            .await
    }

    /// Visible links of a linktree in display order.
    pub async fn list_visible(
        pool: &PgPool,
        linktree_id: DbId,
    ) -> Result<Vec<LinkWithCategory>, sqlx::Error> {
        let query = format!(
            "{WITH_CATEGORY_SELECT} WHERE d.linktree_id = $1 AND d.is_visible \
             ORDER BY d.sort_order, d.id"
        );
        sqlx::query_as::<_, LinkWithCategory>(&query)
            .bind(linktree_id)
            .fetch_all(pool)
            .await
    }

    /// Ids of every link in a linktree, in current display order.
    pub async fn ids_for_linktree(
        pool: &PgPool,
        linktree_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT id FROM detail_linktrees WHERE linktree_id = $1 ORDER BY sort_order, id",
        )
        .bind(linktree_id)
        .fetch_all(pool)
        .await
    }

    /// Update a link. `clear_category` detaches it from its category.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateLink,
    ) -> Result<Option<Link>, sqlx::Error> {
        let query = format!(
            "UPDATE detail_linktrees SET
                title = COALESCE($2, title),
                url = COALESCE($3, url),
                category_id = CASE WHEN $5 THEN NULL ELSE COALESCE($4, category_id) END,
                is_visible = COALESCE($6, is_visible)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Link>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.url)
            .bind(input.category_id)
            .bind(input.clear_category)
            .bind(input.is_visible)
            .fetch_optional(pool)
            .await
    }

    pub async fn set_visibility(
        pool: &PgPool,
        id: DbId,
        is_visible: bool,
    ) -> Result<Option<Link>, sqlx::Error> {
        let query = format!(
            "UPDATE detail_linktrees SET is_visible = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Link>(&query)
            .bind(id)
            .bind(is_visible)
            .fetch_optional(pool)
            .await
    }

    /// Delete a link. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM detail_linktrees WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Apply `(id, sort_order)` pairs to one linktree atomically.
    ///
    /// Rows outside `linktree_id` are never touched. Returns the number of
    /// rows updated.
    pub async fn reorder(
        pool: &PgPool,
        linktree_id: DbId,
        orders: &[(DbId, i32)],
    ) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut updated = 0;
        for (id, sort_order) in orders {
            let result = sqlx::query(
                "UPDATE detail_linktrees SET sort_order = $3 WHERE id = $1 AND linktree_id = $2",
            )
            .bind(id)
            .bind(linktree_id)
            .bind(sort_order)
            .execute(&mut *tx)
            .await?;
            updated += result.rows_affected();
        }
        tx.commit().await?;
        Ok(updated)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM detail_linktrees")
            .fetch_one(pool)
            .await
    }
}
