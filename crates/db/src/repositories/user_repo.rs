//! Repository for the `users` table.

use linkumkm_core::types::DbId;
use sqlx::PgPool;

use super::like_pattern;
use crate::models::user::{CreateUser, UpdateUser, User, UserListItem, UserListParams};
use crate::{clamp_limit, clamp_offset};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, password_hash, role, image, is_active, \
                       created_at, updated_at";

const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 100;

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (name, email, password_hash, role)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.role)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email. Emails are stored lowercased.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List users (newest first) with optional search, role and active filters.
    pub async fn list(
        pool: &PgPool,
        params: &UserListParams,
    ) -> Result<Vec<UserListItem>, sqlx::Error> {
        let limit = clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT);
        let offset = clamp_offset(params.offset);

        sqlx::query_as::<_, UserListItem>(
            "SELECT u.id, u.name, u.email, u.role, u.image, u.is_active, \
                    l.slug AS linktree_slug, u.created_at \
             FROM users u \
             LEFT JOIN linktrees l ON l.user_id = u.id \
             WHERE ($1::TEXT IS NULL OR u.name ILIKE $1 OR u.email ILIKE $1) \
               AND ($2::TEXT IS NULL OR u.role = $2) \
               AND ($3::BOOLEAN IS NULL OR u.is_active = $3) \
             ORDER BY u.created_at DESC, u.id DESC \
             LIMIT $4 OFFSET $5",
        )
        .bind(like_pattern(params.search.as_deref()))
        .bind(params.role.as_deref())
        .bind(params.is_active)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Count users matching the same filters as [`UserRepo::list`].
    pub async fn count(pool: &PgPool, params: &UserListParams) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users u \
             WHERE ($1::TEXT IS NULL OR u.name ILIKE $1 OR u.email ILIKE $1) \
               AND ($2::TEXT IS NULL OR u.role = $2) \
               AND ($3::BOOLEAN IS NULL OR u.is_active = $3)",
        )
        .bind(like_pattern(params.search.as_deref()))
        .bind(params.role.as_deref())
        .bind(params.is_active)
        .fetch_one(pool)
        .await
    }

    /// Number of users holding `role`.
    pub async fn count_by_role(pool: &PgPool, role: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE role = $1")
            .bind(role)
            .fetch_one(pool)
            .await
    }

    /// Update a user. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                image = COALESCE($4, image),
                is_active = COALESCE($5, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.email.as_ref().map(|e| e.to_lowercase()))
            .bind(&input.image)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Change a user's role.
    pub async fn update_role(
        pool: &PgPool,
        id: DbId,
        role: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("UPDATE users SET role = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(role)
            .fetch_optional(pool)
            .await
    }

    /// Update a user's password hash. Returns `true` if the row was updated.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a user. Cascades to their linktree, links, articles and tracking rows.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Total number of users.
    pub async fn count_all(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await
    }
}
