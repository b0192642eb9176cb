//! Admin management of article categories (`/admin/article-categories`).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use linkumkm_core::error::CoreError;
use linkumkm_core::slug::{with_suffix, ARTICLE_SLUG_MAX};
use linkumkm_core::types::DbId;
use linkumkm_db::models::article_category::{CreateArticleCategory, UpdateArticleCategory};
use linkumkm_db::repositories::ArticleCategoryRepo;

use super::{slug_base, MAX_SLUG_ATTEMPTS};
use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// First free `base`, `base-2`, `base-3`, ...
async fn unique_slug(state: &AppState, base: &str) -> AppResult<String> {
    for n in 1..=MAX_SLUG_ATTEMPTS {
        let candidate = with_suffix(base, n);
        if !ArticleCategoryRepo::slug_exists(&state.pool, &candidate, None).await? {
            return Ok(candidate);
        }
    }
    Err(AppError::Core(CoreError::Conflict(format!(
        "Could not find a free slug for '{base}'"
    ))))
}

async fn ensure_slug_free(state: &AppState, slug: &str, exclude: Option<DbId>) -> AppResult<()> {
    if ArticleCategoryRepo::slug_exists(&state.pool, slug, exclude).await? {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Slug '{slug}' is already taken"
        ))));
    }
    Ok(())
}

/// GET /api/admin/article-categories
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let categories = ArticleCategoryRepo::list_with_counts(&state.pool).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// POST /api/admin/article-categories
///
/// Without an explicit slug one is derived from the name and de-duplicated.
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateArticleCategory>,
) -> AppResult<impl IntoResponse> {
    let slug = match &input.slug {
        Some(slug) => {
            ensure_slug_free(&state, slug, None).await?;
            slug.clone()
        }
        None => unique_slug(&state, &slug_base(&input.name, ARTICLE_SLUG_MAX, "kategori")).await?,
    };

    let category = ArticleCategoryRepo::create(
        &state.pool,
        input.name.trim(),
        &slug,
        input.description.as_deref(),
    )
    .await?;

    tracing::info!(article_category_id = category.id, slug = %category.slug, user_id = admin.user_id, "Article category created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// PUT /api/admin/article-categories/{id}
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateArticleCategory>,
) -> AppResult<impl IntoResponse> {
    if let Some(slug) = &input.slug {
        ensure_slug_free(&state, slug, Some(id)).await?;
    }

    let category = ArticleCategoryRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ArticleCategory",
            id,
        }))?;

    tracing::info!(article_category_id = id, user_id = admin.user_id, "Article category updated");
    Ok(Json(DataResponse { data: category }))
}

/// DELETE /api/admin/article-categories/{id}
///
/// Articles in the category become uncategorized.
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !ArticleCategoryRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "ArticleCategory",
            id,
        }));
    }

    tracing::info!(article_category_id = id, user_id = admin.user_id, "Article category deleted");
    Ok(StatusCode::NO_CONTENT)
}
