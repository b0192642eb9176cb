//! Admin article CMS (`/admin/articles`).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use linkumkm_core::article::{
    excerpt_from_html, normalize_tags, resolve_published_at, ArticleStatus, DEFAULT_EXCERPT_CHARS,
};
use linkumkm_core::error::CoreError;
use linkumkm_core::slug::{with_suffix, ARTICLE_SLUG_MAX};
use linkumkm_core::types::DbId;
use linkumkm_db::models::article::{
    Article, ArticleDetail, ArticleListParams, CreateArticle, CreateArticleRequest,
    SetArticleStatus, UpdateArticle, UpdateArticleRequest,
};
use linkumkm_db::repositories::ArticleRepo;

use super::{slug_base, MAX_SLUG_ATTEMPTS};
use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppQuery, ValidatedJson};
use crate::middleware::rbac::RequireAdmin;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;
use crate::storage::delete_best_effort;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn load(state: &AppState, id: DbId) -> AppResult<Article> {
    ArticleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Article",
            id,
        }))
}

async fn load_detail(state: &AppState, id: DbId) -> AppResult<ArticleDetail> {
    ArticleRepo::find_detail(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Article",
            id,
        }))
}

/// First free `base`, `base-2`, `base-3`, ...
async fn unique_slug(state: &AppState, base: &str) -> AppResult<String> {
    for n in 1..=MAX_SLUG_ATTEMPTS {
        let candidate = with_suffix(base, n);
        if !ArticleRepo::slug_exists(&state.pool, &candidate, None).await? {
            return Ok(candidate);
        }
    }
    Err(AppError::Core(CoreError::Conflict(format!(
        "Could not find a free slug for '{base}'"
    ))))
}

async fn ensure_slug_free(state: &AppState, slug: &str, exclude: Option<DbId>) -> AppResult<()> {
    if ArticleRepo::slug_exists(&state.pool, slug, exclude).await? {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Slug '{slug}' is already taken"
        ))));
    }
    Ok(())
}

/// Explicit excerpt if non-blank, otherwise derived from the content.
fn resolve_excerpt(excerpt: Option<String>, content: &str) -> Option<String> {
    match excerpt.map(|e| e.trim().to_string()) {
        Some(e) if !e.is_empty() => Some(e),
        _ => {
            let derived = excerpt_from_html(content, DEFAULT_EXCERPT_CHARS);
            (!derived.is_empty()).then_some(derived)
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/admin/articles?status=&category_id=&author_id=&search=&limit=&offset=
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ArticleListParams>,
) -> AppResult<impl IntoResponse> {
    let data = ArticleRepo::list(&state.pool, &params).await?;
    let total = ArticleRepo::count(&state.pool, &params).await?;
    Ok(Json(PaginatedResponse { data, total }))
}

/// POST /api/admin/articles
///
/// The caller becomes the author. Without a slug one is derived from the
/// title and de-duplicated; an explicit slug that is taken is a 409.
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateArticleRequest>,
) -> AppResult<impl IntoResponse> {
    let slug = match &input.slug {
        Some(slug) => {
            ensure_slug_free(&state, slug, None).await?;
            slug.clone()
        }
        None => unique_slug(&state, &slug_base(&input.title, ARTICLE_SLUG_MAX, "artikel")).await?,
    };
    let tags = normalize_tags(&input.tags)?;
    let status = input.status.unwrap_or(ArticleStatus::Draft);

    let article = ArticleRepo::create(
        &state.pool,
        &CreateArticle {
            title: input.title.trim().to_string(),
            slug,
            excerpt: resolve_excerpt(input.excerpt, &input.content),
            content: input.content,
            featured_image: input.featured_image,
            status,
            tags,
            category_id: input.category_id,
            author_id: admin.user_id,
            published_at: resolve_published_at(None, status, Utc::now()),
        },
    )
    .await?;

    tracing::info!(article_id = article.id, slug = %article.slug, status = %status, author_id = admin.user_id, "Article created");

    let detail = load_detail(&state, article.id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

/// GET /api/admin/articles/{id}
pub async fn get_by_id(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let detail = load_detail(&state, id).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// PUT /api/admin/articles/{id}
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateArticleRequest>,
) -> AppResult<impl IntoResponse> {
    let current = load(&state, id).await?;

    if let Some(slug) = &input.slug {
        if *slug != current.slug {
            ensure_slug_free(&state, slug, Some(id)).await?;
        }
    }
    let tags = input.tags.as_deref().map(normalize_tags).transpose()?;
    let published_at = input
        .status
        .and_then(|status| resolve_published_at(current.published_at, status, Utc::now()));
    let excerpt = input.excerpt.and_then(|excerpt| {
        resolve_excerpt(
            Some(excerpt),
            input.content.as_deref().unwrap_or(&current.content),
        )
    });

    let replaces_image = input.clear_featured_image || input.featured_image.is_some();
    let changes = UpdateArticle {
        title: input.title.map(|t| t.trim().to_string()),
        slug: input.slug,
        excerpt,
        content: input.content,
        featured_image: input.featured_image,
        clear_featured_image: input.clear_featured_image,
        status: input.status,
        tags,
        category_id: input.category_id,
        clear_category: input.clear_category,
        published_at,
    };
    let updated = ArticleRepo::update(&state.pool, id, &changes)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Article",
            id,
        }))?;

    if replaces_image && current.featured_image != updated.featured_image {
        delete_best_effort(state.store.as_ref(), current.featured_image.as_deref()).await;
    }

    tracing::info!(article_id = id, user_id = admin.user_id, "Article updated");

    let detail = load_detail(&state, id).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// PATCH /api/admin/articles/{id}/status
///
/// `published_at` is set the first time an article is published and kept
/// afterwards.
pub async fn set_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<SetArticleStatus>,
) -> AppResult<impl IntoResponse> {
    let current = load(&state, id).await?;
    let published_at = resolve_published_at(current.published_at, input.status, Utc::now());

    let article = ArticleRepo::set_status(&state.pool, id, input.status, published_at)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Article",
            id,
        }))?;

    tracing::info!(
        article_id = id,
        from = %current.status,
        to = %article.status,
        user_id = admin.user_id,
        "Article status changed",
    );
    Ok(Json(DataResponse { data: article }))
}

/// DELETE /api/admin/articles/{id}
///
/// The featured image is removed from storage; inline images are left for
/// the janitor.
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let article = load(&state, id).await?;
    ArticleRepo::delete(&state.pool, id).await?;
    delete_best_effort(state.store.as_ref(), article.featured_image.as_deref()).await;

    tracing::info!(article_id = id, user_id = admin.user_id, "Article deleted");
    Ok(StatusCode::NO_CONTENT)
}
