//! Handlers for the signed-in user's own linktree (`/linktree`).

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use linkumkm_core::error::CoreError;
use linkumkm_core::types::DbId;
use linkumkm_core::uploads::UploadKind;
use linkumkm_db::models::link::LinkWithCategory;
use linkumkm_db::models::linktree::{CreateLinktree, Linktree, UpdateLinktree};
use linkumkm_db::repositories::{AnalyticsRepo, LinkRepo, LinktreeRepo};
use serde::Serialize;

use super::uploads::receive_upload;
use crate::error::{AppError, AppResult};
use crate::extract::{AppQuery, ValidatedJson};
use crate::middleware::auth::AuthUser;
use crate::query::StatsParams;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::storage::delete_best_effort;

/// The owner's view of their linktree: every link, hidden ones included.
#[derive(Debug, Serialize)]
pub struct OwnLinktree {
    #[serde(flatten)]
    pub linktree: Linktree,
    pub links: Vec<LinkWithCategory>,
}

/// Load the caller's linktree or 404.
pub(crate) async fn own_linktree(state: &AppState, auth: &AuthUser) -> AppResult<Linktree> {
    LinktreeRepo::find_by_user(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundByKey {
                entity: "Linktree",
                key: format!("of user {}", auth.user_id),
            })
        })
}

async fn ensure_slug_free(state: &AppState, slug: &str, exclude: Option<DbId>) -> AppResult<()> {
    if LinktreeRepo::slug_exists(&state.pool, slug, exclude).await? {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Slug '{slug}' is already taken"
        ))));
    }
    Ok(())
}

/// GET /api/linktree
pub async fn get_own(auth: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let linktree = own_linktree(&state, &auth).await?;
    let links = LinkRepo::list_by_linktree(&state.pool, linktree.id).await?;
    Ok(Json(DataResponse {
        data: OwnLinktree { linktree, links },
    }))
}

/// POST /api/linktree
///
/// A user owns at most one linktree; a second create is a 409.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateLinktree>,
) -> AppResult<impl IntoResponse> {
    if LinktreeRepo::find_by_user(&state.pool, auth.user_id)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "You already have a linktree".into(),
        )));
    }
    ensure_slug_free(&state, &input.slug, None).await?;

    let linktree = LinktreeRepo::create(&state.pool, auth.user_id, &input).await?;
    tracing::info!(linktree_id = linktree.id, user_id = auth.user_id, slug = %linktree.slug, "Linktree created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: linktree })))
}

/// PUT /api/linktree
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<UpdateLinktree>,
) -> AppResult<impl IntoResponse> {
    let current = own_linktree(&state, &auth).await?;
    if let Some(slug) = &input.slug {
        if *slug != current.slug {
            ensure_slug_free(&state, slug, Some(current.id)).await?;
        }
    }

    let linktree = LinktreeRepo::update(&state.pool, current.id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Linktree",
            id: current.id,
        }))?;
    tracing::info!(linktree_id = linktree.id, user_id = auth.user_id, "Linktree updated");

    Ok(Json(DataResponse { data: linktree }))
}

/// DELETE /api/linktree
///
/// Removes the linktree with its links and tracking rows.
pub async fn delete(auth: AuthUser, State(state): State<AppState>) -> AppResult<StatusCode> {
    let linktree = own_linktree(&state, &auth).await?;
    LinktreeRepo::delete(&state.pool, linktree.id).await?;
    delete_best_effort(state.store.as_ref(), linktree.photo.as_deref()).await;

    tracing::info!(linktree_id = linktree.id, user_id = auth.user_id, "Linktree deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/linktree/photo
///
/// Multipart form with a `file` field. Replaces the profile photo; the old
/// file is removed.
pub async fn upload_photo(
    auth: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let current = own_linktree(&state, &auth).await?;
    let stored = receive_upload(&state, UploadKind::LinktreePhoto, &mut multipart).await?;

    let photo = Some(stored.url.as_str());
    let linktree = match LinktreeRepo::set_photo(&state.pool, current.id, photo).await {
        Ok(Some(linktree)) => linktree,
        Ok(None) => {
            delete_best_effort(state.store.as_ref(), photo).await;
            return Err(AppError::Core(CoreError::NotFound {
                entity: "Linktree",
                id: current.id,
            }));
        }
        Err(e) => {
            delete_best_effort(state.store.as_ref(), photo).await;
            return Err(e.into());
        }
    };
    delete_best_effort(state.store.as_ref(), current.photo.as_deref()).await;

    tracing::info!(linktree_id = linktree.id, photo = %stored.url, "Linktree photo replaced");
    Ok(Json(DataResponse { data: linktree }))
}

/// DELETE /api/linktree/photo
pub async fn remove_photo(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let current = own_linktree(&state, &auth).await?;
    let linktree = LinktreeRepo::set_photo(&state.pool, current.id, None)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Linktree",
            id: current.id,
        }))?;
    delete_best_effort(state.store.as_ref(), current.photo.as_deref()).await;

    Ok(Json(DataResponse { data: linktree }))
}

/// GET /api/linktree/stats?days=30
pub async fn stats(
    auth: AuthUser,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<StatsParams>,
) -> AppResult<impl IntoResponse> {
    let linktree = own_linktree(&state, &auth).await?;
    let stats = AnalyticsRepo::linktree_stats(&state.pool, linktree.id, params.days()).await?;
    Ok(Json(DataResponse { data: stats }))
}
