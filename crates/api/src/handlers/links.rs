//! Handlers for link entries (`/links`).
//!
//! Owners manage links on their own linktree. Admins may act on any link and
//! may target another linktree with `?linktree_id=`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use linkumkm_core::error::CoreError;
use linkumkm_core::links::{sort_orders, validate_reorder};
use linkumkm_core::types::DbId;
use linkumkm_db::models::link::{CreateLink, Link, ReorderLinks, SetVisibility, UpdateLink};
use linkumkm_db::models::linktree::Linktree;
use linkumkm_db::repositories::{LinkRepo, LinktreeRepo};
use serde::Deserialize;

use super::linktree::own_linktree;
use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppQuery, ValidatedJson};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// `?linktree_id=` on collection routes.
#[derive(Debug, Default, Deserialize)]
pub struct LinkScope {
    pub linktree_id: Option<DbId>,
}

/// Linktree the request operates on: the caller's own, or (admins only) the
/// one named by `requested`.
async fn target_linktree(
    state: &AppState,
    auth: &AuthUser,
    requested: Option<DbId>,
) -> AppResult<Linktree> {
    let Some(id) = requested else {
        return own_linktree(state, auth).await;
    };
    let linktree = LinktreeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Linktree",
            id,
        }))?;
    if linktree.user_id != auth.user_id && !auth.is_admin() {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not own this linktree".into(),
        )));
    }
    Ok(linktree)
}

/// Load a link the caller may modify.
async fn owned_link(state: &AppState, auth: &AuthUser, id: DbId) -> AppResult<Link> {
    let link = LinkRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Link", id }))?;
    if auth.is_admin() {
        return Ok(link);
    }
    let owner = LinktreeRepo::find_by_id(&state.pool, link.linktree_id)
        .await?
        .map(|l| l.user_id);
    if owner != Some(auth.user_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not own this link".into(),
        )));
    }
    Ok(link)
}

// ---------------------------------------------------------------------------
// Collection
// ---------------------------------------------------------------------------

/// GET /api/links
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    AppQuery(scope): AppQuery<LinkScope>,
) -> AppResult<impl IntoResponse> {
    let linktree = target_linktree(&state, &auth, scope.linktree_id).await?;
    let links = LinkRepo::list_by_linktree(&state.pool, linktree.id).await?;
    Ok(Json(DataResponse { data: links }))
}

/// POST /api/links
///
/// New links are appended after the current last one.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    AppQuery(scope): AppQuery<LinkScope>,
    ValidatedJson(input): ValidatedJson<CreateLink>,
) -> AppResult<impl IntoResponse> {
    let linktree = target_linktree(&state, &auth, scope.linktree_id).await?;
    let link = LinkRepo::create(&state.pool, linktree.id, &input).await?;

    tracing::info!(link_id = link.id, linktree_id = linktree.id, user_id = auth.user_id, "Link created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: link })))
}

/// PUT /api/links/reorder
///
/// Body lists every link id of the linktree in the desired order.
pub async fn reorder(
    auth: AuthUser,
    State(state): State<AppState>,
    AppQuery(scope): AppQuery<LinkScope>,
    ValidatedJson(input): ValidatedJson<ReorderLinks>,
) -> AppResult<impl IntoResponse> {
    let linktree = target_linktree(&state, &auth, scope.linktree_id).await?;
    let existing = LinkRepo::ids_for_linktree(&state.pool, linktree.id).await?;
    validate_reorder(&existing, &input.ids)?;

    let updated = LinkRepo::reorder(&state.pool, linktree.id, &sort_orders(&input.ids)).await?;
    tracing::info!(linktree_id = linktree.id, updated, "Links reordered");

    let links = LinkRepo::list_by_linktree(&state.pool, linktree.id).await?;
    Ok(Json(DataResponse { data: links }))
}

// ---------------------------------------------------------------------------
// Single link
// ---------------------------------------------------------------------------

/// PUT /api/links/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateLink>,
) -> AppResult<impl IntoResponse> {
    owned_link(&state, &auth, id).await?;
    let link = LinkRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Link", id }))?;

    tracing::info!(link_id = id, user_id = auth.user_id, "Link updated");
    Ok(Json(DataResponse { data: link }))
}

/// PATCH /api/links/{id}/visibility
pub async fn set_visibility(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<SetVisibility>,
) -> AppResult<impl IntoResponse> {
    owned_link(&state, &auth, id).await?;
    let link = LinkRepo::set_visibility(&state.pool, id, input.is_visible)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Link", id }))?;

    tracing::info!(link_id = id, is_visible = link.is_visible, "Link visibility changed");
    Ok(Json(DataResponse { data: link }))
}

/// DELETE /api/links/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    owned_link(&state, &auth, id).await?;
    LinkRepo::delete(&state.pool, id).await?;

    tracing::info!(link_id = id, user_id = auth.user_id, "Link deleted");
    Ok(StatusCode::NO_CONTENT)
}
