//! Admin management of link categories (`/admin/categories`).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use linkumkm_core::error::CoreError;
use linkumkm_core::types::DbId;
use linkumkm_db::models::category::{Category, CreateCategory, UpdateCategory};
use linkumkm_db::repositories::CategoryRepo;

use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::storage::delete_best_effort;

async fn load(state: &AppState, id: DbId) -> AppResult<Category> {
    CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))
}

/// GET /api/admin/categories
///
/// Every category with the number of links filed under it.
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let categories = CategoryRepo::list_with_counts(&state.pool).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// POST /api/admin/categories
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateCategory>,
) -> AppResult<impl IntoResponse> {
    let category = CategoryRepo::create(&state.pool, &input).await?;
    tracing::info!(category_id = category.id, name = %category.name, user_id = admin.user_id, "Category created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// PUT /api/admin/categories/{id}
///
/// A replaced or cleared uploaded icon is removed from storage.
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateCategory>,
) -> AppResult<impl IntoResponse> {
    let current = load(&state, id).await?;
    let category = CategoryRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))?;
    if current.icon != category.icon {
        delete_best_effort(state.store.as_ref(), current.icon.as_deref()).await;
    }

    tracing::info!(category_id = id, user_id = admin.user_id, "Category updated");
    Ok(Json(DataResponse { data: category }))
}

/// DELETE /api/admin/categories/{id}
///
/// Links in the category become uncategorized.
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let category = load(&state, id).await?;
    CategoryRepo::delete(&state.pool, id).await?;
    delete_best_effort(state.store.as_ref(), category.icon.as_deref()).await;

    tracing::info!(category_id = id, user_id = admin.user_id, "Category deleted");
    Ok(StatusCode::NO_CONTENT)
}
