//! Admin user management (`/admin/users`).
//!
//! Plain admins manage `USER` accounts only; granting or revoking admin
//! roles requires a superadmin. Nobody can change their own role or delete
//! their own account here.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use linkumkm_core::error::CoreError;
use linkumkm_core::roles::{can_manage, check_role_change, ROLE_USER};
use linkumkm_core::types::DbId;
use linkumkm_db::models::user::{CreateUser, UpdateUser, User, UserListParams, UserResponse};
use linkumkm_db::repositories::UserRepo;
use serde::Deserialize;
use validator::Validate;

use super::auth::check_password;
use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppQuery, ValidatedJson};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;
use crate::storage::delete_best_effort;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /admin/users`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    pub password: String,
    /// Defaults to `USER`.
    pub role: Option<String>,
}

/// Request body for `PUT /admin/users/{id}/role`.
#[derive(Debug, Deserialize)]
pub struct SetRoleRequest {
    pub role: String,
}

/// Request body for `POST /admin/users/{id}/reset-password`.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub password: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn load_user(state: &AppState, id: DbId) -> AppResult<User> {
    UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))
}

/// Load a user the admin is allowed to modify.
async fn managed_user(state: &AppState, admin: &AuthUser, id: DbId) -> AppResult<User> {
    let user = load_user(state, id).await?;
    if user.id != admin.user_id && !can_manage(&admin.role, &user.role) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only a superadmin can modify admin accounts".into(),
        )));
    }
    Ok(user)
}

fn not_self(admin: &AuthUser, id: DbId, action: &str) -> AppResult<()> {
    if admin.user_id == id {
        return Err(AppError::BadRequest(format!("You cannot {action} your own account")));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/admin/users?search=&role=&limit=&offset=
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<UserListParams>,
) -> AppResult<impl IntoResponse> {
    let data = UserRepo::list(&state.pool, &params).await?;
    let total = UserRepo::count(&state.pool, &params).await?;
    Ok(Json(PaginatedResponse { data, total }))
}

/// POST /api/admin/users
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateUserRequest>,
) -> AppResult<impl IntoResponse> {
    let role = input.role.unwrap_or_else(|| ROLE_USER.to_string());
    check_role_change(&admin.role, ROLE_USER, &role)?;
    check_password(&input.password)?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            name: input.name.trim().to_string(),
            email: input.email.trim().to_lowercase(),
            password_hash,
            role,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, role = %user.role, created_by = admin.user_id, "User created");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserResponse::from(user),
        }),
    ))
}

/// GET /api/admin/users/{id}
pub async fn get_by_id(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let user = load_user(&state, id).await?;
    Ok(Json(DataResponse {
        data: UserResponse::from(user),
    }))
}

/// PUT /api/admin/users/{id}
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateUser>,
) -> AppResult<impl IntoResponse> {
    let current = managed_user(&state, &admin, id).await?;
    if input.is_active == Some(false) {
        not_self(&admin, id, "deactivate")?;
    }

    let user = UserRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    if input.image.is_some() && current.image != user.image {
        delete_best_effort(state.store.as_ref(), current.image.as_deref()).await;
    }

    tracing::info!(user_id = id, updated_by = admin.user_id, "User updated");
    Ok(Json(DataResponse {
        data: UserResponse::from(user),
    }))
}

/// PUT /api/admin/users/{id}/role
pub async fn set_role(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<SetRoleRequest>,
) -> AppResult<impl IntoResponse> {
    not_self(&admin, id, "change the role of")?;
    let current = load_user(&state, id).await?;
    check_role_change(&admin.role, &current.role, &input.role)?;

    let user = UserRepo::update_role(&state.pool, id, &input.role)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    tracing::info!(
        user_id = id,
        from = %current.role,
        to = %user.role,
        changed_by = admin.user_id,
        "User role changed",
    );
    Ok(Json(DataResponse {
        data: UserResponse::from(user),
    }))
}

/// POST /api/admin/users/{id}/reset-password
pub async fn reset_password(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<ResetPasswordRequest>,
) -> AppResult<StatusCode> {
    managed_user(&state, &admin, id).await?;
    check_password(&input.password)?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, id, &password_hash).await?;

    tracing::info!(user_id = id, reset_by = admin.user_id, "User password reset");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/admin/users/{id}
///
/// Deletes the account together with its linktree, links and articles.
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    not_self(&admin, id, "delete")?;
    let user = managed_user(&state, &admin, id).await?;

    UserRepo::delete(&state.pool, id).await?;
    delete_best_effort(state.store.as_ref(), user.image.as_deref()).await;

    tracing::info!(user_id = id, deleted_by = admin.user_id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}
