//! Handlers for the `/auth` resource (register, login, logout, me).

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use linkumkm_core::error::CoreError;
use linkumkm_core::roles::ROLE_USER;
use linkumkm_db::models::linktree::{CreateLinktree, Linktree};
use linkumkm_db::models::user::{CreateUser, UserResponse};
use linkumkm_db::repositories::{LinktreeRepo, UserRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::cookie::{clear_session_cookie, session_cookie};
use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, verify_password, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, ValidatedJson};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
///
/// `linktree_slug` optionally claims a public page at sign-up.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,
    #[validate(custom(function = "linkumkm_core::slug::linktree_slug_rule"))]
    pub linktree_slug: Option<String>,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful authentication response returned by register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

/// The signed-in user and their linktree, if any.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: UserResponse,
    pub linktree: Option<Linktree>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/register
///
/// Create a `USER` account (and optionally its linktree) and sign it in.
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    let email = input.email.trim().to_lowercase();

    if UserRepo::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "Email is already registered".into(),
        )));
    }
    if let Some(slug) = &input.linktree_slug {
        if LinktreeRepo::slug_exists(&state.pool, slug, None).await? {
            return Err(AppError::Core(CoreError::Conflict(format!(
                "Slug '{slug}' is already taken"
            ))));
        }
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            name: input.name.trim().to_string(),
            email,
            password_hash,
            role: ROLE_USER.to_string(),
        },
    )
    .await?;

    if let Some(slug) = input.linktree_slug {
        let linktree = CreateLinktree {
            slug,
            title: user.name.clone(),
            bio: None,
        };
        // Lost a race on the slug: undo the account so the client can retry.
        if let Err(e) = LinktreeRepo::create(&state.pool, user.id, &linktree).await {
            UserRepo::delete(&state.pool, user.id).await?;
            return Err(e.into());
        }
    }

    tracing::info!(user_id = user.id, "User registered");

    let token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    let cookie = session_cookie(
        &token,
        state.config.jwt.expiry_secs(),
        state.config.cookie_secure,
    );

    Ok((
        StatusCode::CREATED,
        [(SET_COOKIE, cookie)],
        Json(AuthResponse {
            access_token: token,
            expires_in: state.config.jwt.expiry_secs(),
            user: user.into(),
        }),
    ))
}

/// POST /api/auth/login
///
/// Authenticate with email + password. Returns the token and sets the
/// session cookie.
pub async fn login(
    State(state): State<AppState>,
    AppJson(input): AppJson<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let invalid = || {
        AppError::Core(CoreError::Unauthorized(
            "Invalid email or password".into(),
        ))
    };

    let email = input.email.trim().to_lowercase();
    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(invalid)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(user_id = user.id, "Failed login attempt");
        return Err(invalid());
    }

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    let cookie = session_cookie(
        &token,
        state.config.jwt.expiry_secs(),
        state.config.cookie_secure,
    );

    tracing::info!(user_id = user.id, "User logged in");

    Ok((
        [(SET_COOKIE, cookie)],
        Json(AuthResponse {
            access_token: token,
            expires_in: state.config.jwt.expiry_secs(),
            user: user.into(),
        }),
    ))
}

/// POST /api/auth/logout
///
/// Clear the session cookie. Returns 204 No Content whether or not a session
/// was present.
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [(SET_COOKIE, clear_session_cookie(state.config.cookie_secure))],
    )
}

/// GET /api/auth/me
pub async fn me(State(state): State<AppState>, auth: AuthUser) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;
    let linktree = LinktreeRepo::find_by_user(&state.pool, auth.user_id).await?;

    Ok(Json(DataResponse {
        data: MeResponse {
            user: user.into(),
            linktree,
        },
    }))
}

/// Shared by the admin user handlers.
pub(crate) fn check_password(password: &str) -> AppResult<()> {
    crate::auth::password::validate_password_strength(password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))
}
