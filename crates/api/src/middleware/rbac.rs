//! Role gate for the admin area.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use linkumkm_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// An [`AuthUser`] whose current role is `ADMIN` or `SUPERADMIN`.
///
/// Signed-out requests get 401 from [`AuthUser`]; signed-in users without an
/// admin role get 403.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.is_admin() {
            return Ok(Self(user));
        }
        tracing::debug!(user_id = user.user_id, role = %user.role, path = %parts.uri.path(), "Admin route refused");
        Err(AppError::Core(CoreError::Forbidden(
            "Administrator access required".into(),
        )))
    }
}
