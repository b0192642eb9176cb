//! Admin dashboard analytics (`/admin/stats`).

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use linkumkm_db::repositories::AnalyticsRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// How many top links and articles the dashboard shows.
const TOP_N: i64 = 10;

/// GET /api/admin/stats
pub async fn platform(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let stats = AnalyticsRepo::platform_stats(&state.pool, TOP_N).await?;
    Ok(Json(DataResponse { data: stats }))
}
