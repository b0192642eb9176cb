//! Route definitions for link entries.

use axum::routing::{get, patch, put};
use axum::Router;

use crate::handlers::links;
use crate::state::AppState;

/// Routes mounted at `/links`. All require auth; collection routes accept
/// `?linktree_id=` for admins.
///
/// ```text
/// GET    /                  -> list
/// POST   /                  -> create
/// PUT    /reorder           -> reorder
/// PUT    /{id}              -> update
/// DELETE /{id}              -> delete
/// PATCH  /{id}/visibility   -> set_visibility
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(links::list).post(links::create))
        .route("/reorder", put(links::reorder))
        .route("/{id}", put(links::update).delete(links::delete))
        .route("/{id}/visibility", patch(links::set_visibility))
}
