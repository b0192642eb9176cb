//! Route definitions for the signed-in user's linktree.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::linktree;
use crate::state::AppState;

/// Routes mounted at `/linktree`. All require auth.
///
/// ```text
/// GET    /        -> get_own
/// POST   /        -> create
/// PUT    /        -> update
/// DELETE /        -> delete
/// POST   /photo   -> upload_photo (multipart)
/// DELETE /photo   -> remove_photo
/// GET    /stats   -> stats (?days=)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(linktree::get_own)
                .post(linktree::create)
                .put(linktree::update)
                .delete(linktree::delete),
        )
        .route(
            "/photo",
            post(linktree::upload_photo).delete(linktree::remove_photo),
        )
        .route("/stats", get(linktree::stats))
}
