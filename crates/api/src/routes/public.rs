//! Route definitions for unauthenticated reads.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::public;
use crate::state::AppState;

/// Routes mounted at `/public`.
///
/// ```text
/// GET  /linktrees/{slug}     -> get_linktree (records a view)
/// POST /links/{id}/click     -> record_click
/// GET  /articles             -> list_articles (?category=&tag=&search=&limit=&offset=)
/// GET  /articles/{slug}      -> get_article (records a view)
/// GET  /categories           -> list_categories
/// GET  /article-categories   -> list_article_categories
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/linktrees/{slug}", get(public::get_linktree))
        .route("/links/{id}/click", post(public::record_click))
        .route("/articles", get(public::list_articles))
        .route("/articles/{slug}", get(public::get_article))
        .route("/categories", get(public::list_categories))
        .route("/article-categories", get(public::list_article_categories))
}
