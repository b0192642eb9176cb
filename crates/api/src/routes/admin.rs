//! Route definitions for the `/admin` resource.

use axum::routing::{get, patch, post, put};
use axum::Router;

use crate::handlers::{admin_users, article_categories, articles, categories, stats, uploads};
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// All routes require the `ADMIN` or `SUPERADMIN` role (enforced by handler
/// extractors).
///
/// ```text
/// GET    /users                       -> admin_users::list
/// POST   /users                       -> admin_users::create
/// GET    /users/{id}                  -> admin_users::get_by_id
/// PUT    /users/{id}                  -> admin_users::update
/// DELETE /users/{id}                  -> admin_users::delete
/// PUT    /users/{id}/role             -> admin_users::set_role
/// POST   /users/{id}/reset-password   -> admin_users::reset_password
///
/// GET    /categories                  -> categories::list
/// POST   /categories                  -> categories::create
/// PUT    /categories/{id}             -> categories::update
/// DELETE /categories/{id}             -> categories::delete
///
/// GET    /article-categories          -> article_categories::list
/// POST   /article-categories          -> article_categories::create
/// PUT    /article-categories/{id}     -> article_categories::update
/// DELETE /article-categories/{id}     -> article_categories::delete
///
/// GET    /articles                    -> articles::list
/// POST   /articles                    -> articles::create
/// GET    /articles/{id}               -> articles::get_by_id
/// PUT    /articles/{id}               -> articles::update
/// DELETE /articles/{id}               -> articles::delete
/// PATCH  /articles/{id}/status        -> articles::set_status
///
/// POST   /uploads                     -> uploads::upload (?kind=, multipart)
/// GET    /stats                       -> stats::platform
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin_users::list).post(admin_users::create))
        .route(
            "/users/{id}",
            get(admin_users::get_by_id)
                .put(admin_users::update)
                .delete(admin_users::delete),
        )
        .route("/users/{id}/role", put(admin_users::set_role))
        .route(
            "/users/{id}/reset-password",
            post(admin_users::reset_password),
        )
        .route(
            "/categories",
            get(categories::list).post(categories::create),
        )
        .route(
            "/categories/{id}",
            put(categories::update).delete(categories::delete),
        )
        .route(
            "/article-categories",
            get(article_categories::list).post(article_categories::create),
        )
        .route(
            "/article-categories/{id}",
            put(article_categories::update).delete(article_categories::delete),
        )
        .route("/articles", get(articles::list).post(articles::create))
        .route(
            "/articles/{id}",
            get(articles::get_by_id)
                .put(articles::update)
                .delete(articles::delete),
        )
        .route("/articles/{id}/status", patch(articles::set_status))
        .route("/uploads", post(uploads::upload))
        .route("/stats", get(stats::platform))
}
