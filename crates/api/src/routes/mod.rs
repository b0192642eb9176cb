pub mod admin;
pub mod auth;
pub mod health;
pub mod linktree;
pub mod links;
pub mod public;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                          register (public)
/// /auth/login                             login (public)
/// /auth/logout                            logout (public, clears cookie)
/// /auth/me                                current user (auth)
///
/// /linktree                               own linktree: get, create, update, delete
/// /linktree/photo                         upload, remove profile photo
/// /linktree/stats                         own analytics
///
/// /links                                  list, create
/// /links/reorder                          reorder (PUT)
/// /links/{id}                             update, delete
/// /links/{id}/visibility                  show/hide (PATCH)
///
/// /public/linktrees/{slug}                public profile
/// /public/links/{id}/click                click tracking
/// /public/articles                        published articles
/// /public/articles/{slug}                 published article
/// /public/categories                      link categories
/// /public/article-categories              article categories
///
/// /admin/users                            list, create (admin only)
/// /admin/users/{id}                       get, update, delete
/// /admin/users/{id}/role                  change role
/// /admin/users/{id}/reset-password        reset password
/// /admin/categories[/{id}]                link category CRUD
/// /admin/article-categories[/{id}]        article category CRUD
/// /admin/articles[/{id}]                  article CRUD
/// /admin/articles/{id}/status             publish, archive, unpublish
/// /admin/uploads                          image upload
/// /admin/stats                            platform analytics
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/linktree", linktree::router())
        .nest("/links", links::router())
        .nest("/public", public::router())
        .nest("/admin", admin::router())
}
