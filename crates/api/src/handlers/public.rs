//! Unauthenticated read endpoints and view/click tracking (`/public`).

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use linkumkm_core::error::CoreError;
use linkumkm_core::types::DbId;
use linkumkm_db::models::article::PublishedArticleParams;
use linkumkm_db::models::link::LinkWithCategory;
use linkumkm_db::models::linktree::{LinkGroup, PublicLink, PublicLinktree};
use linkumkm_db::repositories::{
    AnalyticsRepo, ArticleCategoryRepo, ArticleRepo, CategoryRepo, LinkRepo, LinktreeRepo,
};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::extract::AppQuery;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;
use crate::tracking::Visitor;

/// Response of a recorded click: where to send the visitor.
#[derive(Debug, Serialize)]
pub struct ClickResponse {
    pub url: String,
}

/// Group links by category in order of first appearance. Links keep their
/// sort order within a group.
pub fn group_links(links: Vec<LinkWithCategory>) -> Vec<LinkGroup> {
    let mut groups: Vec<LinkGroup> = Vec::new();
    for link in links {
        let public = PublicLink {
            id: link.id,
            title: link.title,
            url: link.url,
            sort_order: link.sort_order,
        };
        match groups.iter_mut().find(|g| g.category_id == link.category_id) {
            Some(group) => group.links.push(public),
            None => groups.push(LinkGroup {
                category_id: link.category_id,
                category_name: link.category_name,
                category_icon: link.category_icon,
                links: vec![public],
            }),
        }
    }
    groups
}

/// GET /api/public/linktrees/{slug}
///
/// Public profile with visible links grouped by category. Records a view.
pub async fn get_linktree(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Visitor(visitor): Visitor,
) -> AppResult<impl IntoResponse> {
    let found = LinktreeRepo::find_public_by_slug(&state.pool, &slug)
        .await?
        .ok_or(AppError::Core(CoreError::NotFoundByKey {
            entity: "Linktree",
            key: slug,
        }))?;
    let linktree = found.linktree;
    let links = LinkRepo::list_visible(&state.pool, linktree.id).await?;

    if let Err(e) = AnalyticsRepo::record_linktree_view(&state.pool, linktree.id, &visitor).await {
        tracing::warn!(linktree_id = linktree.id, error = %e, "Failed to record linktree view");
    }

    Ok(Json(DataResponse {
        data: PublicLinktree {
            slug: linktree.slug,
            title: linktree.title,
            bio: linktree.bio,
            photo: linktree.photo,
            owner_name: found.owner_name,
            groups: group_links(links),
        },
    }))
}

/// POST /api/public/links/{id}/click
///
/// Records a click on a visible link of an active linktree and returns the
/// target URL.
pub async fn record_click(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Visitor(visitor): Visitor,
) -> AppResult<impl IntoResponse> {
    let not_found = || AppError::Core(CoreError::NotFound { entity: "Link", id });

    let link = LinkRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|l| l.is_visible)
        .ok_or_else(not_found)?;
    LinktreeRepo::find_by_id(&state.pool, link.linktree_id)
        .await?
        .filter(|t| t.is_active)
        .ok_or_else(not_found)?;

    if let Err(e) = AnalyticsRepo::record_link_click(&state.pool, link.id, &visitor).await {
        tracing::warn!(link_id = link.id, error = %e, "Failed to record link click");
    }

    Ok(Json(DataResponse {
        data: ClickResponse { url: link.url },
    }))
}

/// GET /api/public/articles?category=&tag=&search=&limit=&offset=
pub async fn list_articles(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<PublishedArticleParams>,
) -> AppResult<impl IntoResponse> {
    let data = ArticleRepo::list_published(&state.pool, &params).await?;
    let total = ArticleRepo::count_published(&state.pool, &params).await?;
    Ok(Json(PaginatedResponse { data, total }))
}

/// GET /api/public/articles/{slug}
///
/// A published article. Records a view and bumps its counter.
pub async fn get_article(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Visitor(visitor): Visitor,
) -> AppResult<impl IntoResponse> {
    let mut article = ArticleRepo::find_published_by_slug(&state.pool, &slug)
        .await?
        .ok_or(AppError::Core(CoreError::NotFoundByKey {
            entity: "Article",
            key: slug,
        }))?;

    match AnalyticsRepo::record_article_view(&state.pool, article.id, &visitor).await {
        Ok(()) => article.view_count += 1,
        Err(e) => tracing::warn!(article_id = article.id, error = %e, "Failed to record article view"),
    }

    Ok(Json(DataResponse { data: article }))
}

/// GET /api/public/categories
pub async fn list_categories(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let categories = CategoryRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// GET /api/public/article-categories
pub async fn list_article_categories(
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let categories = ArticleCategoryRepo::list_with_counts(&state.pool).await?;
    Ok(Json(DataResponse { data: categories }))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn link(id: DbId, category: Option<(DbId, &str)>, sort_order: i32) -> LinkWithCategory {
        LinkWithCategory {
            id,
            linktree_id: 1,
            category_id: category.map(|c| c.0),
            category_name: category.map(|c| c.1.to_string()),
            category_icon: None,
            title: format!("Link {id}"),
            url: format!("https://example.com/{id}"),
            sort_order,
            is_visible: true,
            click_count: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn groups_follow_first_appearance() {
        let groups = group_links(vec![
            link(1, Some((3, "WhatsApp")), 0),
            link(2, None, 1),
            link(3, Some((1, "Marketplace")), 2),
            link(4, Some((3, "WhatsApp")), 3),
        ]);

        let order: Vec<Option<DbId>> = groups.iter().map(|g| g.category_id).collect();
        assert_eq!(order, vec![Some(3), None, Some(1)]);
        let ids: Vec<DbId> = groups[0].links.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1, 4]);
    }

    #[test]
    fn empty_profile_has_no_groups() {
        assert!(group_links(Vec::new()).is_empty());
    }
}
