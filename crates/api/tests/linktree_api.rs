//! HTTP-level tests for owner linktree management, links and the public profile.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, get, get_auth, patch_json_auth, post_json, post_json_auth,
    put_json_auth,
};
use serde_json::{json, Value};
use sqlx::PgPool;

async fn create_linktree(app: &axum::Router, token: &str, slug: &str) -> Value {
    let body = json!({ "slug": slug, "title": "Toko Sri", "bio": "Batik tulis" });
    let response = post_json_auth(app.clone(), "/api/linktree", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

async fn create_link(app: &axum::Router, token: &str, title: &str, category_id: Option<i64>) -> i64 {
    let body = json!({
        "title": title,
        "url": format!("https://example.com/{title}"),
        "category_id": category_id,
    });
    let response = post_json_auth(app.clone(), "/api/links", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

async fn category_id(pool: &PgPool, name: &str) -> i64 {
    sqlx::query_scalar("SELECT id FROM categories WHERE name = $1")
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Linktree
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn one_linktree_per_user(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_user, token) = common::user_with_token(&app, &pool, "sri", "USER").await;

    let linktree = create_linktree(&app, &token, "batik-sri").await;
    assert_eq!(linktree["slug"], "batik-sri");
    assert_eq!(linktree["is_active"], true);

    let body = json!({ "slug": "batik-sri-2", "title": "Lagi" });
    let response = post_json_auth(app, "/api/linktree", body, &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn slug_conflicts_and_rules(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_a, token_a) = common::user_with_token(&app, &pool, "ani", "USER").await;
    let (_b, token_b) = common::user_with_token(&app, &pool, "budi", "USER").await;

    create_linktree(&app, &token_a, "kopi-enak").await;

    let body = json!({ "slug": "kopi-enak", "title": "Kopi" });
    let response = post_json_auth(app.clone(), "/api/linktree", body, &token_b).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = json!({ "slug": "Kopi Enak!", "title": "Kopi" });
    let response = post_json_auth(app.clone(), "/api/linktree", body, &token_b).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["fields"]["slug"].is_array());

    create_linktree(&app, &token_b, "kopi-budi").await;
    let response = put_json_auth(app.clone(), "/api/linktree", json!({ "slug": "kopi-enak" }), &token_b).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Keeping your own slug is not a conflict.
    let response = put_json_auth(
        app,
        "/api/linktree",
        json!({ "slug": "kopi-budi", "title": "Kopi Budi" }),
        &token_b,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["title"], "Kopi Budi");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn no_linktree_is_404(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_user, token) = common::user_with_token(&app, &pool, "citra", "USER").await;

    let response = get_auth(app, "/api/linktree", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Links
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn link_url_is_validated(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_user, token) = common::user_with_token(&app, &pool, "dedi", "USER").await;
    create_linktree(&app, &token, "dedi-shop").await;

    let body = json!({ "title": "Bahaya", "url": "javascript:alert(1)" });
    let response = post_json_auth(app, "/api/links", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["fields"]["url"].is_array());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_category_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_user, token) = common::user_with_token(&app, &pool, "eka", "USER").await;
    create_linktree(&app, &token, "eka-shop").await;

    let body = json!({ "title": "Toko", "url": "https://toko.example.com", "category_id": 999999 });
    let response = post_json_auth(app, "/api/links", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_REFERENCE");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn reorder_persists_submitted_order(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_user, token) = common::user_with_token(&app, &pool, "fani", "USER").await;
    create_linktree(&app, &token, "fani-craft").await;

    let a = create_link(&app, &token, "a", None).await;
    let b = create_link(&app, &token, "b", None).await;
    let c = create_link(&app, &token, "c", None).await;

    let response = put_json_auth(app.clone(), "/api/links/reorder", json!({ "ids": [c, a, b] }), &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(app.clone(), "/api/links", &token).await;
    let json = body_json(response).await;
    let order: Vec<i64> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["id"].as_i64().unwrap())
        .collect();
    assert_eq!(order, vec![c, a, b]);
    assert_eq!(json["data"][0]["sort_order"], 0);
    assert_eq!(json["data"][2]["sort_order"], 2);

    // Partial lists leave stale positions, so they are refused.
    let response = put_json_auth(app, "/api/links/reorder", json!({ "ids": [a, b] }), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn foreign_links_cannot_be_touched(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_owner, owner_token) = common::user_with_token(&app, &pool, "gilang", "USER").await;
    let (_other, other_token) = common::user_with_token(&app, &pool, "hana", "USER").await;
    let (_admin, admin_token) = common::user_with_token(&app, &pool, "indra", "ADMIN").await;

    create_linktree(&app, &owner_token, "gilang-kopi").await;
    create_linktree(&app, &other_token, "hana-kue").await;
    let link = create_link(&app, &owner_token, "menu", None).await;

    let uri = format!("/api/links/{link}");
    let response = put_json_auth(app.clone(), &uri, json!({ "title": "hacked" }), &other_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(app.clone(), &uri, &other_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Submitting someone else's id in a reorder is a validation error.
    let response = put_json_auth(app.clone(), "/api/links/reorder", json!({ "ids": [link] }), &other_token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json_auth(app.clone(), &uri, json!({ "title": "Menu Baru" }), &admin_token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = delete_auth(app, &uri, &owner_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

// ---------------------------------------------------------------------------
// Public profile and tracking
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn public_profile_groups_visible_links(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_user, token) = common::user_with_token(&app, &pool, "joko", "USER").await;
    create_linktree(&app, &token, "joko-tani").await;

    let whatsapp = category_id(&pool, "WhatsApp").await;
    let marketplace = category_id(&pool, "Marketplace").await;
    create_link(&app, &token, "wa", Some(whatsapp)).await;
    create_link(&app, &token, "tokopedia", Some(marketplace)).await;
    let hidden = create_link(&app, &token, "rahasia", Some(marketplace)).await;
    create_link(&app, &token, "blog", None).await;

    let response = patch_json_auth(
        app.clone(),
        &format!("/api/links/{hidden}/visibility"),
        json!({ "is_visible": false }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(app, "/api/public/linktrees/joko-tani").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["owner_name"], "joko");

    let groups = data["groups"].as_array().unwrap();
    assert_eq!(groups.len(), 3);
    assert_eq!(groups[0]["category_name"], "WhatsApp");
    assert_eq!(groups[1]["category_name"], "Marketplace");
    assert_eq!(groups[1]["links"].as_array().unwrap().len(), 1);
    assert!(groups[2]["category_id"].is_null());

    let views: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM linktree_views")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(views, 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn inactive_or_unknown_profile_is_404(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_user, token) = common::user_with_token(&app, &pool, "kiki", "USER").await;
    create_linktree(&app, &token, "kiki-jahit").await;

    let response = put_json_auth(app.clone(), "/api/linktree", json!({ "is_active": false }), &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(app.clone(), "/api/public/linktrees/kiki-jahit").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(app, "/api/public/linktrees/tidak-ada").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn clicks_are_recorded_for_visible_links_only(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_user, token) = common::user_with_token(&app, &pool, "lina", "USER").await;
    create_linktree(&app, &token, "lina-snack").await;
    let shown = create_link(&app, &token, "shopee", None).await;
    let hidden = create_link(&app, &token, "draft", None).await;
    patch_json_auth(
        app.clone(),
        &format!("/api/links/{hidden}/visibility"),
        json!({ "is_visible": false }),
        &token,
    )
    .await;

    let response = post_json(app.clone(), &format!("/api/public/links/{shown}/click"), json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["url"], "https://example.com/shopee");

    let response = post_json(app.clone(), &format!("/api/public/links/{hidden}/click"), json!({})).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get_auth(app, "/api/linktree/stats?days=7", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["total_clicks"], 1);
    assert_eq!(json["data"]["daily_clicks"].as_array().unwrap().len(), 7);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn deleting_linktree_removes_links(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_user, token) = common::user_with_token(&app, &pool, "maya", "USER").await;
    create_linktree(&app, &token, "maya-art").await;
    create_link(&app, &token, "ig", None).await;

    let response = delete_auth(app.clone(), "/api/linktree", &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let links: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM detail_linktrees")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(links, 0);

    let response = get(app, "/api/public/linktrees/maya-art").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn click_still_redirects_when_recording_fails(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_user, token) = common::user_with_token(&app, &pool, "nuri", "USER").await;
    create_linktree(&app, &token, "nuri-kopi").await;
    let link = create_link(&app, &token, "tokopedia", None).await;

    sqlx::query("DROP TABLE link_clicks").execute(&pool).await.unwrap();

    let response = post_json(app, &format!("/api/public/links/{link}/click"), json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["url"], "https://example.com/tokopedia");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn mistyped_input_is_a_json_bad_request(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_user, token) = common::user_with_token(&app, &pool, "oki", "USER").await;
    create_linktree(&app, &token, "oki-tenun").await;
    let link = create_link(&app, &token, "wa", None).await;

    let response = patch_json_auth(
        app.clone(),
        &format!("/api/links/{link}/visibility"),
        json!({ "is_visible": "yes" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");

    let response = get_auth(app, "/api/linktree/stats?days=abc", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["error"].is_string());
}
