//! HTTP-level tests for RBAC, admin user management and link categories.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get, get_auth, post_json, post_json_auth, put_json_auth};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// RBAC
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn admin_routes_require_admin_role(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_user, token) = common::user_with_token(&app, &pool, "biasa", "USER").await;

    for uri in [
        "/api/admin/users",
        "/api/admin/categories",
        "/api/admin/article-categories",
        "/api/admin/articles",
        "/api/admin/stats",
    ] {
        let response = get(app.clone(), uri).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri} without token");

        let response = get_auth(app.clone(), uri, &token).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{uri} as USER");
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn role_is_read_from_the_database(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (user, token) = common::user_with_token(&app, &pool, "naik", "USER").await;

    // Promotion applies to an existing session without logging in again.
    linkumkm_db::repositories::UserRepo::update_role(&pool, user.id, "ADMIN")
        .await
        .unwrap();
    let response = get_auth(app, "/api/admin/users", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn list_users_with_filters(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_admin, token) = common::user_with_token(&app, &pool, "admin", "ADMIN").await;
    let dormant = common::create_user(&pool, "pedagang-a", "USER").await;
    common::create_user(&pool, "pedagang-b", "USER").await;

    let response = get_auth(app.clone(), "/api/admin/users?role=USER", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["total"], 2);
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let response = get_auth(app.clone(), "/api/admin/users?search=pedagang-b&limit=1", &token).await;
    let json = body_json(response).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["data"][0]["name"], "pedagang-b");

    let deactivate = linkumkm_db::models::user::UpdateUser {
        is_active: Some(false),
        ..Default::default()
    };
    linkumkm_db::repositories::UserRepo::update(&pool, dormant.id, &deactivate)
        .await
        .unwrap();
    let response = get_auth(app, "/api/admin/users?is_active=false", &token).await;
    let json = body_json(response).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["data"][0]["name"], "pedagang-a");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn admin_creates_users_but_not_admins(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_admin, token) = common::user_with_token(&app, &pool, "admin", "ADMIN").await;

    let body = json!({ "name": "Pak Rudi", "email": "Rudi@Test.com", "password": "kata-sandi-1" });
    let response = post_json_auth(app.clone(), "/api/admin/users", body, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["role"], "USER");
    assert_eq!(json["data"]["email"], "rudi@test.com");

    // The new account can log in.
    let body = json!({ "email": "rudi@test.com", "password": "kata-sandi-1" });
    let response = post_json(app.clone(), "/api/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json!({ "name": "Bos", "email": "bos@test.com", "password": "kata-sandi-1", "role": "ADMIN" });
    let response = post_json_auth(app.clone(), "/api/admin/users", body, &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = json!({ "name": "Pendek", "email": "pendek@test.com", "password": "123" });
    let response = post_json_auth(app, "/api/admin/users", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn role_changes_follow_hierarchy(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_admin, admin_token) = common::user_with_token(&app, &pool, "admin", "ADMIN").await;
    let (superadmin, super_token) = common::user_with_token(&app, &pool, "root", "SUPERADMIN").await;
    let target = common::create_user(&pool, "calon", "USER").await;

    let uri = format!("/api/admin/users/{}/role", target.id);

    let response = put_json_auth(app.clone(), &uri, json!({ "role": "ADMIN" }), &admin_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = put_json_auth(app.clone(), &uri, json!({ "role": "OWNER" }), &super_token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json_auth(app.clone(), &uri, json!({ "role": 2 }), &super_token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");

    let response = put_json_auth(app.clone(), &uri, json!({ "role": "ADMIN" }), &super_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["role"], "ADMIN");

    // Nobody changes their own role.
    let own = format!("/api/admin/users/{}/role", superadmin.id);
    let response = put_json_auth(app.clone(), &own, json!({ "role": "USER" }), &super_token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // A plain admin cannot edit another admin.
    let response = put_json_auth(
        app,
        &format!("/api/admin/users/{}", target.id),
        json!({ "name": "Diubah" }),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_user_rules(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (admin, token) = common::user_with_token(&app, &pool, "admin", "ADMIN").await;
    let other_admin = common::create_user(&pool, "admin2", "ADMIN").await;
    let user = common::create_user(&pool, "pergi", "USER").await;

    let response = delete_auth(app.clone(), &format!("/api/admin/users/{}", admin.id), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = delete_auth(app.clone(), &format!("/api/admin/users/{}", other_admin.id), &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(app.clone(), &format!("/api/admin/users/{}", user.id), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app, &format!("/api/admin/users/{}", user.id), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn admin_cannot_deactivate_self(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (admin, token) = common::user_with_token(&app, &pool, "admin", "ADMIN").await;

    let response = put_json_auth(
        app,
        &format!("/api/admin/users/{}", admin.id),
        json!({ "is_active": false }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn reset_password(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_admin, token) = common::user_with_token(&app, &pool, "admin", "ADMIN").await;
    let user = common::create_user(&pool, "lupa", "USER").await;

    let response = post_json_auth(
        app.clone(),
        &format!("/api/admin/users/{}/reset-password", user.id),
        json!({ "password": "sandi-baru-99" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = post_json_auth(
        app.clone(),
        &format!("/api/admin/users/{}/reset-password", user.id),
        json!({}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");

    let body = json!({ "email": user.email, "password": "sandi-baru-99" });
    let response = post_json(app, "/api/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Link categories
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn category_crud(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_admin, token) = common::user_with_token(&app, &pool, "admin", "ADMIN").await;

    let response = post_json_auth(
        app.clone(),
        "/api/admin/categories",
        json!({ "name": "Kuliner", "icon": "utensils" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = post_json_auth(
        app.clone(),
        "/api/admin/categories",
        json!({ "name": "Kuliner" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = put_json_auth(
        app.clone(),
        &format!("/api/admin/categories/{id}"),
        json!({ "clear_icon": true }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["data"]["icon"].is_null());

    let response = get_auth(app.clone(), "/api/admin/categories", &token).await;
    let json = body_json(response).await;
    let kuliner = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["name"] == "Kuliner")
        .cloned()
        .unwrap();
    assert_eq!(kuliner["link_count"], 0);

    let response = delete_auth(app.clone(), &format!("/api/admin/categories/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(app, "/api/public/categories").await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 5);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn platform_stats_counts(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_admin, token) = common::user_with_token(&app, &pool, "admin", "ADMIN").await;
    common::create_user(&pool, "satu", "USER").await;

    let response = get_auth(app, "/api/admin/stats", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["users"], 2);
    assert_eq!(json["data"]["linktrees"], 0);
    assert!(json["data"]["top_links"].as_array().unwrap().is_empty());
}
