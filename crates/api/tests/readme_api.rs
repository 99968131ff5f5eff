//! HTTP-level integration tests for README retrieval, editing, history,
//! and the dashboard.
//!
//! Rows are seeded directly through the in-memory store; requests then go
//! through the full router, middleware included.

mod common;

use axum::http::StatusCode;
use common::{bearer_for, body_json, get, get_auth, patch_json, patch_json_auth};

use gitscribe_core::types::DbId;
use gitscribe_core::Identity;
use gitscribe_db::models::generated_readme::CreateGeneratedReadme;
use gitscribe_db::store::ReadmeStore;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Insert a row directly into the store backing the app under test.
async fn seed(
    app: &common::TestApp,
    repo_path: &str,
    short_id: &str,
    content: &str,
    user_id: Option<DbId>,
) {
    app.readmes
        .insert(&CreateGeneratedReadme {
            repo_path: repo_path.to_string(),
            short_id: short_id.to_string(),
            content: content.to_string(),
            user_id,
        })
        .await
        .expect("seed insert should succeed");
}

// ---------------------------------------------------------------------------
// Retrieval
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_latest_returns_the_newest_generation() {
    let app = common::build_test_app();
    seed(&app, "acme/widgets", "aaaa", "# old", None).await;
    seed(&app, "acme/widgets", "bbbb", "# new", None).await;

    let response = get(app.router, "/api/v1/readmes/acme/widgets").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["short_id"], "bbbb");
    assert_eq!(json["data"]["content"], "# new");
    assert_eq!(json["data"]["repo_path"], "acme/widgets");
}

/// Path params go through the URL parser, so lookups are case-insensitive.
#[tokio::test]
async fn test_lookup_is_case_insensitive() {
    let app = common::build_test_app();
    seed(&app, "acme/widgets", "ab12", "# Widgets", None).await;

    let response = get(app.router, "/api/v1/readmes/Acme/Widgets").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["short_id"], "ab12");
}

#[tokio::test]
async fn test_get_by_short_id_pins_one_generation() {
    let app = common::build_test_app();
    seed(&app, "acme/widgets", "aaaa", "# old", None).await;
    seed(&app, "acme/widgets", "bbbb", "# new", None).await;

    let response = get(app.router, "/api/v1/readmes/acme/widgets/aaaa").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["short_id"], "aaaa");
    assert_eq!(json["data"]["content"], "# old");
}

#[tokio::test]
async fn test_unknown_repo_and_unknown_short_id_return_404() {
    let app = common::build_test_app();
    seed(&app, "acme/widgets", "ab12", "# Widgets", None).await;

    let response = get(app.router.clone(), "/api/v1/readmes/acme/ghost").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "No README found for acme/ghost");

    let response = get(app.router, "/api/v1/readmes/acme/widgets/zz99").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], "No README found for acme/widgets with id zz99");
}

// ---------------------------------------------------------------------------
// Editing
// ---------------------------------------------------------------------------

/// Edits require a signed-in owner. A foreign row reads as 404, exactly
/// like a missing one.
#[tokio::test]
async fn test_update_content_is_owner_gated() {
    let app = common::build_test_app();
    seed(&app, "acme/widgets", "ab12", "original", Some(7)).await;
    let edit = serde_json::json!({ "content": "edited" });

    // No token at all.
    let response = patch_json(
        app.router.clone(),
        "/api/v1/readmes/acme/widgets/ab12",
        edit.clone(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert_eq!(json["error"], "Missing Authorization header");

    // Signed in, but not the owner.
    let response = patch_json_auth(
        app.router.clone(),
        "/api/v1/readmes/acme/widgets/ab12",
        edit.clone(),
        &bearer_for(8),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The owner.
    let response = patch_json_auth(
        app.router,
        "/api/v1/readmes/acme/widgets/ab12",
        edit,
        &bearer_for(7),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["content"], "edited");

    let row = app
        .readmes
        .find_by_path_and_short_id("acme/widgets", "ab12")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.content, "edited");
}

#[tokio::test]
async fn test_update_with_invalid_token_returns_401() {
    let app = common::build_test_app();
    seed(&app, "acme/widgets", "ab12", "original", Some(7)).await;

    let response = patch_json_auth(
        app.router,
        "/api/v1/readmes/acme/widgets/ab12",
        serde_json::json!({ "content": "edited" }),
        "not-a-real-token",
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid or expired token");
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_recent_requires_authentication() {
    let app = common::build_test_app();
    let response = get(app.router, "/api/v1/readmes/recent").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// History is scoped to the caller and ordered newest first. Anonymous
/// and foreign rows never appear.
#[tokio::test]
async fn test_recent_lists_the_callers_readmes_newest_first() {
    let app = common::build_test_app();
    seed(&app, "acme/widgets", "aaaa", "# mine, older", Some(7)).await;
    seed(&app, "acme/gears", "bbbb", "# theirs", Some(8)).await;
    seed(&app, "acme/sprockets", "cccc", "# anonymous", None).await;
    seed(&app, "acme/cogs", "dddd", "# mine, newer", Some(7)).await;

    let response = get_auth(app.router, "/api/v1/readmes/recent", &bearer_for(7)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let rows = json["data"].as_array().expect("data should be an array");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["short_id"], "dddd");
    assert_eq!(rows[1]["short_id"], "aaaa");
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_dashboard_requires_authentication() {
    let app = common::build_test_app();
    let response = get(app.router, "/api/v1/dashboard").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// The dashboard combines the caller's history with today's usage.
#[tokio::test]
async fn test_dashboard_combines_history_and_usage() {
    let app = common::build_test_app();
    seed(&app, "acme/widgets", "ab12", "# Widgets", Some(7)).await;
    app.quota.set_used(Identity::User(7), 5);

    let response = get_auth(app.router, "/api/v1/dashboard", &bearer_for(7)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    let readmes = json["data"]["readmes"]
        .as_array()
        .expect("readmes should be an array");
    assert_eq!(readmes.len(), 1);
    assert_eq!(readmes[0]["short_id"], "ab12");

    assert_eq!(json["data"]["usage"]["generations_today"], 5);
    assert!(
        json["data"]["usage"]["last_generated"].is_string(),
        "last_generated should carry the newest row's timestamp"
    );
}

/// A fresh user sees an empty dashboard rather than an error.
#[tokio::test]
async fn test_dashboard_is_empty_for_a_new_user() {
    let app = common::build_test_app();

    let response = get_auth(app.router, "/api/v1/dashboard", &bearer_for(9)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    assert_eq!(json["data"]["readmes"].as_array().unwrap().len(), 0);
    assert_eq!(json["data"]["usage"]["generations_today"], 0);
    assert!(json["data"]["usage"]["last_generated"].is_null());
}
