//! Admin surface and the auth/auth_admin middleware pair, exercised with
//! real bearer tokens.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    middleware as axum_middleware,
    routing::{get, put},
    Router,
};
use chrono::Utc;
use serde_json::json;
use tower::ServiceExt;

use coursehub_backend::{
    handlers::admin,
    middleware as auth_middleware,
    models::user::{User, UserRole},
    repositories::{course as course_repo, user as user_repo},
    state::AppState,
    utils::jwt::create_access_token,
};

#[path = "support/mod.rs"]
mod support;

fn admin_app(state: AppState) -> Router {
    Router::new()
        .route("/api/admin/courses", get(admin::list_courses))
        .route(
            "/api/admin/courses/{id}/approve",
            put(admin::approve_course),
        )
        .route(
            "/api/admin/users/{id}/active",
            put(admin::set_user_active),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::auth_admin,
        ))
        .with_state(state)
}

fn bearer(state: &AppState, user: &User) -> String {
    let token = create_access_token(
        user,
        &state.config.jwt_secret,
        state.config.jwt_expiration_hours,
    )
    .expect("create token");
    format!("Bearer {}", token)
}

#[tokio::test]
async fn admin_routes_reject_anonymous_and_non_admin_callers() {
    let Some(pool) = support::try_test_pool().await else {
        return;
    };
    let user = support::seed_user(&pool, UserRole::User).await;
    let state = AppState::new(pool, support::test_config());
    let app = admin_app(state.clone());

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/admin/courses")
                .body(Body::empty())
                .expect("build request"),
        )
        .await
        .expect("call app");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/admin/courses")
                .header("authorization", bearer(&state, &user))
                .body(Body::empty())
                .expect("build request"),
        )
        .await
        .expect("call app");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_can_work_the_pending_queue() {
    let Some(pool) = support::try_test_pool().await else {
        return;
    };
    let creator = support::seed_user(&pool, UserRole::User).await;
    let admin_user = support::seed_user(&pool, UserRole::Admin).await;
    let course = support::seed_course(&pool, &creator.id, 0).await;
    course_repo::submit_course_for_approval(&pool, &course.id, None, Utc::now())
        .await
        .expect("submit course");

    let state = AppState::new(pool.clone(), support::test_config());
    let app = admin_app(state.clone());
    let auth_header = bearer(&state, &admin_user);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/admin/courses?approval_status=pending&per_page=100")
                .header("authorization", auth_header.clone())
                .body(Body::empty())
                .expect("build request"),
        )
        .await
        .expect("call app");
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), 1024 * 256)
        .await
        .expect("read body");
    let listed: serde_json::Value = serde_json::from_slice(&bytes).expect("parse list");
    let ids: Vec<&str> = listed["items"]
        .as_array()
        .expect("items array")
        .iter()
        .filter_map(|item| item["id"].as_str())
        .collect();
    assert!(ids.contains(&course.id.as_str()));

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/admin/courses/{}/approve", course.id))
                .header("authorization", auth_header)
                .body(Body::empty())
                .expect("build request"),
        )
        .await
        .expect("call app");
    assert_eq!(response.status(), StatusCode::OK);

    let approved = course_repo::fetch_course(&pool, &course.id)
        .await
        .expect("fetch course")
        .expect("course exists");
    assert!(approved.is_publicly_visible());
}

#[tokio::test]
async fn deactivating_a_user_locks_out_their_token() {
    let Some(pool) = support::try_test_pool().await else {
        return;
    };
    let admin_user = support::seed_user(&pool, UserRole::Admin).await;
    let victim = support::seed_user(&pool, UserRole::Admin).await;

    let state = AppState::new(pool.clone(), support::test_config());
    let app = admin_app(state.clone());

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/admin/users/{}/active", victim.id))
                .header("authorization", bearer(&state, &admin_user))
                .header("content-type", "application/json")
                .body(Body::from(json!({"is_active": false}).to_string()))
                .expect("build request"),
        )
        .await
        .expect("call app");
    assert_eq!(response.status(), StatusCode::OK);

    let stored = user_repo::find_user_by_id(&pool, &victim.id)
        .await
        .expect("fetch user")
        .expect("user exists");
    assert!(!stored.is_active);

    // The victim's still-valid JWT no longer passes the middleware.
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/admin/courses")
                .header("authorization", bearer(&state, &victim))
                .body(Body::empty())
                .expect("build request"),
        )
        .await
        .expect("call app");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn set_active_on_missing_user_is_not_found() {
    let Some(pool) = support::try_test_pool().await else {
        return;
    };
    let admin_user = support::seed_user(&pool, UserRole::Admin).await;
    let state = AppState::new(pool, support::test_config());
    let app = admin_app(state.clone());

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/admin/users/{}/active", uuid::Uuid::new_v4()))
                .header("authorization", bearer(&state, &admin_user))
                .header("content-type", "application/json")
                .body(Body::from(json!({"is_active": true}).to_string()))
                .expect("build request"),
        )
        .await
        .expect("call app");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
