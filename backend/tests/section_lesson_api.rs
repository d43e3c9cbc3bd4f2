use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    routing::{delete, get, post},
    Extension, Router,
};
use chrono::Utc;
use serde_json::json;
use tower::ServiceExt;

use coursehub_backend::{
    handlers::{lessons, sections},
    models::{
        lesson::{Lesson, LessonResponse, LessonType},
        section::{Section, SectionResponse},
        user::{User, UserRole},
    },
    repositories::{course as course_repo, lesson as lesson_repo, section as section_repo},
    state::AppState,
};

#[path = "support/mod.rs"]
mod support;

fn content_router(state: AppState, user: User) -> Router {
    Router::new()
        .route(
            "/api/courses/{id}/sections",
            post(sections::create_section).get(sections::list_sections),
        )
        .route("/api/sections/{id}", delete(sections::delete_section))
        .route("/api/sections/{id}/lessons", get(lessons::list_lessons))
        .route(
            "/api/courses/{course_id}/sections/{section_id}/lessons",
            post(lessons::create_lesson),
        )
        .route("/api/lessons/{id}", delete(lessons::delete_lesson))
        .layer(Extension(user))
        .with_state(state)
}

fn lesson_body(order_no: i32) -> String {
    json!({
        "title": format!("Lesson {}", order_no),
        "lesson_type": "video",
        "content_url": "https://media.example.com/v/1",
        "duration_seconds": 120,
        "order_no": order_no
    })
    .to_string()
}

#[tokio::test]
async fn duplicate_section_order_no_conflicts() {
    let Some(pool) = support::try_test_pool().await else {
        return;
    };
    let creator = support::seed_user(&pool, UserRole::User).await;
    let course = support::seed_course(&pool, &creator.id, 0).await;
    let state = AppState::new(pool, support::test_config());
    let app = content_router(state, creator);

    let request = |order_no: i32| {
        Request::builder()
            .method("POST")
            .uri(format!("/api/courses/{}/sections", course.id))
            .header("content-type", "application/json")
            .body(Body::from(
                json!({"title": "Basics", "order_no": order_no}).to_string(),
            ))
            .expect("build request")
    };

    let response = app.clone().oneshot(request(1)).await.expect("call app");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(request(1)).await.expect("call app");
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn sections_list_in_ascending_order() {
    let Some(pool) = support::try_test_pool().await else {
        return;
    };
    let creator = support::seed_user(&pool, UserRole::User).await;
    let course = support::seed_course(&pool, &creator.id, 0).await;

    for order_no in [3, 1, 2] {
        let section = Section::new(
            course.id.clone(),
            format!("Section {}", order_no),
            order_no,
            Utc::now(),
        );
        section_repo::insert_section(&pool, &section)
            .await
            .expect("insert section");
    }

    let state = AppState::new(pool, support::test_config());
    let app = content_router(state, creator);

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/courses/{}/sections", course.id))
                .body(Body::empty())
                .expect("build request"),
        )
        .await
        .expect("call app");

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), 1024 * 64)
        .await
        .expect("read body");
    let listed: Vec<SectionResponse> = serde_json::from_slice(&bytes).expect("parse sections");
    let orders: Vec<i32> = listed.iter().map(|s| s.order_no).collect();
    assert_eq!(orders, vec![1, 2, 3]);
}

#[tokio::test]
async fn create_lesson_rejects_mismatched_course() {
    let Some(pool) = support::try_test_pool().await else {
        return;
    };
    let creator = support::seed_user(&pool, UserRole::User).await;
    let course_x = support::seed_course(&pool, &creator.id, 0).await;
    let course_y = support::seed_course(&pool, &creator.id, 0).await;

    let section = Section::new(course_x.id.clone(), "Basics".into(), 1, Utc::now());
    section_repo::insert_section(&pool, &section)
        .await
        .expect("insert section");

    let state = AppState::new(pool, support::test_config());
    let app = content_router(state, creator);

    // Section belongs to course X, path names course Y.
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!(
                    "/api/courses/{}/sections/{}/lessons",
                    course_y.id, section.id
                ))
                .header("content-type", "application/json")
                .body(Body::from(lesson_body(1)))
                .expect("build request"),
        )
        .await
        .expect("call app");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_lesson_updates_course_aggregates() {
    let Some(pool) = support::try_test_pool().await else {
        return;
    };
    let creator = support::seed_user(&pool, UserRole::User).await;
    let course = support::seed_course(&pool, &creator.id, 0).await;

    let section = Section::new(course.id.clone(), "Basics".into(), 1, Utc::now());
    section_repo::insert_section(&pool, &section)
        .await
        .expect("insert section");

    let state = AppState::new(pool.clone(), support::test_config());
    let app = content_router(state, creator);

    for order_no in [1, 2] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!(
                        "/api/courses/{}/sections/{}/lessons",
                        course.id, section.id
                    ))
                    .header("content-type", "application/json")
                    .body(Body::from(lesson_body(order_no)))
                    .expect("build request"),
            )
            .await
            .expect("call app");
        assert_eq!(response.status(), StatusCode::OK);
    }

    let updated = course_repo::fetch_course(&pool, &course.id)
        .await
        .expect("fetch course")
        .expect("course exists");
    assert_eq!(updated.total_lessons, 2);
    assert_eq!(updated.total_duration, 240);
}

#[tokio::test]
async fn duplicate_lesson_order_no_conflicts() {
    let Some(pool) = support::try_test_pool().await else {
        return;
    };
    let creator = support::seed_user(&pool, UserRole::User).await;
    let course = support::seed_course(&pool, &creator.id, 0).await;
    let section = Section::new(course.id.clone(), "Basics".into(), 1, Utc::now());
    section_repo::insert_section(&pool, &section)
        .await
        .expect("insert section");

    let state = AppState::new(pool, support::test_config());
    let app = content_router(state, creator);

    let request = || {
        Request::builder()
            .method("POST")
            .uri(format!(
                "/api/courses/{}/sections/{}/lessons",
                course.id, section.id
            ))
            .header("content-type", "application/json")
            .body(Body::from(lesson_body(1)))
            .expect("build request")
    };

    let response = app.clone().oneshot(request()).await.expect("call app");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(request()).await.expect("call app");
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn deleting_a_section_removes_its_lessons() {
    let Some(pool) = support::try_test_pool().await else {
        return;
    };
    let creator = support::seed_user(&pool, UserRole::User).await;
    let course = support::seed_course(&pool, &creator.id, 0).await;
    let section = Section::new(course.id.clone(), "Basics".into(), 1, Utc::now());
    section_repo::insert_section(&pool, &section)
        .await
        .expect("insert section");

    let state = AppState::new(pool.clone(), support::test_config());
    let app = content_router(state, creator);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!(
                    "/api/courses/{}/sections/{}/lessons",
                    course.id, section.id
                ))
                .header("content-type", "application/json")
                .body(Body::from(lesson_body(1)))
                .expect("build request"),
        )
        .await
        .expect("call app");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/sections/{}", section.id))
                .body(Body::empty())
                .expect("build request"),
        )
        .await
        .expect("call app");
    assert_eq!(response.status(), StatusCode::OK);

    let remaining = lesson_repo::list_lessons(&pool, &section.id, true)
        .await
        .expect("list lessons");
    assert!(remaining.is_empty());

    let updated = course_repo::fetch_course(&pool, &course.id)
        .await
        .expect("fetch course")
        .expect("course exists");
    assert_eq!(updated.total_lessons, 0);
    assert_eq!(updated.total_duration, 0);
}

#[tokio::test]
async fn hidden_lessons_are_filtered_for_non_managers() {
    let Some(pool) = support::try_test_pool().await else {
        return;
    };
    let creator = support::seed_user(&pool, UserRole::User).await;
    let stranger = support::seed_user(&pool, UserRole::User).await;
    let course = support::seed_approved_course(&pool, &creator.id, 0).await;
    let section = Section::new(course.id.clone(), "Basics".into(), 1, Utc::now());
    section_repo::insert_section(&pool, &section)
        .await
        .expect("insert section");

    let visible = Lesson::new(
        course.id.clone(),
        section.id.clone(),
        coursehub_backend::models::lesson::CreateLessonRequest {
            title: "Visible".into(),
            lesson_type: LessonType::Video,
            content_url: "https://media.example.com/v/1".into(),
            asset_id: None,
            duration_seconds: Some(60),
            order_no: 1,
            is_visible: Some(true),
        },
        Utc::now(),
    );
    let hidden = Lesson::new(
        course.id.clone(),
        section.id.clone(),
        coursehub_backend::models::lesson::CreateLessonRequest {
            title: "Hidden".into(),
            lesson_type: LessonType::File,
            content_url: "https://media.example.com/f/2".into(),
            asset_id: None,
            duration_seconds: Some(60),
            order_no: 2,
            is_visible: Some(false),
        },
        Utc::now(),
    );
    for lesson in [&visible, &hidden] {
        let mut tx = coursehub_backend::repositories::transaction::begin_transaction(&pool)
            .await
            .expect("begin");
        lesson_repo::insert_lesson(&mut tx, lesson)
            .await
            .expect("insert lesson");
        coursehub_backend::repositories::transaction::commit_transaction(tx)
            .await
            .expect("commit");
    }

    let state = AppState::new(pool, support::test_config());

    let response = content_router(state.clone(), stranger)
        .oneshot(
            Request::builder()
                .uri(format!("/api/sections/{}/lessons", section.id))
                .body(Body::empty())
                .expect("build request"),
        )
        .await
        .expect("call app");
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), 1024 * 64)
        .await
        .expect("read body");
    let listed: Vec<LessonResponse> = serde_json::from_slice(&bytes).expect("parse lessons");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "Visible");

    let response = content_router(state, creator)
        .oneshot(
            Request::builder()
                .uri(format!("/api/sections/{}/lessons", section.id))
                .body(Body::empty())
                .expect("build request"),
        )
        .await
        .expect("call app");
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), 1024 * 64)
        .await
        .expect("read body");
    let listed: Vec<LessonResponse> = serde_json::from_slice(&bytes).expect("parse lessons");
    assert_eq!(listed.len(), 2);
}
