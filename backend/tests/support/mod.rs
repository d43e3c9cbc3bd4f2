#![allow(dead_code)]

use chrono::Utc;
use coursehub_backend::{
    config::Config,
    models::{
        course::{Course, CreateCourseRequest, Price},
        user::{User, UserRole},
    },
    repositories::{course as course_repo, user as user_repo},
    utils::password::hash_password,
};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};
use uuid::Uuid;

pub fn test_config() -> Config {
    Config {
        database_url: env::var("TEST_DATABASE_URL")
            .or_else(|_| env::var("DATABASE_URL"))
            .unwrap_or_default(),
        jwt_secret: "a_secure_token_that_is_long_enough_123".into(),
        jwt_expiration_hours: 1,
        refresh_token_expiration_days: 7,
    }
}

/// Connects to the integration database and runs migrations. Returns `None`
/// (and the suite skips) when no database is configured.
pub async fn try_test_pool() -> Option<PgPool> {
    let database_url = match env::var("TEST_DATABASE_URL").or_else(|_| env::var("DATABASE_URL")) {
        Ok(url) => url,
        Err(_) => {
            eprintln!("skipping: TEST_DATABASE_URL / DATABASE_URL not set");
            return None;
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&database_url)
        .await
        .expect("connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("run migrations");

    Some(pool)
}

async fn insert_user_with_password_hash(
    pool: &PgPool,
    role: UserRole,
    password_hash: String,
) -> User {
    let user = User::new(
        format!("user_{}@example.com", Uuid::new_v4()),
        password_hash,
        "Test User".into(),
        role,
    );
    user_repo::insert_user(pool, &user).await.expect("insert user");
    user
}

pub async fn seed_user(pool: &PgPool, role: UserRole) -> User {
    insert_user_with_password_hash(pool, role, "hash".into()).await
}

pub async fn seed_user_with_password(pool: &PgPool, role: UserRole, password: &str) -> User {
    let password_hash = hash_password(password).expect("hash password");
    insert_user_with_password_hash(pool, role, password_hash).await
}

pub fn course_payload(price_amount: i64) -> CreateCourseRequest {
    CreateCourseRequest {
        title: format!("Course {}", Uuid::new_v4()),
        description: "A course for integration tests.".into(),
        why_this_course: "Because the workflow needs exercising.".into(),
        thumbnail_url: "https://cdn.example.com/thumb.png".into(),
        price: Price {
            amount: price_amount,
            currency: "IDR".into(),
        },
        level: None,
        language: None,
        tags: Some(vec!["testing".into()]),
    }
}

pub async fn seed_course(pool: &PgPool, creator_id: &str, price_amount: i64) -> Course {
    let course = Course::new(creator_id.to_string(), course_payload(price_amount), Utc::now());
    course_repo::insert_course(pool, &course)
        .await
        .expect("insert course");
    course
}

/// Seeds a course already visible in the catalog.
pub async fn seed_approved_course(pool: &PgPool, creator_id: &str, price_amount: i64) -> Course {
    let course = seed_course(pool, creator_id, price_amount).await;
    course_repo::approve_course(pool, &course.id, creator_id, Utc::now())
        .await
        .expect("approve course");
    course_repo::fetch_course(pool, &course.id)
        .await
        .expect("fetch course")
        .expect("course exists")
}
