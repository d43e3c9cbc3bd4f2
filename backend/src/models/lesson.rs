use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::Type, ToSchema, PartialEq, Eq)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LessonType {
    Video,
    File,
}

impl LessonType {
    pub fn db_value(&self) -> &'static str {
        match self {
            LessonType::Video => "video",
            LessonType::File => "file",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Lesson {
    pub id: String,
    /// Denormalized course reference; must equal the owning section's course.
    pub course_id: String,
    pub section_id: String,
    pub title: String,
    pub lesson_type: LessonType,
    /// URL returned by the media storage provider; bytes are never stored here.
    pub content_url: String,
    /// Opaque asset identifier at the media storage provider.
    pub asset_id: Option<String>,
    pub duration_seconds: i64,
    pub order_no: i32,
    pub is_visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lesson {
    pub fn new(
        course_id: String,
        section_id: String,
        payload: CreateLessonRequest,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            course_id,
            section_id,
            title: payload.title,
            lesson_type: payload.lesson_type,
            content_url: payload.content_url,
            asset_id: payload.asset_id,
            duration_seconds: payload.duration_seconds.unwrap_or(0),
            order_no: payload.order_no,
            is_visible: payload.is_visible.unwrap_or(true),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateLessonRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub lesson_type: LessonType,
    #[validate(length(min = 1))]
    pub content_url: String,
    pub asset_id: Option<String>,
    #[validate(range(min = 0))]
    pub duration_seconds: Option<i64>,
    #[validate(range(min = 0))]
    pub order_no: i32,
    pub is_visible: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LessonResponse {
    pub id: String,
    pub course_id: String,
    pub section_id: String,
    pub title: String,
    pub lesson_type: LessonType,
    pub content_url: String,
    pub asset_id: Option<String>,
    pub duration_seconds: i64,
    pub order_no: i32,
    pub is_visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Lesson> for LessonResponse {
    fn from(lesson: Lesson) -> Self {
        Self {
            id: lesson.id,
            course_id: lesson.course_id,
            section_id: lesson.section_id,
            title: lesson.title,
            lesson_type: lesson.lesson_type,
            content_url: lesson.content_url,
            asset_id: lesson.asset_id,
            duration_seconds: lesson.duration_seconds,
            order_no: lesson.order_no,
            is_visible: lesson.is_visible,
            created_at: lesson.created_at,
            updated_at: lesson.updated_at,
        }
    }
}
