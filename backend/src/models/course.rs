//! Course entity, its lifecycle enums, and the payloads that mutate it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::Type, ToSchema, Default, PartialEq, Eq)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
/// Author-facing lifecycle of a course. `Archived` is reserved: no transition
/// currently produces it.
pub enum CourseState {
    #[default]
    Draft,
    Published,
    Archived,
}

impl CourseState {
    pub fn db_value(&self) -> &'static str {
        match self {
            CourseState::Draft => "draft",
            CourseState::Published => "published",
            CourseState::Archived => "archived",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::Type, ToSchema, Default, PartialEq, Eq)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
/// Moderation verdict, orthogonal to [`CourseState`].
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn db_value(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::Type, ToSchema, Default, PartialEq, Eq)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CourseLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl CourseLevel {
    pub fn db_value(&self) -> &'static str {
        match self {
            CourseLevel::Beginner => "beginner",
            CourseLevel::Intermediate => "intermediate",
            CourseLevel::Advanced => "advanced",
        }
    }
}

/// Price of a course. Replaced wholesale on update, never deep-merged.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Price {
    /// Amount in minor currency units; zero marks a free course.
    pub amount: i64,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Course {
    pub id: String,
    pub creator_id: String,
    pub title: String,
    pub description: String,
    pub why_this_course: String,
    pub thumbnail_url: String,
    pub price_amount: i64,
    pub price_currency: String,
    pub level: CourseLevel,
    pub language: String,
    pub tags: Vec<String>,
    pub state: CourseState,
    pub approval_status: ApprovalStatus,
    /// Justification supplied when resubmitting after a rejection.
    pub submission_note: Option<String>,
    /// Admin-supplied reason for the most recent rejection.
    pub rejection_reason: Option<String>,
    pub approved_by: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub total_enrollments: i64,
    pub average_rating: f64,
    pub total_reviews: i64,
    pub total_lessons: i64,
    pub total_duration: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Course {
    pub fn new(creator_id: String, payload: CreateCourseRequest, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            creator_id,
            title: payload.title,
            description: payload.description,
            why_this_course: payload.why_this_course,
            thumbnail_url: payload.thumbnail_url,
            price_amount: payload.price.amount,
            price_currency: payload.price.currency,
            level: payload.level.unwrap_or_default(),
            language: payload.language.unwrap_or_else(|| "en".to_string()),
            tags: payload.tags.unwrap_or_default(),
            state: CourseState::Draft,
            approval_status: ApprovalStatus::Pending,
            submission_note: None,
            rejection_reason: None,
            approved_by: None,
            published_at: None,
            total_enrollments: 0,
            average_rating: 0.0,
            total_reviews: 0,
            total_lessons: 0,
            total_duration: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Publicly browsable/enrollable iff published and approved. Every other
    /// combination is visible only to the creator and administrators.
    pub fn is_publicly_visible(&self) -> bool {
        self.state == CourseState::Published && self.approval_status == ApprovalStatus::Approved
    }

    /// Partial-merge semantics: fields present in the payload overwrite,
    /// absent fields are untouched. Price replaces wholesale.
    pub fn apply_update(&mut self, payload: UpdateCourseRequest, now: DateTime<Utc>) {
        if let Some(title) = payload.title {
            self.title = title;
        }
        if let Some(description) = payload.description {
            self.description = description;
        }
        if let Some(why_this_course) = payload.why_this_course {
            self.why_this_course = why_this_course;
        }
        if let Some(thumbnail_url) = payload.thumbnail_url {
            self.thumbnail_url = thumbnail_url;
        }
        if let Some(price) = payload.price {
            self.price_amount = price.amount;
            self.price_currency = price.currency;
        }
        if let Some(level) = payload.level {
            self.level = level;
        }
        if let Some(language) = payload.language {
            self.language = language;
        }
        if let Some(tags) = payload.tags {
            self.tags = tags;
        }
        self.updated_at = now;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCourseRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(length(min = 1))]
    pub why_this_course: String,
    #[validate(length(min = 1))]
    pub thumbnail_url: String,
    pub price: Price,
    pub level: Option<CourseLevel>,
    pub language: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl Validate for Price {
    fn validate(&self) -> Result<(), validator::ValidationErrors> {
        let mut errors = validator::ValidationErrors::new();
        if self.amount < 0 {
            errors.add("amount", validator::ValidationError::new("negative_amount"));
        }
        if self.currency.trim().is_empty() {
            errors.add("currency", validator::ValidationError::new("length"));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, ToSchema)]
pub struct UpdateCourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub why_this_course: Option<String>,
    pub thumbnail_url: Option<String>,
    pub price: Option<Price>,
    pub level: Option<CourseLevel>,
    pub language: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, ToSchema)]
/// Body of a submit-for-approval call. The description is mandatory only when
/// resubmitting a rejected course.
pub struct SubmitCourseRequest {
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CourseResponse {
    pub id: String,
    pub creator_id: String,
    pub title: String,
    pub description: String,
    pub why_this_course: String,
    pub thumbnail_url: String,
    pub price: Price,
    pub level: CourseLevel,
    pub language: String,
    pub tags: Vec<String>,
    pub state: CourseState,
    pub approval_status: ApprovalStatus,
    pub submission_note: Option<String>,
    pub rejection_reason: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub total_enrollments: i64,
    pub average_rating: f64,
    pub total_reviews: i64,
    pub total_lessons: i64,
    pub total_duration: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Course> for CourseResponse {
    fn from(course: Course) -> Self {
        Self {
            id: course.id,
            creator_id: course.creator_id,
            title: course.title,
            description: course.description,
            why_this_course: course.why_this_course,
            thumbnail_url: course.thumbnail_url,
            price: Price {
                amount: course.price_amount,
                currency: course.price_currency,
            },
            level: course.level,
            language: course.language,
            tags: course.tags,
            state: course.state,
            approval_status: course.approval_status,
            submission_note: course.submission_note,
            rejection_reason: course.rejection_reason,
            published_at: course.published_at,
            total_enrollments: course.total_enrollments,
            average_rating: course.average_rating,
            total_reviews: course.total_reviews,
            total_lessons: course.total_lessons,
            total_duration: course.total_duration,
            created_at: course.created_at,
            updated_at: course.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_create() -> CreateCourseRequest {
        CreateCourseRequest {
            title: "Rust for Backend Engineers".into(),
            description: "A practical course.".into(),
            why_this_course: "Learn by building.".into(),
            thumbnail_url: "https://cdn.example.com/thumb.png".into(),
            price: Price {
                amount: 499_000,
                currency: "IDR".into(),
            },
            level: None,
            language: None,
            tags: Some(vec!["rust".into(), "backend".into()]),
        }
    }

    #[test]
    fn new_course_starts_as_draft_pending() {
        let course = Course::new("creator-1".into(), sample_create(), Utc::now());
        assert_eq!(course.state, CourseState::Draft);
        assert_eq!(course.approval_status, ApprovalStatus::Pending);
        assert!(!course.is_publicly_visible());
        assert_eq!(course.level, CourseLevel::Beginner);
        assert_eq!(course.language, "en");
    }

    #[test]
    fn visibility_requires_published_and_approved() {
        let mut course = Course::new("creator-1".into(), sample_create(), Utc::now());

        course.state = CourseState::Published;
        course.approval_status = ApprovalStatus::Pending;
        assert!(!course.is_publicly_visible());

        course.approval_status = ApprovalStatus::Approved;
        assert!(course.is_publicly_visible());

        course.approval_status = ApprovalStatus::Rejected;
        assert!(!course.is_publicly_visible());

        course.state = CourseState::Archived;
        course.approval_status = ApprovalStatus::Approved;
        assert!(!course.is_publicly_visible());
    }

    #[test]
    fn apply_update_merges_present_fields_only() {
        let now = Utc::now();
        let mut course = Course::new("creator-1".into(), sample_create(), now);
        let original_description = course.description.clone();

        course.apply_update(
            UpdateCourseRequest {
                title: Some("Renamed".into()),
                price: Some(Price {
                    amount: 0,
                    currency: "USD".into(),
                }),
                ..Default::default()
            },
            now,
        );

        assert_eq!(course.title, "Renamed");
        assert_eq!(course.description, original_description);
        // price replaced wholesale, both fields
        assert_eq!(course.price_amount, 0);
        assert_eq!(course.price_currency, "USD");
    }

    #[test]
    fn create_course_rejects_negative_price_and_blank_title() {
        let mut payload = sample_create();
        payload.price.amount = -1;
        assert!(payload.price.validate().is_err());

        let mut payload = sample_create();
        payload.title = "".into();
        assert!(payload.validate().is_err());

        assert!(sample_create().validate().is_ok());
        assert!(sample_create().price.validate().is_ok());
    }
}
