use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::Type, ToSchema, Default, PartialEq, Eq)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    #[default]
    Enrolled,
    Completed,
    Dropped,
}

impl EnrollmentStatus {
    pub fn db_value(&self) -> &'static str {
        match self {
            EnrollmentStatus::Enrolled => "enrolled",
            EnrollmentStatus::Completed => "completed",
            EnrollmentStatus::Dropped => "dropped",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::Type, ToSchema, PartialEq, Eq)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentType {
    Paid,
    Free,
    Gifted,
}

impl EnrollmentType {
    pub fn db_value(&self) -> &'static str {
        match self {
            EnrollmentType::Paid => "paid",
            EnrollmentType::Free => "free",
            EnrollmentType::Gifted => "gifted",
        }
    }

    /// Free when the course costs nothing, paid otherwise.
    pub fn for_price_amount(amount: i64) -> Self {
        if amount == 0 {
            EnrollmentType::Free
        } else {
            EnrollmentType::Paid
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Enrollment {
    pub id: String,
    pub user_id: String,
    pub course_id: String,
    pub status: EnrollmentStatus,
    /// Completion percentage, 0..=100.
    pub progress: i16,
    pub enrollment_type: EnrollmentType,
    pub enrolled_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Enrollment {
    pub fn new(
        user_id: String,
        course_id: String,
        enrollment_type: EnrollmentType,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            course_id,
            status: EnrollmentStatus::Enrolled,
            progress: 0,
            enrollment_type,
            enrolled_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EnrollmentResponse {
    pub id: String,
    pub user_id: String,
    pub course_id: String,
    pub status: EnrollmentStatus,
    pub progress: i16,
    pub enrollment_type: EnrollmentType,
    pub enrolled_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Enrollment> for EnrollmentResponse {
    fn from(enrollment: Enrollment) -> Self {
        Self {
            id: enrollment.id,
            user_id: enrollment.user_id,
            course_id: enrollment.course_id,
            status: enrollment.status,
            progress: enrollment.progress,
            enrollment_type: enrollment.enrollment_type,
            enrolled_at: enrollment.enrolled_at,
            updated_at: enrollment.updated_at,
        }
    }
}

/// Enrollment joined with a minimal course/creator projection for the
/// "my enrollments" listing.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EnrolledCourse {
    pub id: String,
    pub course_id: String,
    pub status: EnrollmentStatus,
    pub progress: i16,
    pub enrollment_type: EnrollmentType,
    pub enrolled_at: DateTime<Utc>,
    pub course_title: String,
    pub course_thumbnail_url: String,
    pub creator_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EnrollmentCheckResponse {
    pub enrolled: bool,
}
