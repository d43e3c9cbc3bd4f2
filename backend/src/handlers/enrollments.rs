use axum::{
    extract::{Extension, Path, State},
    Json,
};
use chrono::Utc;

use crate::{
    error::AppError,
    models::enrollment::{
        EnrolledCourse, Enrollment, EnrollmentCheckResponse, EnrollmentResponse, EnrollmentType,
    },
    models::user::User,
    repositories::{course as course_repo, enrollment as enrollment_repo, transaction},
    state::AppState,
};

pub async fn enroll(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(course_id): Path<String>,
) -> Result<Json<EnrollmentResponse>, AppError> {
    let course = course_repo::fetch_course(&state.pool, &course_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

    if !course.is_publicly_visible() {
        return Err(AppError::Forbidden(
            "Course is not open for enrollment".to_string(),
        ));
    }

    // Explicit uniqueness check so the caller gets a clean conflict; the
    // unique index still backs this up under races.
    if enrollment_repo::enrollment_exists(&state.pool, &user.id, &course.id).await? {
        return Err(AppError::Conflict(
            "Already enrolled in this course".to_string(),
        ));
    }

    let enrollment = Enrollment::new(
        user.id,
        course.id.clone(),
        EnrollmentType::for_price_amount(course.price_amount),
        Utc::now(),
    );

    // Enrollment insert and counter increment commit as one unit; the
    // denormalized count cannot drift from the ledger.
    let mut tx = transaction::begin_transaction(&state.pool).await?;
    enrollment_repo::insert_enrollment(&mut tx, &enrollment).await?;
    course_repo::increment_total_enrollments(&mut tx, &course.id).await?;
    transaction::commit_transaction(tx).await?;

    Ok(Json(EnrollmentResponse::from(enrollment)))
}

pub async fn check_enrollment(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(course_id): Path<String>,
) -> Result<Json<EnrollmentCheckResponse>, AppError> {
    let enrolled = enrollment_repo::enrollment_exists(&state.pool, &user.id, &course_id).await?;
    Ok(Json(EnrollmentCheckResponse { enrolled }))
}

pub async fn my_enrollments(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<EnrolledCourse>>, AppError> {
    let enrollments =
        enrollment_repo::list_enrollments_with_course(&state.pool, &user.id).await?;
    Ok(Json(enrollments))
}
