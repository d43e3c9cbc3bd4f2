use axum::{
    extract::{Extension, Path, State},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use validator::Validate;

use crate::{
    error::AppError,
    models::course::{
        ApprovalStatus, Course, CourseResponse, CreateCourseRequest, SubmitCourseRequest,
        UpdateCourseRequest,
    },
    models::user::User,
    repositories::{course as course_repo, enrollment as enrollment_repo, transaction},
    services::authorize,
    state::AppState,
    validation::rules::{normalize_optional_text, require_non_blank},
};

pub async fn create_course(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<CreateCourseRequest>,
) -> Result<Json<CourseResponse>, AppError> {
    payload.validate()?;
    payload.price.validate()?;

    let course = Course::new(user.id, payload, Utc::now());
    course_repo::insert_course(&state.pool, &course).await?;

    Ok(Json(CourseResponse::from(course)))
}

pub async fn get_course(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(course_id): Path<String>,
) -> Result<Json<CourseResponse>, AppError> {
    let course = course_repo::fetch_course(&state.pool, &course_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

    // Hidden courses 404 rather than 403: their existence is not disclosed.
    if !authorize::can_view_course(&course, Some(&user)) {
        return Err(AppError::NotFound("Course not found".to_string()));
    }

    Ok(Json(CourseResponse::from(course)))
}

pub async fn list_my_courses(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<CourseResponse>>, AppError> {
    let courses = course_repo::list_courses_by_creator(&state.pool, &user.id).await?;
    Ok(Json(courses.into_iter().map(CourseResponse::from).collect()))
}

pub async fn update_course(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(course_id): Path<String>,
    Json(payload): Json<UpdateCourseRequest>,
) -> Result<Json<CourseResponse>, AppError> {
    validate_update(&payload)?;

    let mut course = authorize::ensure_course_owner(&state.pool, &course_id, &user).await?;
    course.apply_update(payload, Utc::now());
    course_repo::update_course_content(&state.pool, &course).await?;

    Ok(Json(CourseResponse::from(course)))
}

pub async fn delete_course(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(course_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let course = authorize::ensure_course_owner(&state.pool, &course_id, &user).await?;

    let enrollments = enrollment_repo::count_enrollments_for_course(&state.pool, &course.id).await?;
    if enrollments > 0 {
        return Err(AppError::Conflict(
            "Course has enrollments and cannot be deleted".to_string(),
        ));
    }

    // Lessons, sections and the course itself go in one transaction; no
    // orphaned children survive a partial failure.
    let mut tx = transaction::begin_transaction(&state.pool).await?;
    course_repo::delete_course_cascade(&mut tx, &course.id).await?;
    transaction::commit_transaction(tx).await?;

    Ok(Json(json!({"message": "Course deleted"})))
}

pub async fn submit_course(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(course_id): Path<String>,
    Json(payload): Json<SubmitCourseRequest>,
) -> Result<Json<CourseResponse>, AppError> {
    let course = authorize::ensure_course_owner(&state.pool, &course_id, &user).await?;

    // Already approved: idempotent success, nothing changes.
    if course.approval_status == ApprovalStatus::Approved {
        return Ok(Json(CourseResponse::from(course)));
    }

    let note = submission_note_for(&course, payload.description)?;
    course_repo::submit_course_for_approval(&state.pool, &course.id, note.as_deref(), Utc::now())
        .await?;

    let updated = course_repo::fetch_course(&state.pool, &course.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;
    Ok(Json(CourseResponse::from(updated)))
}

/// Resubmission after a rejection must carry a justification; a first
/// submission may carry one.
fn submission_note_for(
    course: &Course,
    description: Option<String>,
) -> Result<Option<String>, AppError> {
    if course.approval_status == ApprovalStatus::Rejected {
        let note = require_non_blank("description", description.as_deref().unwrap_or(""))?;
        return Ok(Some(note));
    }
    Ok(normalize_optional_text(description))
}

fn validate_update(payload: &UpdateCourseRequest) -> Result<(), AppError> {
    if let Some(title) = payload.title.as_deref() {
        require_non_blank("title", title)?;
    }
    if let Some(description) = payload.description.as_deref() {
        require_non_blank("description", description)?;
    }
    if let Some(why_this_course) = payload.why_this_course.as_deref() {
        require_non_blank("why_this_course", why_this_course)?;
    }
    if let Some(thumbnail_url) = payload.thumbnail_url.as_deref() {
        require_non_blank("thumbnail_url", thumbnail_url)?;
    }
    if let Some(price) = payload.price.as_ref() {
        price.validate()?;
    }
    Ok(())
}
