use axum::{
    extract::{Extension, Path, State},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use validator::Validate;

use crate::{
    error::AppError,
    models::lesson::{CreateLessonRequest, Lesson, LessonResponse},
    models::user::User,
    repositories::{
        course as course_repo, lesson as lesson_repo, section as section_repo, transaction,
    },
    services::authorize,
    state::AppState,
};

pub async fn create_lesson(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path((course_id, section_id)): Path<(String, String)>,
    Json(payload): Json<CreateLessonRequest>,
) -> Result<Json<LessonResponse>, AppError> {
    payload.validate()?;
    let course = authorize::ensure_course_owner(&state.pool, &course_id, &user).await?;

    let section = section_repo::fetch_section(&state.pool, &section_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Section not found".to_string()))?;

    // Cross-reference integrity: the section must belong to the course named
    // in the path.
    if section.course_id != course.id {
        return Err(AppError::Validation(vec![
            "section_id: section does not belong to the given course".to_string(),
        ]));
    }

    if lesson_repo::order_no_taken(&state.pool, &section.id, payload.order_no).await? {
        return Err(AppError::Conflict(format!(
            "Lesson position {} is already taken",
            payload.order_no
        )));
    }

    let lesson = Lesson::new(course.id.clone(), section.id, payload, Utc::now());

    let mut tx = transaction::begin_transaction(&state.pool).await?;
    lesson_repo::insert_lesson(&mut tx, &lesson).await?;
    course_repo::recompute_lesson_aggregates(&mut tx, &course.id).await?;
    transaction::commit_transaction(tx).await?;

    Ok(Json(LessonResponse::from(lesson)))
}

pub async fn list_lessons(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(section_id): Path<String>,
) -> Result<Json<Vec<LessonResponse>>, AppError> {
    let section = section_repo::fetch_section(&state.pool, &section_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Section not found".to_string()))?;
    let course = course_repo::fetch_course(&state.pool, &section.course_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;
    if !authorize::can_view_course(&course, Some(&user)) {
        return Err(AppError::NotFound("Section not found".to_string()));
    }

    let include_hidden = authorize::can_manage_course(&course, &user);
    let lessons = lesson_repo::list_lessons(&state.pool, &section.id, include_hidden).await?;
    Ok(Json(lessons.into_iter().map(LessonResponse::from).collect()))
}

pub async fn delete_lesson(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(lesson_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let (lesson, course) = authorize::ensure_lesson_owner(&state.pool, &lesson_id, &user).await?;

    let mut tx = transaction::begin_transaction(&state.pool).await?;
    lesson_repo::delete_lesson(&mut tx, &lesson.id).await?;
    course_repo::recompute_lesson_aggregates(&mut tx, &course.id).await?;
    transaction::commit_transaction(tx).await?;

    Ok(Json(json!({"message": "Lesson deleted"})))
}
