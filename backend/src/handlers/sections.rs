use axum::{
    extract::{Extension, Path, State},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use validator::Validate;

use crate::{
    error::AppError,
    models::section::{CreateSectionRequest, Section, SectionResponse},
    models::user::User,
    repositories::{course as course_repo, section as section_repo, transaction},
    services::authorize,
    state::AppState,
};

pub async fn create_section(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(course_id): Path<String>,
    Json(payload): Json<CreateSectionRequest>,
) -> Result<Json<SectionResponse>, AppError> {
    payload.validate()?;
    let course = authorize::ensure_course_owner(&state.pool, &course_id, &user).await?;

    if section_repo::order_no_taken(&state.pool, &course.id, payload.order_no).await? {
        return Err(AppError::Conflict(format!(
            "Section position {} is already taken",
            payload.order_no
        )));
    }

    let section = Section::new(course.id, payload.title, payload.order_no, Utc::now());
    section_repo::insert_section(&state.pool, &section).await?;

    Ok(Json(SectionResponse::from(section)))
}

pub async fn list_sections(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(course_id): Path<String>,
) -> Result<Json<Vec<SectionResponse>>, AppError> {
    let course = course_repo::fetch_course(&state.pool, &course_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;
    if !authorize::can_view_course(&course, Some(&user)) {
        return Err(AppError::NotFound("Course not found".to_string()));
    }

    let sections = section_repo::list_sections(&state.pool, &course.id).await?;
    Ok(Json(
        sections.into_iter().map(SectionResponse::from).collect(),
    ))
}

pub async fn delete_section(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(section_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let (section, course) =
        authorize::ensure_section_owner(&state.pool, &section_id, &user).await?;

    // Child lessons, the section, and the aggregate refresh commit together.
    let mut tx = transaction::begin_transaction(&state.pool).await?;
    section_repo::delete_section_cascade(&mut tx, &section.id).await?;
    course_repo::recompute_lesson_aggregates(&mut tx, &course.id).await?;
    transaction::commit_transaction(tx).await?;

    Ok(Json(json!({"message": "Section deleted"})))
}
