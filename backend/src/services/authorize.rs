//! The single authorization capability for the content tree. Course, Section
//! and Lesson mutations all resolve to "is the actor the transitive course
//! creator"; handlers never compare creator ids themselves.

use sqlx::PgPool;

use crate::{
    error::AppError,
    models::{course::Course, section::Section, user::User},
    repositories::{course, lesson, section},
};

/// Loads the course and verifies the actor is its creator.
pub async fn ensure_course_owner(
    pool: &PgPool,
    course_id: &str,
    actor: &User,
) -> Result<Course, AppError> {
    let course = course::fetch_course(pool, course_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;
    ensure_owner_of(&course, actor)?;
    Ok(course)
}

/// Resolves a section to its course and verifies ownership transitively.
pub async fn ensure_section_owner(
    pool: &PgPool,
    section_id: &str,
    actor: &User,
) -> Result<(Section, Course), AppError> {
    let section = section::fetch_section(pool, section_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Section not found".to_string()))?;
    let course = course::fetch_course(pool, &section.course_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;
    ensure_owner_of(&course, actor)?;
    Ok((section, course))
}

/// Resolves a lesson to its course and verifies ownership transitively.
pub async fn ensure_lesson_owner(
    pool: &PgPool,
    lesson_id: &str,
    actor: &User,
) -> Result<(crate::models::lesson::Lesson, Course), AppError> {
    let lesson = lesson::fetch_lesson(pool, lesson_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Lesson not found".to_string()))?;
    let course = course::fetch_course(pool, &lesson.course_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;
    ensure_owner_of(&course, actor)?;
    Ok((lesson, course))
}

/// The ownership predicate itself.
pub fn ensure_owner_of(course: &Course, actor: &User) -> Result<(), AppError> {
    if course.creator_id != actor.id {
        return Err(AppError::Forbidden(
            "Only the course creator may modify this course".to_string(),
        ));
    }
    Ok(())
}

/// Read access: public visibility, or a privileged viewer (creator/admin).
pub fn can_view_course(course: &Course, viewer: Option<&User>) -> bool {
    if course.is_publicly_visible() {
        return true;
    }
    match viewer {
        Some(user) => user.is_admin() || course.creator_id == user.id,
        None => false,
    }
}

/// Management access gates hidden lessons and draft content.
pub fn can_manage_course(course: &Course, user: &User) -> bool {
    user.is_admin() || course.creator_id == user.id
}
