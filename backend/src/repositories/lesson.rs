use sqlx::{postgres::PgTransaction, PgPool};

use crate::models::lesson::Lesson;

const LESSON_COLUMNS: &str = "id, course_id, section_id, title, lesson_type, content_url, \
     asset_id, duration_seconds, order_no, is_visible, created_at, updated_at";

pub async fn insert_lesson(
    tx: &mut PgTransaction<'_>,
    lesson: &Lesson,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO lessons \
         (id, course_id, section_id, title, lesson_type, content_url, asset_id, \
          duration_seconds, order_no, is_visible, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
    )
    .bind(&lesson.id)
    .bind(&lesson.course_id)
    .bind(&lesson.section_id)
    .bind(&lesson.title)
    .bind(lesson.lesson_type.db_value())
    .bind(&lesson.content_url)
    .bind(&lesson.asset_id)
    .bind(lesson.duration_seconds)
    .bind(lesson.order_no)
    .bind(lesson.is_visible)
    .bind(lesson.created_at)
    .bind(lesson.updated_at)
    .execute(&mut **tx)
    .await
    .map(|_| ())
}

pub async fn fetch_lesson(pool: &PgPool, id: &str) -> Result<Option<Lesson>, sqlx::Error> {
    sqlx::query_as::<_, Lesson>(&format!(
        "SELECT {} FROM lessons WHERE id = $1",
        LESSON_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn order_no_taken(
    pool: &PgPool,
    section_id: &str,
    order_no: i32,
) -> Result<bool, sqlx::Error> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM lessons WHERE section_id = $1 AND order_no = $2)",
    )
    .bind(section_id)
    .bind(order_no)
    .fetch_one(pool)
    .await?;
    Ok(exists)
}

/// Lessons of a section in explicit order. Hidden lessons are filtered out
/// unless the caller may manage the course.
pub async fn list_lessons(
    pool: &PgPool,
    section_id: &str,
    include_hidden: bool,
) -> Result<Vec<Lesson>, sqlx::Error> {
    if include_hidden {
        sqlx::query_as::<_, Lesson>(&format!(
            "SELECT {} FROM lessons WHERE section_id = $1 ORDER BY order_no ASC",
            LESSON_COLUMNS
        ))
        .bind(section_id)
        .fetch_all(pool)
        .await
    } else {
        sqlx::query_as::<_, Lesson>(&format!(
            "SELECT {} FROM lessons WHERE section_id = $1 AND is_visible = TRUE \
             ORDER BY order_no ASC",
            LESSON_COLUMNS
        ))
        .bind(section_id)
        .fetch_all(pool)
        .await
    }
}

pub async fn delete_lesson(tx: &mut PgTransaction<'_>, id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM lessons WHERE id = $1")
        .bind(id)
        .execute(&mut **tx)
        .await
        .map(|_| ())
}
