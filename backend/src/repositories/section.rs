use sqlx::{postgres::PgTransaction, PgPool};

use crate::models::section::Section;

const SECTION_COLUMNS: &str = "id, course_id, title, order_no, created_at, updated_at";

pub async fn insert_section(pool: &PgPool, section: &Section) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO sections (id, course_id, title, order_no, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(&section.id)
    .bind(&section.course_id)
    .bind(&section.title)
    .bind(section.order_no)
    .bind(section.created_at)
    .bind(section.updated_at)
    .execute(pool)
    .await
    .map(|_| ())
}

pub async fn fetch_section(pool: &PgPool, id: &str) -> Result<Option<Section>, sqlx::Error> {
    sqlx::query_as::<_, Section>(&format!(
        "SELECT {} FROM sections WHERE id = $1",
        SECTION_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Explicit pre-check behind the unique (course_id, order_no) index; gives
/// callers a typed conflict instead of a raw constraint violation.
pub async fn order_no_taken(
    pool: &PgPool,
    course_id: &str,
    order_no: i32,
) -> Result<bool, sqlx::Error> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM sections WHERE course_id = $1 AND order_no = $2)",
    )
    .bind(course_id)
    .bind(order_no)
    .fetch_one(pool)
    .await?;
    Ok(exists)
}

pub async fn list_sections(pool: &PgPool, course_id: &str) -> Result<Vec<Section>, sqlx::Error> {
    sqlx::query_as::<_, Section>(&format!(
        "SELECT {} FROM sections WHERE course_id = $1 ORDER BY order_no ASC",
        SECTION_COLUMNS
    ))
    .bind(course_id)
    .fetch_all(pool)
    .await
}

/// Deletes the section's lessons, then the section itself. Caller owns the
/// transaction and recomputes the course aggregates before committing.
pub async fn delete_section_cascade(
    tx: &mut PgTransaction<'_>,
    section_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM lessons WHERE section_id = $1")
        .bind(section_id)
        .execute(&mut **tx)
        .await?;
    sqlx::query("DELETE FROM sections WHERE id = $1")
        .bind(section_id)
        .execute(&mut **tx)
        .await
        .map(|_| ())
}
