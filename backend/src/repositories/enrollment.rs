use sqlx::{postgres::PgTransaction, PgPool};

use crate::models::enrollment::{EnrolledCourse, Enrollment};

pub async fn enrollment_exists(
    pool: &PgPool,
    user_id: &str,
    course_id: &str,
) -> Result<bool, sqlx::Error> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM enrollments WHERE user_id = $1 AND course_id = $2)",
    )
    .bind(user_id)
    .bind(course_id)
    .fetch_one(pool)
    .await?;
    Ok(exists)
}

pub async fn insert_enrollment(
    tx: &mut PgTransaction<'_>,
    enrollment: &Enrollment,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO enrollments \
         (id, user_id, course_id, status, progress, enrollment_type, enrolled_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(&enrollment.id)
    .bind(&enrollment.user_id)
    .bind(&enrollment.course_id)
    .bind(enrollment.status.db_value())
    .bind(enrollment.progress)
    .bind(enrollment.enrollment_type.db_value())
    .bind(enrollment.enrolled_at)
    .bind(enrollment.updated_at)
    .execute(&mut **tx)
    .await
    .map(|_| ())
}

pub async fn count_enrollments_for_course(
    pool: &PgPool,
    course_id: &str,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM enrollments WHERE course_id = $1")
        .bind(course_id)
        .fetch_one(pool)
        .await
}

/// The caller's enrollments joined with a minimal course/creator projection,
/// newest first.
pub async fn list_enrollments_with_course(
    pool: &PgPool,
    user_id: &str,
) -> Result<Vec<EnrolledCourse>, sqlx::Error> {
    sqlx::query_as::<_, EnrolledCourse>(
        "SELECT e.id, e.course_id, e.status, e.progress, e.enrollment_type, e.enrolled_at, \
         c.title AS course_title, c.thumbnail_url AS course_thumbnail_url, \
         u.full_name AS creator_name \
         FROM enrollments e \
         JOIN courses c ON c.id = e.course_id \
         JOIN users u ON u.id = c.creator_id \
         WHERE e.user_id = $1 \
         ORDER BY e.enrolled_at DESC, e.id DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
