use chrono::{DateTime, Utc};
use sqlx::{postgres::PgTransaction, PgPool, Postgres, QueryBuilder};

use crate::models::course::{ApprovalStatus, Course, CourseLevel, CourseState};

const COURSE_COLUMNS: &str = "id, creator_id, title, description, why_this_course, thumbnail_url, \
     price_amount, price_currency, level, language, tags, state, approval_status, \
     submission_note, rejection_reason, approved_by, published_at, total_enrollments, \
     average_rating, total_reviews, total_lessons, total_duration, created_at, updated_at";

/// Filters for the public catalog listing. Visibility is always enforced on
/// top of these.
#[derive(Debug, Clone, Default)]
pub struct CatalogFilters {
    pub q: Option<String>,
    pub level: Option<CourseLevel>,
    pub language: Option<String>,
    pub tag: Option<String>,
}

/// Filters for the admin course listing (moderation queue and beyond).
#[derive(Debug, Clone, Default)]
pub struct AdminCourseFilters {
    pub state: Option<CourseState>,
    pub approval_status: Option<ApprovalStatus>,
}

pub async fn insert_course(pool: &PgPool, course: &Course) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO courses \
         (id, creator_id, title, description, why_this_course, thumbnail_url, price_amount, \
          price_currency, level, language, tags, state, approval_status, submission_note, \
          rejection_reason, approved_by, published_at, total_enrollments, average_rating, \
          total_reviews, total_lessons, total_duration, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, \
          $18, $19, $20, $21, $22, $23, $24)",
    )
    .bind(&course.id)
    .bind(&course.creator_id)
    .bind(&course.title)
    .bind(&course.description)
    .bind(&course.why_this_course)
    .bind(&course.thumbnail_url)
    .bind(course.price_amount)
    .bind(&course.price_currency)
    .bind(course.level.db_value())
    .bind(&course.language)
    .bind(&course.tags)
    .bind(course.state.db_value())
    .bind(course.approval_status.db_value())
    .bind(&course.submission_note)
    .bind(&course.rejection_reason)
    .bind(&course.approved_by)
    .bind(course.published_at)
    .bind(course.total_enrollments)
    .bind(course.average_rating)
    .bind(course.total_reviews)
    .bind(course.total_lessons)
    .bind(course.total_duration)
    .bind(course.created_at)
    .bind(course.updated_at)
    .execute(pool)
    .await
    .map(|_| ())
}

pub async fn fetch_course(pool: &PgPool, id: &str) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "SELECT {} FROM courses WHERE id = $1",
        COURSE_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Persists the content fields after a partial merge; lifecycle fields are
/// mutated only through the dedicated workflow operations below.
pub async fn update_course_content(pool: &PgPool, course: &Course) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE courses SET title = $1, description = $2, why_this_course = $3, \
         thumbnail_url = $4, price_amount = $5, price_currency = $6, level = $7, \
         language = $8, tags = $9, updated_at = $10 WHERE id = $11",
    )
    .bind(&course.title)
    .bind(&course.description)
    .bind(&course.why_this_course)
    .bind(&course.thumbnail_url)
    .bind(course.price_amount)
    .bind(&course.price_currency)
    .bind(course.level.db_value())
    .bind(&course.language)
    .bind(&course.tags)
    .bind(course.updated_at)
    .bind(&course.id)
    .execute(pool)
    .await
    .map(|_| ())
}

pub async fn list_courses_by_creator(
    pool: &PgPool,
    creator_id: &str,
) -> Result<Vec<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "SELECT {} FROM courses WHERE creator_id = $1 ORDER BY created_at DESC, id DESC",
        COURSE_COLUMNS
    ))
    .bind(creator_id)
    .fetch_all(pool)
    .await
}

/// Removes the course and its whole content tree. The caller owns the
/// transaction so the cascade commits or rolls back as one unit.
pub async fn delete_course_cascade(
    tx: &mut PgTransaction<'_>,
    course_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM lessons WHERE course_id = $1")
        .bind(course_id)
        .execute(&mut **tx)
        .await?;
    sqlx::query("DELETE FROM sections WHERE course_id = $1")
        .bind(course_id)
        .execute(&mut **tx)
        .await?;
    sqlx::query("DELETE FROM courses WHERE id = $1")
        .bind(course_id)
        .execute(&mut **tx)
        .await
        .map(|_| ())
}

/// Creator submission: publish intent + pending verdict. The resubmission
/// note replaces the previous one; a stale rejection reason is cleared.
pub async fn submit_course_for_approval(
    pool: &PgPool,
    course_id: &str,
    submission_note: Option<&str>,
    now: DateTime<Utc>,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE courses SET state = 'published', approval_status = 'pending', \
         submission_note = $1, rejection_reason = NULL, updated_at = $2 WHERE id = $3",
    )
    .bind(submission_note)
    .bind(now)
    .bind(course_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

/// Admin approval. The `approval_status <> 'approved'` guard makes
/// re-approval a true no-op that preserves the original published_at.
pub async fn approve_course(
    pool: &PgPool,
    course_id: &str,
    admin_id: &str,
    now: DateTime<Utc>,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE courses SET state = 'published', approval_status = 'approved', \
         approved_by = $1, published_at = $2, rejection_reason = NULL, updated_at = $2 \
         WHERE id = $3 AND approval_status <> 'approved'",
    )
    .bind(admin_id)
    .bind(now)
    .bind(course_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

/// Admin rejection. `state` is deliberately left untouched; the visibility
/// rule alone hides the course.
pub async fn reject_course(
    pool: &PgPool,
    course_id: &str,
    reason: &str,
    now: DateTime<Utc>,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE courses SET approval_status = 'rejected', rejection_reason = $1, \
         updated_at = $2 WHERE id = $3",
    )
    .bind(reason)
    .bind(now)
    .bind(course_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

pub async fn increment_total_enrollments(
    tx: &mut PgTransaction<'_>,
    course_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE courses SET total_enrollments = total_enrollments + 1, updated_at = $1 \
         WHERE id = $2",
    )
    .bind(Utc::now())
    .bind(course_id)
    .execute(&mut **tx)
    .await
    .map(|_| ())
}

/// Recomputes the lesson aggregates from the authoritative lessons table.
/// Runs inside every lesson-mutating transaction, so the counters can never
/// drift from the source records.
pub async fn recompute_lesson_aggregates(
    tx: &mut PgTransaction<'_>,
    course_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE courses SET \
         total_lessons = (SELECT COUNT(*) FROM lessons WHERE course_id = $1), \
         total_duration = COALESCE((SELECT SUM(duration_seconds) FROM lessons \
             WHERE course_id = $1), 0), \
         updated_at = $2 \
         WHERE id = $1",
    )
    .bind(course_id)
    .bind(Utc::now())
    .execute(&mut **tx)
    .await
    .map(|_| ())
}

pub async fn list_visible_courses(
    pool: &PgPool,
    filters: &CatalogFilters,
    per_page: i64,
    offset: i64,
) -> Result<(Vec<Course>, i64), sqlx::Error> {
    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
        "SELECT {} FROM courses WHERE state = 'published' AND approval_status = 'approved'",
        COURSE_COLUMNS
    ));
    apply_catalog_filters(&mut builder, filters);
    builder.push(" ORDER BY published_at DESC, id DESC");
    builder
        .push(" LIMIT ")
        .push_bind(per_page)
        .push(" OFFSET ")
        .push_bind(offset);

    let items = builder.build_query_as::<Course>().fetch_all(pool).await?;

    let mut count_builder: QueryBuilder<Postgres> = QueryBuilder::new(
        "SELECT COUNT(*) FROM courses WHERE state = 'published' AND approval_status = 'approved'",
    );
    apply_catalog_filters(&mut count_builder, filters);
    let total = count_builder
        .build_query_scalar::<i64>()
        .fetch_one(pool)
        .await?;

    Ok((items, total))
}

fn apply_catalog_filters(builder: &mut QueryBuilder<'_, Postgres>, filters: &CatalogFilters) {
    if let Some(q) = filters.q.as_ref() {
        builder
            .push(" AND title ILIKE ")
            .push_bind(format!("%{}%", q));
    }
    if let Some(level) = filters.level.as_ref() {
        builder
            .push(" AND level = ")
            .push_bind(level.db_value().to_string());
    }
    if let Some(language) = filters.language.as_ref() {
        builder
            .push(" AND language = ")
            .push_bind(language.to_string());
    }
    if let Some(tag) = filters.tag.as_ref() {
        builder
            .push(" AND ")
            .push_bind(tag.to_string())
            .push(" = ANY(tags)");
    }
}

pub async fn list_courses_admin(
    pool: &PgPool,
    filters: &AdminCourseFilters,
    per_page: i64,
    offset: i64,
) -> Result<(Vec<Course>, i64), sqlx::Error> {
    let mut builder: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT {} FROM courses", COURSE_COLUMNS));
    let mut has_clause = false;
    apply_admin_filters(&mut builder, &mut has_clause, filters);
    builder.push(" ORDER BY updated_at DESC, id DESC");
    builder
        .push(" LIMIT ")
        .push_bind(per_page)
        .push(" OFFSET ")
        .push_bind(offset);

    let items = builder.build_query_as::<Course>().fetch_all(pool).await?;

    let mut count_builder: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT COUNT(*) FROM courses");
    let mut has_clause = false;
    apply_admin_filters(&mut count_builder, &mut has_clause, filters);
    let total = count_builder
        .build_query_scalar::<i64>()
        .fetch_one(pool)
        .await?;

    Ok((items, total))
}

fn apply_admin_filters(
    builder: &mut QueryBuilder<'_, Postgres>,
    has_clause: &mut bool,
    filters: &AdminCourseFilters,
) {
    if let Some(state) = filters.state.as_ref() {
        push_clause(builder, has_clause);
        builder
            .push("state = ")
            .push_bind(state.db_value().to_string());
    }
    if let Some(approval_status) = filters.approval_status.as_ref() {
        push_clause(builder, has_clause);
        builder
            .push("approval_status = ")
            .push_bind(approval_status.db_value().to_string());
    }
}

fn push_clause(builder: &mut QueryBuilder<'_, Postgres>, has_clause: &mut bool) {
    if *has_clause {
        builder.push(" AND ");
    } else {
        builder.push(" WHERE ");
        *has_clause = true;
    }
}
