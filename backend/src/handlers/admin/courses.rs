//! Moderation surface: the pending queue and the approve/reject decisions.

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::AppError,
    models::course::{ApprovalStatus, Course, CourseResponse, CourseState},
    models::user::User,
    models::PaginatedResponse,
    repositories::course::{self as course_repo, AdminCourseFilters},
    state::AppState,
    validation::rules::require_non_blank,
};

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_PER_PAGE: i64 = 25;
const MAX_PER_PAGE: i64 = 100;
const MAX_PAGE: i64 = 1_000;

#[derive(Debug, Deserialize, Serialize, IntoParams, ToSchema)]
pub struct AdminCourseListQuery {
    pub state: Option<String>,
    pub approval_status: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RejectCoursePayload {
    pub reason: String,
}

pub async fn list_courses(
    State(state): State<AppState>,
    Query(query): Query<AdminCourseListQuery>,
) -> Result<Json<PaginatedResponse<CourseResponse>>, AppError> {
    let (page, per_page, filters) = validate_list_query(query)?;
    let offset = (page - 1) * per_page;

    let (items, total) =
        course_repo::list_courses_admin(&state.pool, &filters, per_page, offset).await?;

    Ok(Json(PaginatedResponse::new(
        page,
        per_page,
        total,
        items.into_iter().map(CourseResponse::from).collect(),
    )))
}

pub async fn approve_course(
    State(state): State<AppState>,
    Extension(admin): Extension<User>,
    Path(course_id): Path<String>,
) -> Result<Json<CourseResponse>, AppError> {
    let course = fetch_course_or_not_found(&state, &course_id).await?;

    // Re-approving is a true no-op; the original published_at stands.
    if course.approval_status != ApprovalStatus::Approved {
        course_repo::approve_course(&state.pool, &course.id, &admin.id, Utc::now()).await?;
    }

    let updated = fetch_course_or_not_found(&state, &course_id).await?;
    Ok(Json(CourseResponse::from(updated)))
}

pub async fn reject_course(
    State(state): State<AppState>,
    Extension(_admin): Extension<User>,
    Path(course_id): Path<String>,
    Json(payload): Json<RejectCoursePayload>,
) -> Result<Json<CourseResponse>, AppError> {
    let reason = require_non_blank("reason", &payload.reason)?;
    let course = fetch_course_or_not_found(&state, &course_id).await?;

    course_repo::reject_course(&state.pool, &course.id, &reason, Utc::now()).await?;

    let updated = fetch_course_or_not_found(&state, &course_id).await?;
    Ok(Json(CourseResponse::from(updated)))
}

async fn fetch_course_or_not_found(state: &AppState, course_id: &str) -> Result<Course, AppError> {
    course_repo::fetch_course(&state.pool, course_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))
}

fn validate_list_query(
    query: AdminCourseListQuery,
) -> Result<(i64, i64, AdminCourseFilters), AppError> {
    let page = query.page.unwrap_or(DEFAULT_PAGE).clamp(1, MAX_PAGE);
    let per_page = query
        .per_page
        .unwrap_or(DEFAULT_PER_PAGE)
        .clamp(1, MAX_PER_PAGE);

    let state = query.state.as_deref().map(parse_state).transpose()?;
    let approval_status = query
        .approval_status
        .as_deref()
        .map(parse_approval_status)
        .transpose()?;

    Ok((
        page,
        per_page,
        AdminCourseFilters {
            state,
            approval_status,
        },
    ))
}

fn parse_state(value: &str) -> Result<CourseState, AppError> {
    match value.to_ascii_lowercase().as_str() {
        "draft" => Ok(CourseState::Draft),
        "published" => Ok(CourseState::Published),
        "archived" => Ok(CourseState::Archived),
        _ => Err(AppError::BadRequest(
            "`state` must be draft, published, or archived".to_string(),
        )),
    }
}

fn parse_approval_status(value: &str) -> Result<ApprovalStatus, AppError> {
    match value.to_ascii_lowercase().as_str() {
        "pending" => Ok(ApprovalStatus::Pending),
        "approved" => Ok(ApprovalStatus::Approved),
        "rejected" => Ok(ApprovalStatus::Rejected),
        _ => Err(AppError::BadRequest(
            "`approval_status` must be pending, approved, or rejected".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_state_accepts_supported_values() {
        assert!(matches!(
            parse_state("draft").expect("draft"),
            CourseState::Draft
        ));
        assert!(matches!(
            parse_state("PUBLISHED").expect("published"),
            CourseState::Published
        ));
        assert!(matches!(
            parse_state("Archived").expect("archived"),
            CourseState::Archived
        ));
        assert!(parse_state("retired").is_err());
    }

    #[test]
    fn parse_approval_status_accepts_supported_values() {
        assert!(matches!(
            parse_approval_status("pending").expect("pending"),
            ApprovalStatus::Pending
        ));
        assert!(matches!(
            parse_approval_status("APPROVED").expect("approved"),
            ApprovalStatus::Approved
        ));
        assert!(matches!(
            parse_approval_status("Rejected").expect("rejected"),
            ApprovalStatus::Rejected
        ));
        assert!(parse_approval_status("denied").is_err());
    }

    #[test]
    fn validate_list_query_applies_defaults_and_clamps() {
        let (page, per_page, filters) = validate_list_query(AdminCourseListQuery {
            state: None,
            approval_status: Some("pending".to_string()),
            page: Some(-3),
            per_page: Some(10_000),
        })
        .expect("valid query");

        assert_eq!(page, 1);
        assert_eq!(per_page, 100);
        assert!(filters.state.is_none());
        assert!(matches!(
            filters.approval_status,
            Some(ApprovalStatus::Pending)
        ));
    }
}
