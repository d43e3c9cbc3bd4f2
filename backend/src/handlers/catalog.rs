//! Public course discovery. Only `(published, approved)` courses exist from
//! this surface's point of view.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::AppError,
    models::course::{CourseLevel, CourseResponse},
    models::PaginatedResponse,
    repositories::course::{self as course_repo, CatalogFilters},
    state::AppState,
};

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_PER_PAGE: i64 = 20;
const MAX_PER_PAGE: i64 = 100;
const MAX_PAGE: i64 = 1_000;

#[derive(Debug, Deserialize, Serialize, IntoParams, ToSchema)]
pub struct CatalogQuery {
    /// Case-insensitive title substring.
    pub q: Option<String>,
    pub level: Option<String>,
    pub language: Option<String>,
    pub tag: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

pub async fn list_catalog_courses(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<PaginatedResponse<CourseResponse>>, AppError> {
    let (page, per_page, filters) = validate_catalog_query(query)?;
    let offset = (page - 1) * per_page;

    let (items, total) =
        course_repo::list_visible_courses(&state.pool, &filters, per_page, offset).await?;

    Ok(Json(PaginatedResponse::new(
        page,
        per_page,
        total,
        items.into_iter().map(CourseResponse::from).collect(),
    )))
}

pub async fn get_catalog_course(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> Result<Json<CourseResponse>, AppError> {
    let course = course_repo::fetch_course(&state.pool, &course_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

    if !course.is_publicly_visible() {
        return Err(AppError::NotFound("Course not found".to_string()));
    }

    Ok(Json(CourseResponse::from(course)))
}

fn validate_catalog_query(query: CatalogQuery) -> Result<(i64, i64, CatalogFilters), AppError> {
    let page = query.page.unwrap_or(DEFAULT_PAGE).clamp(1, MAX_PAGE);
    let per_page = query
        .per_page
        .unwrap_or(DEFAULT_PER_PAGE)
        .clamp(1, MAX_PER_PAGE);

    let level = query.level.as_deref().map(parse_level).transpose()?;

    Ok((
        page,
        per_page,
        CatalogFilters {
            q: normalize_filter(query.q),
            level,
            language: normalize_filter(query.language),
            tag: normalize_filter(query.tag),
        },
    ))
}

fn normalize_filter(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_level(value: &str) -> Result<CourseLevel, AppError> {
    match value.to_ascii_lowercase().as_str() {
        "beginner" => Ok(CourseLevel::Beginner),
        "intermediate" => Ok(CourseLevel::Intermediate),
        "advanced" => Ok(CourseLevel::Advanced),
        _ => Err(AppError::BadRequest(
            "`level` must be beginner, intermediate, or advanced".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_level_accepts_supported_values_case_insensitively() {
        assert!(matches!(
            parse_level("beginner").expect("beginner"),
            CourseLevel::Beginner
        ));
        assert!(matches!(
            parse_level("INTERMEDIATE").expect("intermediate"),
            CourseLevel::Intermediate
        ));
        assert!(matches!(
            parse_level("Advanced").expect("advanced"),
            CourseLevel::Advanced
        ));
    }

    #[test]
    fn parse_level_rejects_unknown_value() {
        let err = parse_level("expert").expect_err("invalid level");
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn normalize_filter_trims_and_drops_empty_values() {
        assert_eq!(
            normalize_filter(Some("  rust  ".to_string())),
            Some("rust".to_string())
        );
        assert_eq!(normalize_filter(Some("   ".to_string())), None);
        assert_eq!(normalize_filter(None), None);
    }

    #[test]
    fn validate_catalog_query_applies_defaults_and_clamps() {
        let (page, per_page, filters) = validate_catalog_query(CatalogQuery {
            q: None,
            level: None,
            language: None,
            tag: None,
            page: Some(0),
            per_page: Some(999),
        })
        .expect("valid query");

        assert_eq!(page, 1);
        assert_eq!(per_page, 100);
        assert!(filters.q.is_none());
        assert!(filters.level.is_none());
    }

    #[test]
    fn validate_catalog_query_parses_all_filters() {
        let (page, per_page, filters) = validate_catalog_query(CatalogQuery {
            q: Some(" rust ".to_string()),
            level: Some("advanced".to_string()),
            language: Some("en".to_string()),
            tag: Some("backend".to_string()),
            page: Some(2),
            per_page: Some(10),
        })
        .expect("valid query");

        assert_eq!(page, 2);
        assert_eq!(per_page, 10);
        assert_eq!(filters.q.as_deref(), Some("rust"));
        assert!(matches!(filters.level, Some(CourseLevel::Advanced)));
        assert_eq!(filters.language.as_deref(), Some("en"));
        assert_eq!(filters.tag.as_deref(), Some("backend"));
    }
}
