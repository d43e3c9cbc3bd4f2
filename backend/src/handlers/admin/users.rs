use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AppError,
    models::user::UserResponse,
    models::{PaginatedResponse, PaginationQuery},
    repositories::user as user_repo,
    state::AppState,
};

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SetActivePayload {
    pub is_active: bool,
}

pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<PaginatedResponse<UserResponse>>, AppError> {
    let (page, per_page, offset) = (query.page(), query.per_page(), query.offset());
    let (users, total) = user_repo::list_users(&state.pool, per_page, offset).await?;

    Ok(Json(PaginatedResponse::new(
        page,
        per_page,
        total,
        users.into_iter().map(UserResponse::from).collect(),
    )))
}

pub async fn set_user_active(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(payload): Json<SetActivePayload>,
) -> Result<Json<serde_json::Value>, AppError> {
    let rows =
        user_repo::set_user_active(&state.pool, &user_id, payload.is_active, Utc::now()).await?;
    if rows == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    Ok(Json(serde_json::json!({
        "id": user_id,
        "is_active": payload.is_active,
    })))
}
