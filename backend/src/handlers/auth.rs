use axum::{
    extract::{Extension, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::AppError,
    models::user::{
        AuthResponse, ChangePasswordRequest, SigninRequest, SignupRequest, UpdateProfileRequest,
        User, UserResponse, UserRole,
    },
    repositories::{session as session_repo, user as user_repo},
    state::AppState,
    utils::{
        jwt::{create_access_token, create_refresh_token, decode_refresh_token,
              verify_refresh_token},
        password::{hash_password, verify_password},
    },
    validation::rules::normalize_optional_text,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct LogoutRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub all: bool,
}

pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate()?;
    let email = payload.email.trim().to_lowercase();

    if user_repo::email_exists(&state.pool, &email).await? {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let password_hash = hash_password(&payload.password)?;
    let user = User::new(
        email,
        password_hash,
        payload.full_name.trim().to_string(),
        UserRole::User,
    );
    user_repo::insert_user(&state.pool, &user).await?;

    let response = issue_tokens(&state, user).await?;
    Ok(Json(response))
}

pub async fn signin(
    State(state): State<AppState>,
    Json(payload): Json<SigninRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = payload.email.trim().to_lowercase();
    let user = user_repo::find_user_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

    ensure_password_matches(&payload.password, &user.password_hash, "Invalid email or password")?;

    if !user.is_active {
        return Err(AppError::Forbidden("Account is deactivated".to_string()));
    }

    let now = Utc::now();
    user_repo::record_last_login(&state.pool, &user.id, now).await?;
    // Expired sessions of this account are swept lazily here.
    session_repo::delete_expired_sessions_for_user(&state.pool, &user.id, now).await?;

    let response = issue_tokens(&state, user).await?;
    Ok(Json(response))
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let (session_id, secret) = decode_refresh_token(&payload.refresh_token)
        .map_err(|_| AppError::Unauthorized("Invalid or expired refresh token".to_string()))?;

    let session = session_repo::fetch_valid_session(&state.pool, &session_id, Utc::now())
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid or expired refresh token".to_string()))?;

    let valid = verify_refresh_token(&secret, &session.token_hash)?;
    if !valid {
        return Err(AppError::Unauthorized(
            "Invalid or expired refresh token".to_string(),
        ));
    }

    let user = user_repo::find_user_by_id(&state.pool, &session.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;
    if !user.is_active {
        return Err(AppError::Forbidden("Account is deactivated".to_string()));
    }

    // Rotation: the presented session dies with this refresh.
    session_repo::delete_session_by_id(&state.pool, &session_id).await?;

    let response = issue_tokens(&state, user).await?;
    Ok(Json(response))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<LogoutRequest>,
) -> Result<Json<Value>, AppError> {
    if payload.all {
        session_repo::delete_sessions_for_user(&state.pool, &user.id).await?;
        return Ok(Json(json!({"message": "Logged out"})));
    }

    if let Some(raw) = payload.refresh_token.as_deref() {
        let (session_id, _) = decode_refresh_token(raw)
            .map_err(|_| AppError::BadRequest("Invalid refresh token".to_string()))?;
        session_repo::delete_session_for_user(&state.pool, &session_id, &user.id).await?;
        return Ok(Json(json!({"message": "Logged out"})));
    }

    session_repo::delete_sessions_for_user(&state.pool, &user.id).await?;
    Ok(Json(json!({"message": "Logged out"})))
}

pub async fn me(Extension(user): Extension<User>) -> Result<Json<UserResponse>, AppError> {
    Ok(Json(UserResponse::from(user)))
}

pub async fn update_me(
    State(state): State<AppState>,
    Extension(mut user): Extension<User>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, AppError> {
    if let Some(full_name) = normalize_optional_text(payload.full_name) {
        let now = Utc::now();
        user_repo::update_full_name(&state.pool, &user.id, &full_name, now).await?;
        user.full_name = full_name;
        user.updated_at = now;
    }
    Ok(Json(UserResponse::from(user)))
}

pub async fn change_password(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<Value>, AppError> {
    if payload.new_password.len() < 8 {
        return Err(AppError::BadRequest(
            "New password must be at least 8 characters".to_string(),
        ));
    }
    if payload.new_password == payload.current_password {
        return Err(AppError::BadRequest(
            "New password must differ from current password".to_string(),
        ));
    }

    ensure_password_matches(
        &payload.current_password,
        &user.password_hash,
        "Current password is incorrect",
    )?;

    let new_hash = hash_password(&payload.new_password)?;
    user_repo::update_password_hash(&state.pool, &user.id, &new_hash, Utc::now()).await?;

    // Every outstanding session is revoked after a password change.
    session_repo::delete_sessions_for_user(&state.pool, &user.id).await?;

    Ok(Json(json!({"message": "Password updated successfully"})))
}

async fn issue_tokens(state: &AppState, user: User) -> Result<AuthResponse, AppError> {
    let access_token = create_access_token(
        &user,
        &state.config.jwt_secret,
        state.config.jwt_expiration_hours,
    )?;

    let refresh_token = create_refresh_token(
        user.id.clone(),
        state.config.refresh_token_expiration_days,
    )?;
    session_repo::insert_session(&state.pool, &refresh_token).await?;

    Ok(AuthResponse {
        access_token,
        refresh_token: refresh_token.encoded(),
        user: UserResponse::from(user),
    })
}

fn ensure_password_matches(
    candidate: &str,
    expected_hash: &str,
    unauthorized_message: &str,
) -> Result<(), AppError> {
    let matches = verify_password(candidate, expected_hash)?;
    if matches {
        Ok(())
    } else {
        Err(AppError::Unauthorized(unauthorized_message.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_password_matches_distinguishes_wrong_password() {
        let hash = hash_password("correct horse").expect("hash");
        assert!(ensure_password_matches("correct horse", &hash, "nope").is_ok());

        let err = ensure_password_matches("battery staple", &hash, "nope").expect_err("mismatch");
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn logout_request_defaults_to_revoking_everything() {
        let payload: LogoutRequest = serde_json::from_str("{}").expect("parse");
        assert!(payload.refresh_token.is_none());
        assert!(!payload.all);
    }
}
