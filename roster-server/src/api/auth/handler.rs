//! Auth API Handlers

use axum::{
    Json,
    extract::{Extension, State},
};
use serde::{Deserialize, Serialize};
use shared::models::StaffMember;

use crate::auth::{self, CurrentUser};
use crate::core::ServerState;
use crate::db::repository::staff;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub chat_id: i64,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub staff: StaffMember,
}

/// POST /api/auth/login - 密码登录 (仅管理角色持有密码)
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let mut conn = state.pool().acquire().await?;
    let member = staff::find_by_chat_id(&mut conn, payload.chat_id).await?;
    drop(conn);

    // Unified error for unknown account / wrong password
    let member = member.ok_or_else(AppError::invalid_credentials)?;
    let hash = member
        .password_hash
        .as_deref()
        .ok_or_else(AppError::invalid_credentials)?;
    let verified = auth::verify_password(&payload.password, hash)
        .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;
    if !verified {
        tracing::warn!(target: "security", chat_id = payload.chat_id, "Failed login attempt");
        return Err(AppError::invalid_credentials());
    }
    if !member.is_active {
        return Err(AppError::forbidden("Account is deactivated"));
    }

    let token = state
        .jwt_service
        .generate_token(member.id, &member.name, member.role)
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

    tracing::info!(staff_id = member.id, "Staff member logged in");
    Ok(Json(LoginResponse {
        token,
        staff: member,
    }))
}

/// GET /api/auth/me - 当前登录员工
pub async fn me(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<StaffMember>> {
    let mut conn = state.pool().acquire().await?;
    let member = staff::find_by_id(&mut conn, current_user.id)
        .await?
        .ok_or_else(|| AppError::not_found("Staff member not found"))?;
    Ok(Json(member))
}
