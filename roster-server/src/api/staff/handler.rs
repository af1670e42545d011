//! Staff API Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use shared::models::{StaffCreate, StaffMember, StaffRole, StaffUpdate};

use crate::auth::{self, CurrentUser};
use crate::core::ServerState;
use crate::db::repository::staff;
use crate::utils::validation::{
    MAX_NAME_LEN, validate_password, validate_phone, validate_required_text,
};
use crate::utils::{AppError, AppResult};

/// Query params for listing staff
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Filter by role (ADMIN | MANAGER | BARISTA)
    pub role: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// Only admins may create or promote managing roles
fn check_role_grant(current_user: &CurrentUser, granted: StaffRole) -> AppResult<()> {
    if granted.can_manage() && !current_user.is_admin() {
        return Err(AppError::forbidden(
            "Only administrators may grant managing roles",
        ));
    }
    Ok(())
}

/// GET /api/staff - 获取员工列表
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<StaffMember>>> {
    let role = match &query.role {
        Some(value) => Some(
            StaffRole::parse(value)
                .ok_or_else(|| AppError::validation(format!("Unknown role: {value}")))?,
        ),
        None => None,
    };
    let mut conn = state.pool().acquire().await?;
    let members = staff::find_all(&mut conn, role, query.limit, query.offset).await?;
    Ok(Json(members))
}

/// GET /api/staff/:id - 获取单个员工
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<StaffMember>> {
    let mut conn = state.pool().acquire().await?;
    let member = staff::find_by_id(&mut conn, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Staff member {id} not found")))?;
    Ok(Json(member))
}

/// POST /api/staff - 创建员工
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<StaffCreate>,
) -> AppResult<(StatusCode, Json<StaffMember>)> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_phone(&payload.phone, "phone")?;
    check_role_grant(&current_user, payload.role)?;

    // Managing roles authenticate with a password; baristas never do
    let password_hash = match (&payload.password, payload.role.requires_password()) {
        (Some(password), true) => {
            validate_password(password)?;
            Some(
                auth::hash_password(password)
                    .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?,
            )
        }
        (None, true) => {
            return Err(AppError::validation(
                "A password is required for ADMIN and MANAGER roles",
            ));
        }
        (Some(_), false) => {
            return Err(AppError::validation("Baristas do not use passwords"));
        }
        (None, false) => None,
    };

    let mut conn = state.pool().acquire().await?;
    let created = staff::create(
        &mut conn,
        &payload.name,
        &payload.phone,
        payload.chat_id,
        payload.role,
        password_hash,
        payload.cafe_id,
    )
    .await?;

    tracing::info!(staff_id = created.id, role = %created.role, "Staff member created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/staff/:id - 更新员工
pub async fn update(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<StaffUpdate>,
) -> AppResult<Json<StaffMember>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(phone) = &payload.phone {
        validate_phone(phone, "phone")?;
    }
    if let Some(role) = payload.role {
        check_role_grant(&current_user, role)?;
    }

    let password_hash = match &payload.password {
        Some(password) => {
            validate_password(password)?;
            Some(
                auth::hash_password(password)
                    .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?,
            )
        }
        None => None,
    };

    let mut conn = state.pool().acquire().await?;
    let updated = staff::update(
        &mut conn,
        id,
        payload.name,
        payload.phone,
        payload.role,
        password_hash,
        payload.is_active,
        payload.cafe_id,
    )
    .await?;

    tracing::info!(staff_id = id, "Staff member updated");
    Ok(Json(updated))
}

/// POST /api/staff/:id/confirm - 确认 (激活) 一名新 barista
pub async fn confirm(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<StaffMember>> {
    let mut conn = state.pool().acquire().await?;
    let member = staff::find_by_id(&mut conn, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Staff member {id} not found")))?;

    if member.role != StaffRole::Barista {
        return Err(AppError::validation(
            "Only baristas go through confirmation",
        ));
    }
    if member.is_active {
        return Err(AppError::validation(
            "This barista was already confirmed; no need to confirm again",
        ));
    }

    staff::set_active(&mut conn, id, true).await?;
    let confirmed = staff::find_by_id(&mut conn, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Staff member {id} not found")))?;
    drop(conn);

    state.notifier.notify(
        confirmed.chat_id,
        "Your account was confirmed. You can now book shifts — send `slots` to start.",
    );
    tracing::info!(staff_id = id, "Barista confirmed");
    Ok(Json(confirmed))
}

/// DELETE /api/staff/:id - 删除员工 (级联删除其预订)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    let mut conn = state.pool().acquire().await?;
    if !staff::delete(&mut conn, id).await? {
        return Err(AppError::not_found(format!("Staff member {id} not found")));
    }
    tracing::info!(staff_id = id, "Staff member deleted");
    Ok(StatusCode::NO_CONTENT)
}
