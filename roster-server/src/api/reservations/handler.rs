//! Reservation API Handlers
//!
//! External entry points of the scheduling core (§ booking, lifecycle,
//! availability). Authorization detail: staff act on their own
//! reservations, managers on anybody's.

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use shared::models::{Reservation, ReservationCreate, ReservationStatus, Shift};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{reservation, shift, staff};
use crate::scheduling::{self, AvailabilityScope};
use crate::utils::time::format_window;
use crate::utils::{AppError, AppResult};

/// Query params for the admin listing
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub shift_id: Option<i64>,
    pub staff_id: Option<i64>,
    /// RESERVED | ONCONFIRM | ATTENDED | CANCELLED
    pub status: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    100
}

/// POST /api/reservations - 自助预订 (店长可代订)
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<ReservationCreate>,
) -> AppResult<(StatusCode, Json<Reservation>)> {
    let staff_id = payload.staff_id.unwrap_or(current_user.id);
    if staff_id != current_user.id && !current_user.can_manage() {
        return Err(AppError::forbidden(
            "Only managers book shifts for other staff",
        ));
    }

    let created =
        scheduling::create_reservation(state.pool(), state.policy(), staff_id, payload.shift_id)
            .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/reservations - 预订列表 (管理视图)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Reservation>>> {
    let status = match &query.status {
        Some(value) => Some(
            ReservationStatus::parse(value)
                .ok_or_else(|| AppError::validation(format!("Unknown status: {value}")))?,
        ),
        None => None,
    };
    let mut conn = state.pool().acquire().await?;
    let reservations = reservation::find_multi(
        &mut conn,
        query.shift_id,
        query.staff_id,
        status,
        query.limit,
        query.offset,
    )
    .await?;
    Ok(Json(reservations))
}

/// GET /api/reservations/:id - 获取单个预订 (本人或管理角色)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<Reservation>> {
    let mut conn = state.pool().acquire().await?;
    let found = reservation::find_by_id(&mut conn, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Reservation {id} not found")))?;
    if found.staff_id != current_user.id && !current_user.can_manage() {
        return Err(AppError::forbidden("Not your reservation"));
    }
    Ok(Json(found))
}

/// POST /api/reservations/:id/cancel - 取消预订 (幂等)
pub async fn cancel(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<Reservation>> {
    let mut conn = state.pool().acquire().await?;
    let found = reservation::find_by_id(&mut conn, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Reservation {id} not found")))?;
    drop(conn);
    if found.staff_id != current_user.id && !current_user.can_manage() {
        return Err(AppError::forbidden("Not your reservation"));
    }

    let cancelled = scheduling::cancel_reservation(state.pool(), id).await?;
    Ok(Json(cancelled))
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: ReservationStatus,
}

/// PUT /api/reservations/:id/status - 修改预订状态 (管理视图)
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<StatusRequest>,
) -> AppResult<Json<Reservation>> {
    let updated =
        scheduling::update_reservation_status(state.pool(), id, payload.status).await?;
    Ok(Json(updated))
}

/// POST /api/reservations/attendance/confirm - 当前班次签到
pub async fn confirm_attendance(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Reservation>> {
    let attended = scheduling::confirm_attendance(state.pool(), current_user.id).await?;
    Ok(Json(attended))
}

/// Query params for the availability listing
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    /// "home" (default) or "city"
    pub scope: Option<String>,
    /// Browse for another staff member (managers only)
    pub staff_id: Option<i64>,
}

/// GET /api/reservations/availability - 可预订班次
pub async fn availability(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<Vec<Shift>>> {
    let staff_id = query.staff_id.unwrap_or(current_user.id);
    if staff_id != current_user.id && !current_user.can_manage() {
        return Err(AppError::forbidden(
            "Only managers browse availability for other staff",
        ));
    }
    let scope = match &query.scope {
        Some(value) => AvailabilityScope::parse(value)
            .ok_or_else(|| AppError::validation(format!("Unknown scope: {value}")))?,
        None => AvailabilityScope::HomeCafe,
    };

    let shifts =
        scheduling::list_available_shifts(state.pool(), state.policy(), staff_id, scope).await?;
    Ok(Json(shifts))
}

/// DELETE /api/reservations/:id - 硬删除预订，立即释放槽位 (管理视图)
pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    let removed = scheduling::remove_reservation(state.pool(), id).await?;

    // Tell the displaced staff member their slot is gone
    let mut conn = state.pool().acquire().await?;
    let member = staff::find_by_id(&mut conn, removed.staff_id).await?;
    let window = shift::find_by_id(&mut conn, removed.shift_id)
        .await?
        .map(|s| format_window(s.start_time, s.end_time, state.config.tz_offset_minutes));
    drop(conn);
    if let (Some(member), Some(window)) = (member, window) {
        state.notifier.notify(
            member.chat_id,
            format!("Your booking for the shift {window} was removed."),
        );
    }

    Ok(StatusCode::NO_CONTENT)
}
