//! Shift API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use shared::models::{Reservation, Shift, ShiftCreate, ShiftUpdate};

use crate::core::ServerState;
use crate::db::repository::shift;
use crate::scheduling::{self, ShiftStatusSummary};
use crate::utils::time::{day_end_millis, day_start_millis, parse_date};
use crate::utils::{AppError, AppResult};

/// Query params for listing shifts
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub cafe_id: Option<i64>,
    /// Inclusive start-time lower bound (Unix millis)
    pub start_from: Option<i64>,
    /// Inclusive start-time upper bound (Unix millis)
    pub start_to: Option<i64>,
    /// Convenience filter: one business day (YYYY-MM-DD), overrides the bounds
    pub date: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    100
}

/// GET /api/shifts - 获取班次列表
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Shift>>> {
    let offset_minutes = state.config.tz_offset_minutes;
    let (start_from, start_to) = match &query.date {
        Some(date) => {
            let date = parse_date(date)?;
            (
                Some(day_start_millis(date, offset_minutes)),
                Some(day_end_millis(date, offset_minutes) - 1),
            )
        }
        None => (query.start_from, query.start_to),
    };

    let mut conn = state.pool().acquire().await?;
    let shifts = shift::find_multi(
        &mut conn,
        query.cafe_id,
        start_from,
        start_to,
        query.limit,
        query.offset,
    )
    .await?;
    Ok(Json(shifts))
}

/// GET /api/shifts/:id - 获取单个班次
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Shift>> {
    let mut conn = state.pool().acquire().await?;
    let found = shift::find_by_id(&mut conn, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Shift {id} not found")))?;
    Ok(Json(found))
}

/// GET /api/shifts/:id/summary - 班次占用概览 (空位与各状态计数)
pub async fn summary(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ShiftStatusSummary>> {
    let shift_summary = scheduling::status_summary(state.pool(), id).await?;
    Ok(Json(shift_summary))
}

/// POST /api/shifts - 创建班次
///
/// 校验在 repository 层完成：时间窗口、营业时间、同店重叠。
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ShiftCreate>,
) -> AppResult<(StatusCode, Json<Shift>)> {
    let mut conn = state.pool().acquire().await?;
    let created = shift::create(&mut conn, payload, state.config.tz_offset_minutes).await?;

    tracing::info!(shift_id = created.id, cafe_id = created.cafe_id, "Shift created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/shifts/:id - 更新班次
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ShiftUpdate>,
) -> AppResult<Json<Shift>> {
    let mut conn = state.pool().acquire().await?;
    let updated = shift::update(&mut conn, id, payload, state.config.tz_offset_minutes).await?;

    tracing::info!(shift_id = id, "Shift updated");
    Ok(Json(updated))
}

/// DELETE /api/shifts/:id - 删除班次 (级联删除预订)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    let mut conn = state.pool().acquire().await?;
    if !shift::delete(&mut conn, id).await? {
        return Err(AppError::not_found(format!("Shift {id} not found")));
    }
    tracing::info!(shift_id = id, "Shift deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct ChangeBookingRequest {
    pub old_staff_id: i64,
    /// Omit to simply release the slot
    pub new_staff_id: Option<i64>,
}

/// POST /api/shifts/:id/change-booking - 改派或释放一个班次槽位
pub async fn change_booking(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ChangeBookingRequest>,
) -> AppResult<Json<Option<Reservation>>> {
    let created = scheduling::change_booking(
        state.pool(),
        state.policy(),
        &state.notifier,
        id,
        payload.old_staff_id,
        payload.new_staff_id,
    )
    .await?;
    Ok(Json(created))
}
