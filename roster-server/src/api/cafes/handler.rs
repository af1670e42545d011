//! Cafe API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use shared::models::{Cafe, CafeCreate, CafeUpdate};

use crate::core::ServerState;
use crate::db::repository::{cafe, staff};
use crate::utils::validation::{
    MAX_CITY_LEN, MAX_DESCRIPTION_LEN, MAX_NAME_LEN, validate_address, validate_optional_text,
    validate_phone, validate_required_text,
};
use crate::utils::{AppError, AppResult};

/// Query params for listing cafés
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub include_inactive: bool,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// The assigned manager must exist and hold a managing role;
/// 0 stands for "no manager".
async fn validate_manager(
    conn: &mut sqlx::SqliteConnection,
    manager_id: Option<i64>,
) -> AppResult<()> {
    let Some(manager_id) = manager_id.filter(|m| *m != 0) else {
        return Ok(());
    };
    if staff::find_manager_candidate(conn, manager_id)
        .await?
        .is_none()
    {
        return Err(AppError::validation(format!(
            "Staff member {manager_id} not found or lacks a manager/admin role"
        )));
    }
    Ok(())
}

fn validate_payload_texts(
    name: Option<&String>,
    city: Option<&String>,
    address: Option<&String>,
    phone: Option<&String>,
    description: &Option<String>,
) -> AppResult<()> {
    if let Some(name) = name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(city) = city {
        validate_required_text(city, "city", MAX_CITY_LEN)?;
    }
    if let Some(address) = address {
        validate_address(address)?;
    }
    if let Some(phone) = phone {
        validate_phone(phone, "phone")?;
    }
    validate_optional_text(description, "description", MAX_DESCRIPTION_LEN)?;
    Ok(())
}

/// GET /api/cafes - 获取咖啡馆列表
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Cafe>>> {
    let mut conn = state.pool().acquire().await?;
    let cafes = cafe::find_all(&mut conn, !query.include_inactive, query.limit, query.offset)
        .await?;
    Ok(Json(cafes))
}

/// GET /api/cafes/:id - 获取单个咖啡馆
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Cafe>> {
    let mut conn = state.pool().acquire().await?;
    let found = cafe::find_by_id(&mut conn, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Cafe {id} not found")))?;
    Ok(Json(found))
}

/// POST /api/cafes - 创建咖啡馆
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CafeCreate>,
) -> AppResult<(StatusCode, Json<Cafe>)> {
    validate_payload_texts(
        Some(&payload.name),
        Some(&payload.city),
        Some(&payload.address),
        Some(&payload.phone),
        &payload.description,
    )?;

    let mut conn = state.pool().acquire().await?;
    validate_manager(&mut conn, payload.manager_id).await?;
    let created = cafe::create(&mut conn, payload).await?;

    tracing::info!(cafe_id = created.id, "Cafe created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/cafes/:id - 更新咖啡馆
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<CafeUpdate>,
) -> AppResult<Json<Cafe>> {
    validate_payload_texts(
        payload.name.as_ref(),
        payload.city.as_ref(),
        payload.address.as_ref(),
        payload.phone.as_ref(),
        &payload.description,
    )?;

    let mut conn = state.pool().acquire().await?;
    validate_manager(&mut conn, payload.manager_id).await?;
    let updated = cafe::update(&mut conn, id, payload).await?;

    tracing::info!(cafe_id = id, "Cafe updated");
    Ok(Json(updated))
}

/// DELETE /api/cafes/:id - 删除咖啡馆 (级联删除班次与预订)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    let mut conn = state.pool().acquire().await?;
    if !cafe::delete(&mut conn, id).await? {
        return Err(AppError::not_found(format!("Cafe {id} not found")));
    }
    tracing::info!(cafe_id = id, "Cafe deleted");
    Ok(StatusCode::NO_CONTENT)
}
