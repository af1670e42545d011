//! Shift Repository
//!
//! Shift rows carry the scheduling invariants enforced at write time:
//! end after start, window inside the café's operating hours on one
//! business day, and no overlap with another shift of the same café
//! (touching boundaries are allowed).

use super::{RepoError, RepoResult, cafe};
use crate::utils::time::to_local;
use crate::utils::validation::{MAX_CAPACITY, MIN_CAPACITY};
use shared::models::{Cafe, Shift, ShiftCreate, ShiftUpdate};
use sqlx::SqliteConnection;

const SHIFT_SELECT: &str =
    "SELECT id, cafe_id, start_time, end_time, capacity, created_at, updated_at FROM shift";

fn validate_capacity(value: i64) -> RepoResult<()> {
    if !(MIN_CAPACITY..=MAX_CAPACITY).contains(&value) {
        return Err(RepoError::Validation(format!(
            "capacity must be between {MIN_CAPACITY} and {MAX_CAPACITY}, got {value}"
        )));
    }
    Ok(())
}

/// Window must be inside the café's operating hours on a single business day
fn validate_window(
    cafe: &Cafe,
    start_time: i64,
    end_time: i64,
    tz_offset_minutes: i32,
) -> RepoResult<()> {
    if end_time <= start_time {
        return Err(RepoError::Validation(
            "Shift end must be after shift start".into(),
        ));
    }

    let parse = |v: &str| {
        chrono::NaiveTime::parse_from_str(v, "%H:%M")
            .map_err(|_| RepoError::Validation(format!("Invalid time of day: {v}")))
    };
    let open = parse(&cafe.open_time)?;
    let close = parse(&cafe.close_time)?;

    let start_local = to_local(start_time, tz_offset_minutes);
    let end_local = to_local(end_time, tz_offset_minutes);
    if start_local.date() != end_local.date() {
        return Err(RepoError::Validation(
            "Shift must start and end on the same business day".into(),
        ));
    }
    if start_local.time() < open || end_local.time() > close {
        return Err(RepoError::Validation(format!(
            "Shift {}-{} is outside café operating hours {}-{}",
            start_local.format("%H:%M"),
            end_local.format("%H:%M"),
            cafe.open_time,
            cafe.close_time
        )));
    }
    Ok(())
}

pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<Shift>> {
    let sql = format!("{SHIFT_SELECT} WHERE id = ?");
    let shift = sqlx::query_as::<_, Shift>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(shift)
}

/// Filtered listing for the manager/admin views
pub async fn find_multi(
    conn: &mut SqliteConnection,
    cafe_id: Option<i64>,
    start_from: Option<i64>,
    start_to: Option<i64>,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<Shift>> {
    let mut sql = String::from(SHIFT_SELECT);
    let mut clauses: Vec<&str> = Vec::new();
    if cafe_id.is_some() {
        clauses.push("cafe_id = ?");
    }
    if start_from.is_some() {
        clauses.push("start_time >= ?");
    }
    if start_to.is_some() {
        clauses.push("start_time <= ?");
    }
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY start_time ASC LIMIT ? OFFSET ?");

    let mut query = sqlx::query_as::<_, Shift>(&sql);
    if let Some(c) = cafe_id {
        query = query.bind(c);
    }
    if let Some(from) = start_from {
        query = query.bind(from);
    }
    if let Some(to) = start_to {
        query = query.bind(to);
    }
    let shifts = query.bind(limit).bind(offset).fetch_all(conn).await?;
    Ok(shifts)
}

/// Shifts of one café intersecting [start, end) with nonzero duration.
///
/// Strict inequalities: a shift ending exactly when another starts does
/// not count as overlap.
pub async fn find_overlapping(
    conn: &mut SqliteConnection,
    cafe_id: i64,
    start_time: i64,
    end_time: i64,
    exclude_id: Option<i64>,
) -> RepoResult<Vec<Shift>> {
    let sql = match exclude_id {
        Some(_) => format!(
            "{SHIFT_SELECT} WHERE cafe_id = ?1 AND start_time < ?2 AND end_time > ?3 AND id != ?4"
        ),
        None => format!("{SHIFT_SELECT} WHERE cafe_id = ?1 AND start_time < ?2 AND end_time > ?3"),
    };
    let mut query = sqlx::query_as::<_, Shift>(&sql)
        .bind(cafe_id)
        .bind(end_time)
        .bind(start_time);
    if let Some(id) = exclude_id {
        query = query.bind(id);
    }
    let shifts = query.fetch_all(conn).await?;
    Ok(shifts)
}

/// Upcoming shifts of one café, ascending by start time
pub async fn find_in_cafe_window(
    conn: &mut SqliteConnection,
    cafe_id: i64,
    start_from: i64,
    start_to: i64,
) -> RepoResult<Vec<Shift>> {
    let sql = format!(
        "{SHIFT_SELECT} WHERE cafe_id = ? AND start_time >= ? AND start_time <= ? ORDER BY start_time ASC"
    );
    let shifts = sqlx::query_as::<_, Shift>(&sql)
        .bind(cafe_id)
        .bind(start_from)
        .bind(start_to)
        .fetch_all(conn)
        .await?;
    Ok(shifts)
}

/// Upcoming shifts across every active café of a city, ascending by start time
pub async fn find_in_city_window(
    conn: &mut SqliteConnection,
    city: &str,
    start_from: i64,
    start_to: i64,
) -> RepoResult<Vec<Shift>> {
    let shifts = sqlx::query_as::<_, Shift>(
        "SELECT s.id, s.cafe_id, s.start_time, s.end_time, s.capacity, s.created_at, s.updated_at FROM shift s JOIN cafe c ON s.cafe_id = c.id WHERE c.city = ? AND c.is_active = 1 AND s.start_time >= ? AND s.start_time <= ? ORDER BY s.start_time ASC",
    )
    .bind(city)
    .bind(start_from)
    .bind(start_to)
    .fetch_all(conn)
    .await?;
    Ok(shifts)
}

pub async fn create(
    conn: &mut SqliteConnection,
    data: ShiftCreate,
    tz_offset_minutes: i32,
) -> RepoResult<Shift> {
    validate_capacity(data.capacity)?;

    let owner = cafe::find_by_id(&mut *conn, data.cafe_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Cafe {} not found", data.cafe_id)))?;
    validate_window(&owner, data.start_time, data.end_time, tz_offset_minutes)?;

    let colliding =
        find_overlapping(&mut *conn, data.cafe_id, data.start_time, data.end_time, None).await?;
    if let Some(other) = colliding.first() {
        return Err(RepoError::Validation(format!(
            "Shift overlaps an existing shift of the same cafe (shift {})",
            other.id
        )));
    }

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO shift (id, cafe_id, start_time, end_time, capacity, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
    )
    .bind(id)
    .bind(data.cafe_id)
    .bind(data.start_time)
    .bind(data.end_time)
    .bind(data.capacity)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    find_by_id(conn, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create shift".into()))
}

pub async fn update(
    conn: &mut SqliteConnection,
    id: i64,
    data: ShiftUpdate,
    tz_offset_minutes: i32,
) -> RepoResult<Shift> {
    let current = find_by_id(&mut *conn, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Shift {id} not found")))?;

    // Validate the window that would result from the patch
    let cafe_id = data.cafe_id.unwrap_or(current.cafe_id);
    let start_time = data.start_time.unwrap_or(current.start_time);
    let end_time = data.end_time.unwrap_or(current.end_time);
    let capacity = data.capacity.unwrap_or(current.capacity);
    validate_capacity(capacity)?;

    let owner = cafe::find_by_id(&mut *conn, cafe_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Cafe {cafe_id} not found")))?;
    validate_window(&owner, start_time, end_time, tz_offset_minutes)?;

    let colliding = find_overlapping(&mut *conn, cafe_id, start_time, end_time, Some(id)).await?;
    if let Some(other) = colliding.first() {
        return Err(RepoError::Validation(format!(
            "Shift overlaps an existing shift of the same cafe (shift {})",
            other.id
        )));
    }

    let now = shared::util::now_millis();
    sqlx::query(
        "UPDATE shift SET cafe_id = ?1, start_time = ?2, end_time = ?3, capacity = ?4, updated_at = ?5 WHERE id = ?6",
    )
    .bind(cafe_id)
    .bind(start_time)
    .bind(end_time)
    .bind(capacity)
    .bind(now)
    .bind(id)
    .execute(&mut *conn)
    .await?;

    find_by_id(conn, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Shift {id} not found")))
}

/// Hard delete; reservations cascade away with it
pub async fn delete(conn: &mut SqliteConnection, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM shift WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected() > 0)
}
