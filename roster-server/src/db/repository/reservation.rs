//! Reservation Repository

use super::{RepoError, RepoResult, map_insert_err};
use serde::Serialize;
use shared::models::{Reservation, ReservationStatus};
use sqlx::SqliteConnection;

const RESERVATION_SELECT: &str =
    "SELECT id, staff_id, shift_id, status, created_at, updated_at FROM reservation";

/// Effective statuses as a SQL fragment (everything but CANCELLED)
const EFFECTIVE: &str = "('RESERVED', 'ONCONFIRM', 'ATTENDED')";

/// Reservation joined with its shift window, for conflict checks and
/// staff-facing listings
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ReservationWithShift {
    pub id: i64,
    pub staff_id: i64,
    pub shift_id: i64,
    pub status: ReservationStatus,
    pub cafe_id: i64,
    pub start_time: i64,
    pub end_time: i64,
}

const WITH_SHIFT_SELECT: &str = "SELECT r.id, r.staff_id, r.shift_id, r.status, s.cafe_id, s.start_time, s.end_time FROM reservation r JOIN shift s ON r.shift_id = s.id";

pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<Reservation>> {
    let sql = format!("{RESERVATION_SELECT} WHERE id = ?");
    let reservation = sqlx::query_as::<_, Reservation>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(reservation)
}

/// All reservations on one shift, cancelled history included
pub async fn find_by_shift(
    conn: &mut SqliteConnection,
    shift_id: i64,
) -> RepoResult<Vec<Reservation>> {
    let sql = format!("{RESERVATION_SELECT} WHERE shift_id = ? ORDER BY created_at ASC");
    let reservations = sqlx::query_as::<_, Reservation>(&sql)
        .bind(shift_id)
        .fetch_all(conn)
        .await?;
    Ok(reservations)
}

/// Effective (non-cancelled) reservations on one shift
pub async fn find_effective_by_shift(
    conn: &mut SqliteConnection,
    shift_id: i64,
) -> RepoResult<Vec<Reservation>> {
    let sql = format!(
        "{RESERVATION_SELECT} WHERE shift_id = ? AND status IN {EFFECTIVE} ORDER BY created_at ASC"
    );
    let reservations = sqlx::query_as::<_, Reservation>(&sql)
        .bind(shift_id)
        .fetch_all(conn)
        .await?;
    Ok(reservations)
}

/// The staff member's effective claim on one shift, if any
pub async fn find_effective_for_pair(
    conn: &mut SqliteConnection,
    staff_id: i64,
    shift_id: i64,
) -> RepoResult<Option<Reservation>> {
    let sql = format!(
        "{RESERVATION_SELECT} WHERE staff_id = ? AND shift_id = ? AND status IN {EFFECTIVE}"
    );
    let reservation = sqlx::query_as::<_, Reservation>(&sql)
        .bind(staff_id)
        .bind(shift_id)
        .fetch_optional(conn)
        .await?;
    Ok(reservation)
}

/// Effective reservations of one staff member with their shift windows,
/// ascending by shift start
pub async fn find_effective_slots(
    conn: &mut SqliteConnection,
    staff_id: i64,
) -> RepoResult<Vec<ReservationWithShift>> {
    let sql = format!(
        "{WITH_SHIFT_SELECT} WHERE r.staff_id = ? AND r.status IN {EFFECTIVE} ORDER BY s.start_time ASC"
    );
    let slots = sqlx::query_as::<_, ReservationWithShift>(&sql)
        .bind(staff_id)
        .fetch_all(conn)
        .await?;
    Ok(slots)
}

/// Pending manager assignments awaiting the staff member's answer
pub async fn find_pending_by_staff(
    conn: &mut SqliteConnection,
    staff_id: i64,
) -> RepoResult<Vec<ReservationWithShift>> {
    let sql = format!(
        "{WITH_SHIFT_SELECT} WHERE r.staff_id = ? AND r.status = 'ONCONFIRM' ORDER BY s.start_time ASC"
    );
    let slots = sqlx::query_as::<_, ReservationWithShift>(&sql)
        .bind(staff_id)
        .fetch_all(conn)
        .await?;
    Ok(slots)
}

/// Confirmable reservations whose shift window contains `now`,
/// nearest shift first
pub async fn find_active_at(
    conn: &mut SqliteConnection,
    staff_id: i64,
    now: i64,
) -> RepoResult<Vec<ReservationWithShift>> {
    let sql = format!(
        "{WITH_SHIFT_SELECT} WHERE r.staff_id = ? AND r.status IN ('RESERVED', 'ONCONFIRM') AND s.start_time <= ? AND ? <= s.end_time ORDER BY s.start_time ASC"
    );
    let slots = sqlx::query_as::<_, ReservationWithShift>(&sql)
        .bind(staff_id)
        .bind(now)
        .bind(now)
        .fetch_all(conn)
        .await?;
    Ok(slots)
}

/// Filtered listing for the admin view
pub async fn find_multi(
    conn: &mut SqliteConnection,
    shift_id: Option<i64>,
    staff_id: Option<i64>,
    status: Option<ReservationStatus>,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<Reservation>> {
    let mut sql = String::from(RESERVATION_SELECT);
    let mut clauses: Vec<&str> = Vec::new();
    if shift_id.is_some() {
        clauses.push("shift_id = ?");
    }
    if staff_id.is_some() {
        clauses.push("staff_id = ?");
    }
    if status.is_some() {
        clauses.push("status = ?");
    }
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY created_at DESC LIMIT ? OFFSET ?");

    let mut query = sqlx::query_as::<_, Reservation>(&sql);
    if let Some(s) = shift_id {
        query = query.bind(s);
    }
    if let Some(s) = staff_id {
        query = query.bind(s);
    }
    if let Some(s) = status {
        query = query.bind(s);
    }
    let reservations = query.bind(limit).bind(offset).fetch_all(conn).await?;
    Ok(reservations)
}

pub async fn count_active_by_shift(conn: &mut SqliteConnection, shift_id: i64) -> RepoResult<i64> {
    let sql =
        format!("SELECT COUNT(*) FROM reservation WHERE shift_id = ? AND status IN {EFFECTIVE}");
    let count: i64 = sqlx::query_scalar(&sql).bind(shift_id).fetch_one(conn).await?;
    Ok(count)
}

/// (status, count) pairs for one shift
pub async fn count_by_status(
    conn: &mut SqliteConnection,
    shift_id: i64,
) -> RepoResult<Vec<(String, i64)>> {
    let counts: Vec<(String, i64)> = sqlx::query_as(
        "SELECT status, COUNT(*) FROM reservation WHERE shift_id = ? GROUP BY status",
    )
    .bind(shift_id)
    .fetch_all(conn)
    .await?;
    Ok(counts)
}

pub async fn create(
    conn: &mut SqliteConnection,
    staff_id: i64,
    shift_id: i64,
    status: ReservationStatus,
) -> RepoResult<Reservation> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO reservation (id, staff_id, shift_id, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
    )
    .bind(id)
    .bind(staff_id)
    .bind(shift_id)
    .bind(status)
    .bind(now)
    .execute(&mut *conn)
    .await
    .map_err(|e| map_insert_err(e, "Reservation for this staff and shift"))?;

    find_by_id(conn, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create reservation".into()))
}

pub async fn update_status(
    conn: &mut SqliteConnection,
    id: i64,
    status: ReservationStatus,
) -> RepoResult<Reservation> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE reservation SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status)
        .bind(now)
        .bind(id)
        .execute(&mut *conn)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Reservation {id} not found")));
    }
    find_by_id(conn, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Reservation {id} not found")))
}

/// Manager-initiated hard delete; frees the slot immediately
pub async fn delete(conn: &mut SqliteConnection, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM reservation WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected() > 0)
}
