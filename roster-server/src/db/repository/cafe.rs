//! Cafe Repository

use super::{RepoError, RepoResult, map_insert_err};
use shared::models::{Cafe, CafeCreate, CafeUpdate};
use sqlx::SqliteConnection;

const CAFE_SELECT: &str = "SELECT id, name, city, address, open_time, close_time, phone, description, is_active, manager_id, created_at, updated_at FROM cafe";

/// Closing time must be strictly after opening time ("HH:MM" wall clock)
fn validate_hours(open_time: &str, close_time: &str) -> RepoResult<()> {
    let parse = |v: &str| {
        chrono::NaiveTime::parse_from_str(v, "%H:%M")
            .map_err(|_| RepoError::Validation(format!("Invalid time of day: {v} (expected HH:MM)")))
    };
    let open = parse(open_time)?;
    let close = parse(close_time)?;
    if close <= open {
        return Err(RepoError::Validation(format!(
            "Closing time {close_time} must be after opening time {open_time}"
        )));
    }
    Ok(())
}

pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<Cafe>> {
    let sql = format!("{CAFE_SELECT} WHERE id = ?");
    let cafe = sqlx::query_as::<_, Cafe>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(cafe)
}

pub async fn find_all(
    conn: &mut SqliteConnection,
    only_active: bool,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<Cafe>> {
    let sql = if only_active {
        format!("{CAFE_SELECT} WHERE is_active = 1 ORDER BY city, name LIMIT ? OFFSET ?")
    } else {
        format!("{CAFE_SELECT} ORDER BY city, name LIMIT ? OFFSET ?")
    };
    let cafes = sqlx::query_as::<_, Cafe>(&sql)
        .bind(limit)
        .bind(offset)
        .fetch_all(conn)
        .await?;
    Ok(cafes)
}

pub async fn create(conn: &mut SqliteConnection, data: CafeCreate) -> RepoResult<Cafe> {
    validate_hours(&data.open_time, &data.close_time)?;

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    // manager_id 0 means "no manager"
    let manager_id = data.manager_id.filter(|m| *m != 0);
    sqlx::query(
        "INSERT INTO cafe (id, name, city, address, open_time, close_time, phone, description, is_active, manager_id, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 1, ?9, ?10, ?10)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.city)
    .bind(&data.address)
    .bind(&data.open_time)
    .bind(&data.close_time)
    .bind(&data.phone)
    .bind(&data.description)
    .bind(manager_id)
    .bind(now)
    .execute(&mut *conn)
    .await
    .map_err(|e| map_insert_err(e, "Cafe"))?;

    find_by_id(conn, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create cafe".into()))
}

pub async fn update(conn: &mut SqliteConnection, id: i64, data: CafeUpdate) -> RepoResult<Cafe> {
    let current = find_by_id(&mut *conn, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Cafe {id} not found")))?;

    // Validate the hours that would result from the patch
    let open_time = data.open_time.as_deref().unwrap_or(&current.open_time);
    let close_time = data.close_time.as_deref().unwrap_or(&current.close_time);
    validate_hours(open_time, close_time)?;

    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE cafe SET name = COALESCE(?1, name), city = COALESCE(?2, city), address = COALESCE(?3, address), open_time = COALESCE(?4, open_time), close_time = COALESCE(?5, close_time), phone = COALESCE(?6, phone), description = COALESCE(?7, description), is_active = COALESCE(?8, is_active), manager_id = CASE WHEN ?9 IS NULL THEN manager_id WHEN ?9 = 0 THEN NULL ELSE ?9 END, updated_at = ?10 WHERE id = ?11",
    )
    .bind(&data.name)
    .bind(&data.city)
    .bind(&data.address)
    .bind(&data.open_time)
    .bind(&data.close_time)
    .bind(&data.phone)
    .bind(&data.description)
    .bind(data.is_active)
    .bind(data.manager_id)
    .bind(now)
    .bind(id)
    .execute(&mut *conn)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Cafe {id} not found")));
    }
    find_by_id(conn, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Cafe {id} not found")))
}

/// Hard delete; shifts and their reservations cascade away with it
pub async fn delete(conn: &mut SqliteConnection, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM cafe WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected() > 0)
}
