//! Staff Repository

use super::{RepoError, RepoResult, map_insert_err};
use shared::models::{StaffMember, StaffRole};
use sqlx::SqliteConnection;

const STAFF_SELECT: &str = "SELECT id, name, phone, chat_id, role, password_hash, is_active, cafe_id, created_at, updated_at FROM staff_member";

pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<StaffMember>> {
    let sql = format!("{STAFF_SELECT} WHERE id = ?");
    let staff = sqlx::query_as::<_, StaffMember>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(staff)
}

pub async fn find_by_chat_id(
    conn: &mut SqliteConnection,
    chat_id: i64,
) -> RepoResult<Option<StaffMember>> {
    let sql = format!("{STAFF_SELECT} WHERE chat_id = ?");
    let staff = sqlx::query_as::<_, StaffMember>(&sql)
        .bind(chat_id)
        .fetch_optional(conn)
        .await?;
    Ok(staff)
}

pub async fn find_all(
    conn: &mut SqliteConnection,
    role: Option<StaffRole>,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<StaffMember>> {
    let staff = match role {
        Some(role) => {
            let sql = format!("{STAFF_SELECT} WHERE role = ? ORDER BY name LIMIT ? OFFSET ?");
            sqlx::query_as::<_, StaffMember>(&sql)
                .bind(role)
                .bind(limit)
                .bind(offset)
                .fetch_all(conn)
                .await?
        }
        None => {
            let sql = format!("{STAFF_SELECT} ORDER BY name LIMIT ? OFFSET ?");
            sqlx::query_as::<_, StaffMember>(&sql)
                .bind(limit)
                .bind(offset)
                .fetch_all(conn)
                .await?
        }
    };
    Ok(staff)
}

/// Active baristas of one café (manager assignment candidates)
pub async fn find_active_baristas(
    conn: &mut SqliteConnection,
    cafe_id: i64,
) -> RepoResult<Vec<StaffMember>> {
    let sql = format!("{STAFF_SELECT} WHERE role = 'BARISTA' AND is_active = 1 AND cafe_id = ? ORDER BY name");
    let staff = sqlx::query_as::<_, StaffMember>(&sql)
        .bind(cafe_id)
        .fetch_all(conn)
        .await?;
    Ok(staff)
}

/// Staff member that may be assigned as a café manager
pub async fn find_manager_candidate(
    conn: &mut SqliteConnection,
    id: i64,
) -> RepoResult<Option<StaffMember>> {
    let sql = format!("{STAFF_SELECT} WHERE id = ? AND role IN ('MANAGER', 'ADMIN')");
    let staff = sqlx::query_as::<_, StaffMember>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(staff)
}

pub async fn count_by_role(conn: &mut SqliteConnection, role: StaffRole) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM staff_member WHERE role = ?")
        .bind(role)
        .fetch_one(conn)
        .await?;
    Ok(count)
}

/// Insert a staff member. Baristas start inactive (pending confirmation),
/// admins and managers are active immediately.
pub async fn create(
    conn: &mut SqliteConnection,
    name: &str,
    phone: &str,
    chat_id: i64,
    role: StaffRole,
    password_hash: Option<String>,
    cafe_id: Option<i64>,
) -> RepoResult<StaffMember> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    let is_active = role.can_manage();
    sqlx::query(
        "INSERT INTO staff_member (id, name, phone, chat_id, role, password_hash, is_active, cafe_id, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
    )
    .bind(id)
    .bind(name)
    .bind(phone)
    .bind(chat_id)
    .bind(role)
    .bind(password_hash)
    .bind(is_active)
    .bind(cafe_id)
    .bind(now)
    .execute(&mut *conn)
    .await
    .map_err(|e| map_insert_err(e, "Staff member with this chat id"))?;

    find_by_id(conn, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create staff member".into()))
}

pub async fn update(
    conn: &mut SqliteConnection,
    id: i64,
    name: Option<String>,
    phone: Option<String>,
    role: Option<StaffRole>,
    password_hash: Option<String>,
    is_active: Option<bool>,
    cafe_id: Option<i64>,
) -> RepoResult<StaffMember> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE staff_member SET name = COALESCE(?1, name), phone = COALESCE(?2, phone), role = COALESCE(?3, role), password_hash = COALESCE(?4, password_hash), is_active = COALESCE(?5, is_active), cafe_id = CASE WHEN ?6 IS NULL THEN cafe_id WHEN ?6 = 0 THEN NULL ELSE ?6 END, updated_at = ?7 WHERE id = ?8",
    )
    .bind(name)
    .bind(phone)
    .bind(role)
    .bind(password_hash)
    .bind(is_active)
    .bind(cafe_id)
    .bind(now)
    .bind(id)
    .execute(&mut *conn)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Staff member {id} not found")));
    }
    find_by_id(conn, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Staff member {id} not found")))
}

pub async fn set_active(conn: &mut SqliteConnection, id: i64, active: bool) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE staff_member SET is_active = ?, updated_at = ? WHERE id = ?")
        .bind(active)
        .bind(now)
        .bind(id)
        .execute(conn)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Staff member {id} not found")));
    }
    Ok(())
}

/// Hard delete; the member's reservations cascade away with it
pub async fn delete(conn: &mut SqliteConnection, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM staff_member WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected() > 0)
}
