use sqlx::SqlitePool;

use super::*;
use crate::db::DbService;
use crate::services::{Notification, Notifier, NotifySink};
use shared::models::{CafeCreate, ReservationStatus, StaffRole};

mod test_booking;
mod test_capacity;
mod test_conflict;
mod test_lifecycle;

pub const HOUR: i64 = 3_600_000;
pub const MINUTE: i64 = 60_000;

/// Fixed instant far in the future; conflict/capacity rules are
/// time-of-request independent, so absolute times keep tests stable
pub const BASE: i64 = 1_900_000_000_000;

fn test_policy() -> SchedulePolicy {
    SchedulePolicy::default()
}

async fn test_pool() -> SqlitePool {
    DbService::open_in_memory()
        .await
        .expect("in-memory database")
        .pool
}

async fn seed_cafe(pool: &SqlitePool, city: &str) -> i64 {
    let mut conn = pool.acquire().await.unwrap();
    crate::db::repository::cafe::create(
        &mut conn,
        CafeCreate {
            name: format!("Cafe {}", shared::util::snowflake_id() % 1000),
            city: city.to_string(),
            address: "1 Roast Street".to_string(),
            open_time: "00:00".to_string(),
            close_time: "23:59".to_string(),
            phone: "+10000000001".to_string(),
            description: None,
            manager_id: None,
        },
    )
    .await
    .expect("seed cafe")
    .id
}

async fn seed_staff(pool: &SqlitePool, cafe_id: Option<i64>, active: bool) -> i64 {
    let mut conn = pool.acquire().await.unwrap();
    let member = crate::db::repository::staff::create(
        &mut conn,
        "Test Barista",
        "+10000000002",
        shared::util::snowflake_id(),
        StaffRole::Barista,
        None,
        cafe_id,
    )
    .await
    .expect("seed staff");
    if active {
        crate::db::repository::staff::set_active(&mut conn, member.id, true)
            .await
            .expect("activate staff");
    }
    member.id
}

/// Raw insert, bypassing the operating-hours validation so tests can
/// place shifts at arbitrary instants
async fn seed_shift(pool: &SqlitePool, cafe_id: i64, start: i64, end: i64, capacity: i64) -> i64 {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO shift (id, cafe_id, start_time, end_time, capacity, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
    )
    .bind(id)
    .bind(cafe_id)
    .bind(start)
    .bind(end)
    .bind(capacity)
    .bind(now)
    .execute(pool)
    .await
    .expect("seed shift");
    id
}

/// Raw reservation insert with an explicit status
async fn seed_reservation(
    pool: &SqlitePool,
    staff_id: i64,
    shift_id: i64,
    status: ReservationStatus,
) -> i64 {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO reservation (id, staff_id, shift_id, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
    )
    .bind(id)
    .bind(staff_id)
    .bind(shift_id)
    .bind(status)
    .bind(now)
    .execute(pool)
    .await
    .expect("seed reservation");
    id
}

async fn reservation_status(pool: &SqlitePool, id: i64) -> ReservationStatus {
    let mut conn = pool.acquire().await.unwrap();
    crate::db::repository::reservation::find_by_id(&mut conn, id)
        .await
        .expect("query reservation")
        .expect("reservation exists")
        .status
}

// ========================================================================
// Notification capture
// ========================================================================

#[derive(Default)]
pub struct CaptureSink {
    pub seen: std::sync::Mutex<Vec<Notification>>,
}

#[async_trait::async_trait]
impl NotifySink for CaptureSink {
    async fn deliver(&self, notification: &Notification) -> anyhow::Result<()> {
        self.seen.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

fn capture_notifier() -> (Notifier, std::sync::Arc<CaptureSink>) {
    let sink = std::sync::Arc::new(CaptureSink::default());
    let notifier = Notifier::start(sink.clone());
    (notifier, sink)
}

/// The worker delivers asynchronously; poll until `count` messages landed
async fn wait_for_notifications(sink: &CaptureSink, count: usize) -> Vec<Notification> {
    for _ in 0..200 {
        {
            let seen = sink.seen.lock().unwrap();
            if seen.len() >= count {
                return seen.clone();
            }
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    panic!("timed out waiting for {count} notifications");
}
