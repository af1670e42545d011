use super::*;
use shared::models::{Reservation, Shift};

fn fixture_shift(capacity: i64) -> Shift {
    Shift {
        id: 1,
        cafe_id: 1,
        start_time: BASE,
        end_time: BASE + 4 * HOUR,
        capacity,
        created_at: BASE,
        updated_at: BASE,
    }
}

fn fixture_reservation(id: i64, status: ReservationStatus) -> Reservation {
    Reservation {
        id,
        staff_id: id,
        shift_id: 1,
        status,
        created_at: BASE,
        updated_at: BASE,
    }
}

#[test]
fn cancelled_rows_never_count() {
    let shift = fixture_shift(2);
    let reservations = vec![
        fixture_reservation(1, ReservationStatus::Reserved),
        fixture_reservation(2, ReservationStatus::Cancelled),
        fixture_reservation(3, ReservationStatus::Cancelled),
    ];
    let load = shift_load(&shift, &reservations).unwrap();
    assert_eq!(load.active_count, 1);
    assert_eq!(load.free_slots, 1);
    assert!(!load.is_full());
}

#[test]
fn every_effective_status_counts() {
    let shift = fixture_shift(3);
    let reservations = vec![
        fixture_reservation(1, ReservationStatus::Reserved),
        fixture_reservation(2, ReservationStatus::OnConfirm),
        fixture_reservation(3, ReservationStatus::Attended),
    ];
    let load = shift_load(&shift, &reservations).unwrap();
    assert_eq!(load.active_count, 3);
    assert_eq!(load.free_slots, 0);
    assert!(load.is_full());
}

#[test]
fn overfull_shift_is_an_internal_error_not_a_clamp() {
    let shift = fixture_shift(1);
    let reservations = vec![
        fixture_reservation(1, ReservationStatus::Reserved),
        fixture_reservation(2, ReservationStatus::Attended),
    ];
    let err = shift_load(&shift, &reservations).unwrap_err();
    assert!(matches!(err, crate::utils::AppError::Internal(_)));
}

#[tokio::test]
async fn summary_reports_per_status_counts() {
    let pool = test_pool().await;
    let cafe_id = seed_cafe(&pool, "Porto").await;
    let shift_id = seed_shift(&pool, cafe_id, BASE, BASE + 4 * HOUR, 5).await;

    let a = seed_staff(&pool, Some(cafe_id), true).await;
    let b = seed_staff(&pool, Some(cafe_id), true).await;
    let c = seed_staff(&pool, Some(cafe_id), true).await;
    let d = seed_staff(&pool, Some(cafe_id), true).await;
    seed_reservation(&pool, a, shift_id, ReservationStatus::Reserved).await;
    seed_reservation(&pool, b, shift_id, ReservationStatus::OnConfirm).await;
    seed_reservation(&pool, c, shift_id, ReservationStatus::Attended).await;
    seed_reservation(&pool, d, shift_id, ReservationStatus::Cancelled).await;

    let summary = status_summary(&pool, shift_id).await.unwrap();
    assert_eq!(summary.capacity, 5);
    assert_eq!(summary.reserved, 1);
    assert_eq!(summary.onconfirm, 1);
    assert_eq!(summary.attended, 1);
    assert_eq!(summary.cancelled, 1);
    assert_eq!(summary.active_count, 3);
    assert_eq!(summary.free_slots, 2);
}

#[tokio::test]
async fn summary_of_missing_shift_is_not_found() {
    let pool = test_pool().await;
    let err = status_summary(&pool, 4242).await.unwrap_err();
    assert!(matches!(err, crate::utils::AppError::NotFound(_)));
}
