use super::*;
use crate::utils::AppError;

// ========================================================================
// create_reservation
// ========================================================================

#[tokio::test]
async fn booking_fills_a_shift_then_rejects_the_next() {
    // Scenario: capacity 2 - two bookings succeed, the third is refused
    let pool = test_pool().await;
    let cafe_id = seed_cafe(&pool, "Lisbon").await;
    let shift_id = seed_shift(&pool, cafe_id, BASE + 9 * HOUR, BASE + 13 * HOUR, 2).await;
    let first = seed_staff(&pool, Some(cafe_id), true).await;
    let second = seed_staff(&pool, Some(cafe_id), true).await;
    let third = seed_staff(&pool, Some(cafe_id), true).await;

    let booked = create_reservation(&pool, test_policy(), first, shift_id)
        .await
        .unwrap();
    assert_eq!(booked.status, ReservationStatus::Reserved);
    assert_eq!(status_summary(&pool, shift_id).await.unwrap().free_slots, 1);

    create_reservation(&pool, test_policy(), second, shift_id)
        .await
        .unwrap();
    assert_eq!(status_summary(&pool, shift_id).await.unwrap().free_slots, 0);

    let err = create_reservation(&pool, test_policy(), third, shift_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::CapacityExceeded(_)));
    // The refused call must not have written anything
    assert_eq!(
        status_summary(&pool, shift_id).await.unwrap().active_count,
        2
    );
}

#[tokio::test]
async fn double_booking_is_rejected_until_the_first_is_cancelled() {
    let pool = test_pool().await;
    let cafe_id = seed_cafe(&pool, "Lisbon").await;
    let shift_id = seed_shift(&pool, cafe_id, BASE + 9 * HOUR, BASE + 13 * HOUR, 3).await;
    let staff_id = seed_staff(&pool, Some(cafe_id), true).await;

    let first = create_reservation(&pool, test_policy(), staff_id, shift_id)
        .await
        .unwrap();
    let err = create_reservation(&pool, test_policy(), staff_id, shift_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::DuplicateBooking(_)));

    // A cancelled row is inert history: booking again works and makes a
    // fresh reservation
    cancel_reservation(&pool, first.id).await.unwrap();
    let second = create_reservation(&pool, test_policy(), staff_id, shift_id)
        .await
        .unwrap();
    assert_ne!(second.id, first.id);
    assert_eq!(second.status, ReservationStatus::Reserved);
}

#[tokio::test]
async fn thirty_minute_gap_between_shifts_is_a_conflict() {
    // Scenario: booked 09:00-13:00, trying 13:30-17:00 (30 < 60 min gap)
    let pool = test_pool().await;
    let cafe_id = seed_cafe(&pool, "Lisbon").await;
    let staff_id = seed_staff(&pool, Some(cafe_id), true).await;

    let first = seed_shift(&pool, cafe_id, BASE + 9 * HOUR, BASE + 13 * HOUR, 1).await;
    create_reservation(&pool, test_policy(), staff_id, first)
        .await
        .unwrap();

    let close_one = seed_shift(
        &pool,
        cafe_id,
        BASE + 13 * HOUR + 30 * MINUTE,
        BASE + 17 * HOUR,
        1,
    )
    .await;
    let err = create_reservation(&pool, test_policy(), staff_id, close_one)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ScheduleConflict(_)));

    // A full hour of rest is acceptable
    let far_enough = seed_shift(&pool, cafe_id, BASE + 14 * HOUR, BASE + 17 * HOUR, 1).await;
    create_reservation(&pool, test_policy(), staff_id, far_enough)
        .await
        .unwrap();
}

#[tokio::test]
async fn overlapping_booking_is_a_conflict() {
    let pool = test_pool().await;
    let cafe_a = seed_cafe(&pool, "Lisbon").await;
    let cafe_b = seed_cafe(&pool, "Lisbon").await;
    let staff_id = seed_staff(&pool, Some(cafe_a), true).await;

    let first = seed_shift(&pool, cafe_a, BASE + 9 * HOUR, BASE + 13 * HOUR, 1).await;
    create_reservation(&pool, test_policy(), staff_id, first)
        .await
        .unwrap();

    // Same hours at another café: one person cannot work both
    let clashing = seed_shift(&pool, cafe_b, BASE + 11 * HOUR, BASE + 15 * HOUR, 1).await;
    let err = create_reservation(&pool, test_policy(), staff_id, clashing)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ScheduleConflict(_)));
}

#[tokio::test]
async fn missing_shift_and_staff_are_not_found() {
    let pool = test_pool().await;
    let cafe_id = seed_cafe(&pool, "Lisbon").await;
    let staff_id = seed_staff(&pool, Some(cafe_id), true).await;
    let shift_id = seed_shift(&pool, cafe_id, BASE + 9 * HOUR, BASE + 13 * HOUR, 1).await;

    let err = create_reservation(&pool, test_policy(), staff_id, 4242)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = create_reservation(&pool, test_policy(), 4242, shift_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn unconfirmed_barista_cannot_book() {
    let pool = test_pool().await;
    let cafe_id = seed_cafe(&pool, "Lisbon").await;
    let staff_id = seed_staff(&pool, Some(cafe_id), false).await;
    let shift_id = seed_shift(&pool, cafe_id, BASE + 9 * HOUR, BASE + 13 * HOUR, 1).await;

    let err = create_reservation(&pool, test_policy(), staff_id, shift_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

// ========================================================================
// cancel / transition table
// ========================================================================

#[tokio::test]
async fn cancelling_twice_is_a_quiet_no_op() {
    let pool = test_pool().await;
    let cafe_id = seed_cafe(&pool, "Lisbon").await;
    let staff_id = seed_staff(&pool, Some(cafe_id), true).await;
    let shift_id = seed_shift(&pool, cafe_id, BASE + 9 * HOUR, BASE + 13 * HOUR, 1).await;
    let booked = create_reservation(&pool, test_policy(), staff_id, shift_id)
        .await
        .unwrap();

    let first = cancel_reservation(&pool, booked.id).await.unwrap();
    assert_eq!(first.status, ReservationStatus::Cancelled);

    // Second cancel: unchanged state, no error
    let second = cancel_reservation(&pool, booked.id).await.unwrap();
    assert_eq!(second.status, ReservationStatus::Cancelled);
    assert_eq!(second.updated_at, first.updated_at);
}

#[tokio::test]
async fn terminal_statuses_reject_real_transitions() {
    let pool = test_pool().await;
    let cafe_id = seed_cafe(&pool, "Lisbon").await;
    let staff_id = seed_staff(&pool, Some(cafe_id), true).await;
    let shift_id = seed_shift(&pool, cafe_id, BASE + 9 * HOUR, BASE + 13 * HOUR, 2).await;

    let attended = seed_reservation(&pool, staff_id, shift_id, ReservationStatus::Attended).await;
    let err = update_reservation_status(&pool, attended, ReservationStatus::Reserved)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)));

    let err = cancel_reservation(&pool, attended).await.unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)));
    assert_eq!(
        reservation_status(&pool, attended).await,
        ReservationStatus::Attended
    );
}

#[tokio::test]
async fn pending_assignment_can_be_accepted_or_declined() {
    let pool = test_pool().await;
    let cafe_id = seed_cafe(&pool, "Lisbon").await;
    let staff_id = seed_staff(&pool, Some(cafe_id), true).await;
    let shift_id = seed_shift(&pool, cafe_id, BASE + 9 * HOUR, BASE + 13 * HOUR, 2).await;

    let pending = seed_reservation(&pool, staff_id, shift_id, ReservationStatus::OnConfirm).await;
    let accepted = update_reservation_status(&pool, pending, ReservationStatus::Reserved)
        .await
        .unwrap();
    assert_eq!(accepted.status, ReservationStatus::Reserved);
}

#[tokio::test]
async fn transitions_on_missing_reservations_are_not_found() {
    let pool = test_pool().await;
    let err = update_reservation_status(&pool, 4242, ReservationStatus::Cancelled)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

// ========================================================================
// confirm_attendance
// ========================================================================

#[tokio::test]
async fn check_in_marks_the_running_shift_attended() {
    let pool = test_pool().await;
    let cafe_id = seed_cafe(&pool, "Lisbon").await;
    let staff_id = seed_staff(&pool, Some(cafe_id), true).await;

    let now = shared::util::now_millis();
    let running = seed_shift(&pool, cafe_id, now - HOUR, now + 2 * HOUR, 1).await;
    let booked = seed_reservation(&pool, staff_id, running, ReservationStatus::Reserved).await;

    let attended = confirm_attendance(&pool, staff_id).await.unwrap();
    assert_eq!(attended.id, booked);
    assert_eq!(attended.status, ReservationStatus::Attended);
}

#[tokio::test]
async fn check_in_without_a_running_shift_fails() {
    // Scenario: the only booking starts tomorrow
    let pool = test_pool().await;
    let cafe_id = seed_cafe(&pool, "Lisbon").await;
    let staff_id = seed_staff(&pool, Some(cafe_id), true).await;

    let now = shared::util::now_millis();
    let tomorrow = seed_shift(&pool, cafe_id, now + 24 * HOUR, now + 28 * HOUR, 1).await;
    seed_reservation(&pool, staff_id, tomorrow, ReservationStatus::Reserved).await;

    let err = confirm_attendance(&pool, staff_id).await.unwrap_err();
    assert!(matches!(err, AppError::NoActiveShift(_)));
}

#[tokio::test]
async fn check_in_resolves_a_pending_assignment_too() {
    let pool = test_pool().await;
    let cafe_id = seed_cafe(&pool, "Lisbon").await;
    let staff_id = seed_staff(&pool, Some(cafe_id), true).await;

    let now = shared::util::now_millis();
    let running = seed_shift(&pool, cafe_id, now - HOUR, now + 2 * HOUR, 1).await;
    seed_reservation(&pool, staff_id, running, ReservationStatus::OnConfirm).await;

    let attended = confirm_attendance(&pool, staff_id).await.unwrap();
    assert_eq!(attended.status, ReservationStatus::Attended);
}
