use super::*;
use crate::utils::AppError;

#[tokio::test]
async fn reassignment_cancels_the_old_and_creates_a_pending_booking() {
    // Scenario: manager moves the slot from one barista to another
    let pool = test_pool().await;
    let (notifier, sink) = capture_notifier();
    let cafe_id = seed_cafe(&pool, "Lisbon").await;
    let shift_id = seed_shift(&pool, cafe_id, BASE + 9 * HOUR, BASE + 13 * HOUR, 1).await;
    let old_staff = seed_staff(&pool, Some(cafe_id), true).await;
    let new_staff = seed_staff(&pool, Some(cafe_id), true).await;

    let booked = create_reservation(&pool, test_policy(), old_staff, shift_id)
        .await
        .unwrap();

    let created = change_booking(
        &pool,
        test_policy(),
        &notifier,
        shift_id,
        old_staff,
        Some(new_staff),
    )
    .await
    .unwrap()
    .expect("a pending reservation");

    assert_eq!(created.staff_id, new_staff);
    // Manager assignment starts pending, unlike self-service booking
    assert_eq!(created.status, ReservationStatus::OnConfirm);
    assert_eq!(
        reservation_status(&pool, booked.id).await,
        ReservationStatus::Cancelled
    );

    // Both parties hear about it
    let messages = wait_for_notifications(&sink, 2).await;
    assert!(messages.iter().any(|m| m.text.contains("cancelled")));
    assert!(messages.iter().any(|m| m.text.contains("confirm or decline")));
}

#[tokio::test]
async fn releasing_a_slot_creates_nothing() {
    let pool = test_pool().await;
    let (notifier, sink) = capture_notifier();
    let cafe_id = seed_cafe(&pool, "Lisbon").await;
    let shift_id = seed_shift(&pool, cafe_id, BASE + 9 * HOUR, BASE + 13 * HOUR, 1).await;
    let staff_id = seed_staff(&pool, Some(cafe_id), true).await;

    let booked = create_reservation(&pool, test_policy(), staff_id, shift_id)
        .await
        .unwrap();

    let created = change_booking(&pool, test_policy(), &notifier, shift_id, staff_id, None)
        .await
        .unwrap();
    assert!(created.is_none());
    assert_eq!(
        reservation_status(&pool, booked.id).await,
        ReservationStatus::Cancelled
    );
    // The shift is open again
    assert_eq!(status_summary(&pool, shift_id).await.unwrap().free_slots, 1);

    let messages = wait_for_notifications(&sink, 1).await;
    assert!(messages[0].text.contains("cancelled"));
}

#[tokio::test]
async fn releasing_when_nothing_is_booked_is_harmless() {
    let pool = test_pool().await;
    let (notifier, _sink) = capture_notifier();
    let cafe_id = seed_cafe(&pool, "Lisbon").await;
    let shift_id = seed_shift(&pool, cafe_id, BASE + 9 * HOUR, BASE + 13 * HOUR, 1).await;
    let staff_id = seed_staff(&pool, Some(cafe_id), true).await;

    let created = change_booking(&pool, test_policy(), &notifier, shift_id, staff_id, None)
        .await
        .unwrap();
    assert!(created.is_none());
}

#[tokio::test]
async fn duplicate_target_rolls_the_whole_change_back() {
    let pool = test_pool().await;
    let (notifier, _sink) = capture_notifier();
    let cafe_id = seed_cafe(&pool, "Lisbon").await;
    let shift_id = seed_shift(&pool, cafe_id, BASE + 9 * HOUR, BASE + 13 * HOUR, 2).await;
    let old_staff = seed_staff(&pool, Some(cafe_id), true).await;
    let new_staff = seed_staff(&pool, Some(cafe_id), true).await;

    let old_booking = create_reservation(&pool, test_policy(), old_staff, shift_id)
        .await
        .unwrap();
    create_reservation(&pool, test_policy(), new_staff, shift_id)
        .await
        .unwrap();

    let err = change_booking(
        &pool,
        test_policy(),
        &notifier,
        shift_id,
        old_staff,
        Some(new_staff),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::DuplicateBooking(_)));

    // All-or-nothing: the failed change must not have cancelled the old booking
    assert_eq!(
        reservation_status(&pool, old_booking.id).await,
        ReservationStatus::Reserved
    );
}

#[tokio::test]
async fn assignment_without_removal_respects_capacity() {
    let pool = test_pool().await;
    let (notifier, _sink) = capture_notifier();
    let cafe_id = seed_cafe(&pool, "Lisbon").await;
    let shift_id = seed_shift(&pool, cafe_id, BASE + 9 * HOUR, BASE + 13 * HOUR, 1).await;
    let holder = seed_staff(&pool, Some(cafe_id), true).await;
    let extra = seed_staff(&pool, Some(cafe_id), true).await;

    create_reservation(&pool, test_policy(), holder, shift_id)
        .await
        .unwrap();

    // `extra` holds nothing on this shift, so the locate step is a no-op
    // and the change would grow the active count past capacity
    let err = change_booking(
        &pool,
        test_policy(),
        &notifier,
        shift_id,
        extra,
        Some(extra),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::CapacityExceeded(_)));
    assert_eq!(status_summary(&pool, shift_id).await.unwrap().active_count, 1);
}

#[tokio::test]
async fn reassignment_on_a_full_shift_keeps_the_count_flat() {
    let pool = test_pool().await;
    let (notifier, _sink) = capture_notifier();
    let cafe_id = seed_cafe(&pool, "Lisbon").await;
    let shift_id = seed_shift(&pool, cafe_id, BASE + 9 * HOUR, BASE + 13 * HOUR, 1).await;
    let old_staff = seed_staff(&pool, Some(cafe_id), true).await;
    let new_staff = seed_staff(&pool, Some(cafe_id), true).await;

    create_reservation(&pool, test_policy(), old_staff, shift_id)
        .await
        .unwrap();

    let created = change_booking(
        &pool,
        test_policy(),
        &notifier,
        shift_id,
        old_staff,
        Some(new_staff),
    )
    .await
    .unwrap();
    assert!(created.is_some());
    assert_eq!(status_summary(&pool, shift_id).await.unwrap().active_count, 1);
}

#[tokio::test]
async fn assignment_obeys_the_target_schedule() {
    // The new barista already works 11:00-15:00 elsewhere; a pending
    // assignment is effective, so the overlap must be refused
    let pool = test_pool().await;
    let (notifier, _sink) = capture_notifier();
    let cafe_a = seed_cafe(&pool, "Lisbon").await;
    let cafe_b = seed_cafe(&pool, "Lisbon").await;
    let shift_id = seed_shift(&pool, cafe_a, BASE + 9 * HOUR, BASE + 13 * HOUR, 1).await;
    let busy_elsewhere = seed_shift(&pool, cafe_b, BASE + 11 * HOUR, BASE + 15 * HOUR, 1).await;
    let old_staff = seed_staff(&pool, Some(cafe_a), true).await;
    let new_staff = seed_staff(&pool, Some(cafe_a), true).await;

    create_reservation(&pool, test_policy(), old_staff, shift_id)
        .await
        .unwrap();
    create_reservation(&pool, test_policy(), new_staff, busy_elsewhere)
        .await
        .unwrap();

    let err = change_booking(
        &pool,
        test_policy(),
        &notifier,
        shift_id,
        old_staff,
        Some(new_staff),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::ScheduleConflict(_)));
}

#[tokio::test]
async fn changing_a_missing_shift_is_not_found() {
    let pool = test_pool().await;
    let (notifier, _sink) = capture_notifier();
    let err = change_booking(&pool, test_policy(), &notifier, 4242, 1, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
