use super::*;
use crate::scheduling::conflict::check_pair;

const GAP: i64 = 60 * MINUTE;

fn range(start_h: i64, end_h: i64) -> TimeRange {
    TimeRange::new(BASE + start_h * HOUR, BASE + end_h * HOUR)
}

#[test]
fn detects_overlap() {
    let found = check_pair(range(9, 13), range(12, 16), GAP).expect("conflict");
    assert_eq!(found.kind, ConflictKind::Overlap);
    assert_eq!(found.other, range(12, 16));

    // Symmetric: candidate inside the other window
    let found = check_pair(range(10, 11), range(9, 13), GAP).expect("conflict");
    assert_eq!(found.kind, ConflictKind::Overlap);
}

#[test]
fn touching_windows_do_not_overlap_but_fail_the_gap() {
    // [9,13) then [13,17): no intersection, zero rest
    let found = check_pair(range(13, 17), range(9, 13), GAP).expect("conflict");
    assert_eq!(found.kind, ConflictKind::GapBefore);
}

#[test]
fn thirty_minute_gap_is_too_small() {
    let candidate = TimeRange::new(BASE + 13 * HOUR + 30 * MINUTE, BASE + 17 * HOUR);
    let earlier = range(9, 13);
    let found = check_pair(candidate, earlier, GAP).expect("conflict");
    assert_eq!(found.kind, ConflictKind::GapBefore);
    assert_eq!(found.other, earlier);

    // Mirror image: the existing shift starts 30 minutes after ours ends
    let later = TimeRange::new(BASE + 17 * HOUR + 30 * MINUTE, BASE + 20 * HOUR);
    let found = check_pair(range(13, 17), later, GAP).expect("conflict");
    assert_eq!(found.kind, ConflictKind::GapAfter);
}

#[test]
fn exact_minimum_gap_is_fine() {
    assert_eq!(check_pair(range(14, 17), range(9, 13), GAP), None);
    assert_eq!(check_pair(range(9, 13), range(14, 17), GAP), None);
}

#[test]
fn distant_windows_do_not_conflict() {
    assert_eq!(check_pair(range(9, 13), range(20, 23), GAP), None);
}

#[test]
fn find_conflict_returns_the_first_collision() {
    let others = vec![range(20, 23), range(12, 16), range(9, 10)];
    let found = find_conflict(range(9, 13), others, GAP).expect("conflict");
    // range(20,23) passes, range(12,16) overlaps
    assert_eq!(found.other, range(12, 16));
}

#[test]
fn empty_schedule_never_conflicts() {
    assert_eq!(find_conflict(range(9, 13), Vec::new(), GAP), None);
}
