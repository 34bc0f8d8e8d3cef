use super::*;
use time::macros::datetime;

fn slot(id: u128, start: OffsetDateTime, end: OffsetDateTime) -> ScheduledSlot {
    ScheduledSlot { id: Uuid::from_u128(id), option_id: Uuid::from_u128(0xa), start_time: start, end_time: end }
}

// =============================================================================
// contains
// =============================================================================

#[test]
fn contains_inside_interval() {
    let s = slot(1, datetime!(2024-03-04 09:00 UTC), datetime!(2024-03-04 10:00 UTC));
    assert!(s.contains(datetime!(2024-03-04 09:30 UTC)));
}

#[test]
fn contains_is_closed_at_both_ends() {
    let s = slot(1, datetime!(2024-03-04 09:00 UTC), datetime!(2024-03-04 10:00 UTC));
    assert!(s.contains(datetime!(2024-03-04 09:00 UTC)));
    assert!(s.contains(datetime!(2024-03-04 10:00 UTC)));
}

#[test]
fn contains_rejects_before_and_after() {
    let s = slot(1, datetime!(2024-03-04 09:00 UTC), datetime!(2024-03-04 10:00 UTC));
    assert!(!s.contains(datetime!(2024-03-04 08:59 UTC)));
    assert!(!s.contains(datetime!(2024-03-04 10:01 UTC)));
}

// =============================================================================
// current_scheduled
// =============================================================================

#[test]
fn finds_covering_slot() {
    let slots = vec![
        slot(1, datetime!(2024-03-04 08:00 UTC), datetime!(2024-03-04 09:00 UTC)),
        slot(2, datetime!(2024-03-04 09:00 UTC), datetime!(2024-03-04 10:00 UTC)),
    ];
    let found = current_scheduled(&slots, datetime!(2024-03-04 09:30 UTC)).unwrap();
    assert_eq!(found.id, Uuid::from_u128(2));
}

#[test]
fn none_when_nothing_covers_now() {
    let slots = vec![slot(1, datetime!(2024-03-04 08:00 UTC), datetime!(2024-03-04 09:00 UTC))];
    assert!(current_scheduled(&slots, datetime!(2024-03-04 12:00 UTC)).is_none());
}

#[test]
fn none_on_empty_schedule() {
    assert!(current_scheduled(&[], datetime!(2024-03-04 12:00 UTC)).is_none());
}

#[test]
fn overlapping_slots_first_in_order_wins() {
    // Rows arrive ordered by start_time; the earlier-starting slot wins.
    let slots = vec![
        slot(1, datetime!(2024-03-04 08:00 UTC), datetime!(2024-03-04 10:00 UTC)),
        slot(2, datetime!(2024-03-04 09:00 UTC), datetime!(2024-03-04 11:00 UTC)),
    ];
    let found = current_scheduled(&slots, datetime!(2024-03-04 09:30 UTC)).unwrap();
    assert_eq!(found.id, Uuid::from_u128(1));
}

#[test]
fn boundary_touching_slots_prefer_the_ending_one() {
    // At exactly 10:00 both the [9,10] and [10,11] slots contain now; the
    // first in start_time order is returned.
    let slots = vec![
        slot(1, datetime!(2024-03-04 09:00 UTC), datetime!(2024-03-04 10:00 UTC)),
        slot(2, datetime!(2024-03-04 10:00 UTC), datetime!(2024-03-04 11:00 UTC)),
    ];
    let found = current_scheduled(&slots, datetime!(2024-03-04 10:00 UTC)).unwrap();
    assert_eq!(found.id, Uuid::from_u128(1));
}
