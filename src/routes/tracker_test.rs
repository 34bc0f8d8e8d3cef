use super::*;
use time::macros::datetime;

#[test]
fn tracker_errors_map_to_conflict() {
    assert_eq!(tracker_error_to_status(TrackerError::AlreadyActive), StatusCode::CONFLICT);
    assert_eq!(tracker_error_to_status(TrackerError::NotActive), StatusCode::CONFLICT);
}

#[test]
fn elapsed_seconds_counts_from_start() {
    let session = ActiveSession {
        option_id: Uuid::new_v4(),
        scheduled_id: None,
        started_at: datetime!(2024-03-04 09:00 UTC),
    };

    let elapsed = elapsed_seconds(&session, datetime!(2024-03-04 09:02:30 UTC));

    assert_eq!(elapsed, 150);
}

#[test]
fn elapsed_seconds_clamps_clock_skew_to_zero() {
    let session = ActiveSession {
        option_id: Uuid::new_v4(),
        scheduled_id: None,
        started_at: datetime!(2024-03-04 09:00 UTC),
    };

    let elapsed = elapsed_seconds(&session, datetime!(2024-03-04 08:59 UTC));

    assert_eq!(elapsed, 0);
}

#[test]
fn stop_response_copies_draft_fields() {
    let draft = LogDraft {
        option_id: Uuid::new_v4(),
        scheduled_id: Some(Uuid::new_v4()),
        started_at: datetime!(2024-03-04 09:00 UTC),
        ended_at: datetime!(2024-03-04 10:15 UTC),
        duration_minutes: 75,
    };

    let response = to_stop_response(draft);

    assert_eq!(response.option_id, draft.option_id);
    assert_eq!(response.scheduled_id, draft.scheduled_id);
    assert_eq!(response.duration_minutes, 75);
}
