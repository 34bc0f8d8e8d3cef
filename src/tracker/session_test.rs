use super::*;
use time::Duration;
use time::macros::datetime;

const T0: OffsetDateTime = datetime!(2024-03-04 09:00 UTC);

fn option_a() -> Uuid {
    Uuid::from_u128(0xa)
}

fn option_b() -> Uuid {
    Uuid::from_u128(0xb)
}

// =============================================================================
// start
// =============================================================================

#[test]
fn start_from_idle_records_now() {
    let mut state = SessionState::Idle;
    let session = state.start(option_a(), None, T0).unwrap();
    assert_eq!(session.option_id, option_a());
    assert_eq!(session.scheduled_id, None);
    assert_eq!(session.started_at, T0);
    assert!(state.is_active());
}

#[test]
fn start_from_scheduled_slot_keeps_scheduled_id() {
    let scheduled = Uuid::from_u128(0x5);
    let mut state = SessionState::Idle;
    let session = state.start(option_a(), Some(scheduled), T0).unwrap();
    assert_eq!(session.scheduled_id, Some(scheduled));
}

#[test]
fn start_while_active_is_rejected() {
    let mut state = SessionState::Idle;
    state.start(option_a(), None, T0).unwrap();
    let err = state.start(option_b(), None, T0 + Duration::minutes(1)).unwrap_err();
    assert_eq!(err, SessionError::AlreadyActive);
    // Original session untouched.
    assert_eq!(state.active().unwrap().option_id, option_a());
}

// =============================================================================
// stop
// =============================================================================

#[test]
fn stop_yields_floor_minutes() {
    let mut state = SessionState::Idle;
    state.start(option_a(), None, T0).unwrap();
    let draft = state.stop(T0 + Duration::seconds(125)).unwrap();
    assert_eq!(draft.duration_minutes, 2);
    assert_eq!(draft.started_at, T0);
    assert_eq!(draft.ended_at, T0 + Duration::seconds(125));
    assert_eq!(state, SessionState::Idle);
}

#[test]
fn stop_under_a_minute_logs_zero() {
    let mut state = SessionState::Idle;
    state.start(option_a(), None, T0).unwrap();
    let draft = state.stop(T0 + Duration::seconds(59)).unwrap();
    assert_eq!(draft.duration_minutes, 0);
}

#[test]
fn stop_when_idle_is_rejected() {
    let mut state = SessionState::Idle;
    assert_eq!(state.stop(T0).unwrap_err(), SessionError::NotActive);
}

#[test]
fn stop_preserves_scheduled_id_in_draft() {
    let scheduled = Uuid::from_u128(0x5);
    let mut state = SessionState::Idle;
    state.start(option_a(), Some(scheduled), T0).unwrap();
    let draft = state.stop(T0 + Duration::minutes(30)).unwrap();
    assert_eq!(draft.scheduled_id, Some(scheduled));
    assert_eq!(draft.duration_minutes, 30);
}

// =============================================================================
// switch
// =============================================================================

#[test]
fn switch_logs_old_and_starts_new() {
    let mut state = SessionState::Idle;
    state.start(option_a(), None, T0).unwrap();

    let now = T0 + Duration::minutes(45);
    let (draft, session) = state.switch(option_b(), now).unwrap();

    assert_eq!(draft.option_id, option_a());
    assert_eq!(draft.ended_at, now);
    assert_eq!(draft.duration_minutes, 45);
    assert_eq!(session.option_id, option_b());
    assert_eq!(session.started_at, now);
    assert_eq!(state.active().unwrap().option_id, option_b());
}

#[test]
fn switch_clears_scheduled_id_on_new_session() {
    let scheduled = Uuid::from_u128(0x5);
    let mut state = SessionState::Idle;
    state.start(option_a(), Some(scheduled), T0).unwrap();

    let (draft, session) = state.switch(option_b(), T0 + Duration::minutes(5)).unwrap();
    assert_eq!(draft.scheduled_id, Some(scheduled));
    assert_eq!(session.scheduled_id, None);
}

#[test]
fn switch_when_idle_is_rejected() {
    let mut state = SessionState::Idle;
    assert_eq!(state.switch(option_b(), T0).unwrap_err(), SessionError::NotActive);
}

// =============================================================================
// duration_minutes
// =============================================================================

#[test]
fn duration_minutes_truncates() {
    assert_eq!(duration_minutes(T0, T0 + Duration::seconds(125)), 2);
    assert_eq!(duration_minutes(T0, T0 + Duration::seconds(119)), 1);
    assert_eq!(duration_minutes(T0, T0), 0);
}
