use super::*;
use crate::state::test_helpers::{seed_active_session, test_app_state, test_app_state_with_queue};
use tokio::sync::mpsc::error::TryRecvError;

#[tokio::test]
async fn active_session_is_none_for_unknown_user() {
    let state = test_app_state();
    assert!(active_session(&state, Uuid::new_v4()).await.is_none());
}

#[tokio::test]
async fn start_creates_an_active_session() {
    let state = test_app_state();
    let user = Uuid::new_v4();
    let option = Uuid::new_v4();

    let session = start(&state, user, option, None).await.unwrap();

    assert_eq!(session.option_id, option);
    assert_eq!(session.scheduled_id, None);
    let found = active_session(&state, user).await.unwrap();
    assert_eq!(found.option_id, option);
}

#[tokio::test]
async fn start_records_scheduled_link() {
    let state = test_app_state();
    let user = Uuid::new_v4();
    let scheduled = Uuid::new_v4();

    let session = start(&state, user, Uuid::new_v4(), Some(scheduled)).await.unwrap();

    assert_eq!(session.scheduled_id, Some(scheduled));
}

#[tokio::test]
async fn start_while_active_is_rejected() {
    let state = test_app_state();
    let user = Uuid::new_v4();
    let first = Uuid::new_v4();
    seed_active_session(&state, user, first).await;

    let err = start(&state, user, Uuid::new_v4(), None).await.unwrap_err();

    assert_eq!(err, TrackerError::AlreadyActive);
    // The original session is untouched.
    let found = active_session(&state, user).await.unwrap();
    assert_eq!(found.option_id, first);
}

#[tokio::test]
async fn stop_clears_the_session_and_reports_the_draft() {
    let state = test_app_state();
    let user = Uuid::new_v4();
    let option = Uuid::new_v4();
    seed_active_session(&state, user, option).await;

    let draft = stop(&state, user).await.unwrap();

    assert_eq!(draft.option_id, option);
    assert_eq!(draft.duration_minutes, 0);
    assert!(active_session(&state, user).await.is_none());
}

#[tokio::test]
async fn stop_without_a_session_is_rejected() {
    let state = test_app_state();
    let err = stop(&state, Uuid::new_v4()).await.unwrap_err();
    assert_eq!(err, TrackerError::NotActive);
}

#[tokio::test]
async fn stop_twice_fails_the_second_time() {
    let state = test_app_state();
    let user = Uuid::new_v4();
    seed_active_session(&state, user, Uuid::new_v4()).await;

    stop(&state, user).await.unwrap();
    let err = stop(&state, user).await.unwrap_err();

    assert_eq!(err, TrackerError::NotActive);
}

#[tokio::test]
async fn switch_logs_the_old_and_starts_the_new() {
    let state = test_app_state();
    let user = Uuid::new_v4();
    let old = Uuid::new_v4();
    let new = Uuid::new_v4();
    seed_active_session(&state, user, old).await;

    let (draft, session) = switch(&state, user, new).await.unwrap();

    assert_eq!(draft.option_id, old);
    assert_eq!(session.option_id, new);
    // A switch never carries a scheduled link into the new session.
    assert_eq!(session.scheduled_id, None);
    let found = active_session(&state, user).await.unwrap();
    assert_eq!(found.option_id, new);
}

#[tokio::test]
async fn switch_without_a_session_is_rejected() {
    let state = test_app_state();
    let err = switch(&state, Uuid::new_v4(), Uuid::new_v4()).await.unwrap_err();
    assert_eq!(err, TrackerError::NotActive);
}

#[tokio::test]
async fn stop_enqueues_one_pending_log() {
    let (state, mut rx) = test_app_state_with_queue(8);
    let user = Uuid::new_v4();
    let option = Uuid::new_v4();
    let session = seed_active_session(&state, user, option).await;

    let draft = stop(&state, user).await.unwrap();

    let pending = rx.try_recv().unwrap();
    assert_eq!(pending.user_id, user);
    assert_eq!(pending.option_id, option);
    assert_eq!(pending.started_at, session.started_at);
    assert_eq!(pending.duration_minutes, draft.duration_minutes);
    assert_eq!(rx.try_recv().unwrap_err(), TryRecvError::Empty);
}

#[tokio::test]
async fn switch_enqueues_one_pending_log_for_the_old_session() {
    let (state, mut rx) = test_app_state_with_queue(8);
    let user = Uuid::new_v4();
    let old = Uuid::new_v4();
    seed_active_session(&state, user, old).await;

    let (draft, session) = switch(&state, user, Uuid::new_v4()).await.unwrap();

    // Exactly one log, for the session that ended, not the one that began.
    let pending = rx.try_recv().unwrap();
    assert_eq!(pending.user_id, user);
    assert_eq!(pending.option_id, old);
    assert_eq!(pending.ended_at, draft.ended_at);
    assert_ne!(pending.option_id, session.option_id);
    assert_eq!(rx.try_recv().unwrap_err(), TryRecvError::Empty);
}

#[tokio::test]
async fn sessions_are_independent_per_user() {
    let state = test_app_state();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    start(&state, alice, Uuid::new_v4(), None).await.unwrap();

    assert!(active_session(&state, alice).await.is_some());
    assert!(active_session(&state, bob).await.is_none());
    assert_eq!(stop(&state, bob).await.unwrap_err(), TrackerError::NotActive);
}
