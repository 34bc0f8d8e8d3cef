//! Tracker service — orchestrates the per-user session state machine.
//!
//! ERROR HANDLING
//! ==============
//! Stopping (and the stop half of switching) clears the in-memory session
//! unconditionally, then hands the finished log to the durable flush queue.
//! A user can therefore always start their next session immediately, and a
//! transient database outage delays the log write instead of losing it.

#[cfg(test)]
#[path = "tracker_test.rs"]
mod tests;

use time::OffsetDateTime;
use uuid::Uuid;

use crate::state::AppState;
use crate::tracker::session::{ActiveSession, LogDraft, SessionError};
use crate::services::worker::{self, PendingLog};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TrackerError {
    #[error("a session is already active")]
    AlreadyActive,
    #[error("no session is active")]
    NotActive,
}

impl From<SessionError> for TrackerError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::AlreadyActive => Self::AlreadyActive,
            SessionError::NotActive => Self::NotActive,
        }
    }
}

/// The user's active session, if any.
pub async fn active_session(state: &AppState, user_id: Uuid) -> Option<ActiveSession> {
    let sessions = state.sessions.read().await;
    sessions.get(&user_id).and_then(|s| s.active().copied())
}

/// Start tracking. `scheduled_id` links the session to a calendar slot when
/// it was started from one.
///
/// # Errors
///
/// Returns [`TrackerError::AlreadyActive`] if the user already has a
/// running session.
pub async fn start(
    state: &AppState,
    user_id: Uuid,
    option_id: Uuid,
    scheduled_id: Option<Uuid>,
) -> Result<ActiveSession, TrackerError> {
    let now = OffsetDateTime::now_utc();
    let mut sessions = state.sessions.write().await;
    let entry = sessions.entry(user_id).or_default();
    let session = entry.start(option_id, scheduled_id, now)?;

    tracing::info!(%user_id, %option_id, scheduled = scheduled_id.is_some(), "session started");
    Ok(session)
}

/// Stop tracking and persist the finished session as a log.
///
/// # Errors
///
/// Returns [`TrackerError::NotActive`] if nothing is running.
pub async fn stop(state: &AppState, user_id: Uuid) -> Result<LogDraft, TrackerError> {
    let now = OffsetDateTime::now_utc();
    let draft = {
        let mut sessions = state.sessions.write().await;
        let Some(entry) = sessions.get_mut(&user_id) else {
            return Err(TrackerError::NotActive);
        };
        let draft = entry.stop(now)?;
        sessions.remove(&user_id);
        draft
    };

    tracing::info!(%user_id, option_id = %draft.option_id, minutes = draft.duration_minutes, "session stopped");
    worker::submit_log(state, PendingLog::from_draft(user_id, &draft)).await;
    Ok(draft)
}

/// Switch to a different activity: one log for the old session, a fresh
/// session for the new option with no scheduled link.
///
/// # Errors
///
/// Returns [`TrackerError::NotActive`] if nothing is running.
pub async fn switch(
    state: &AppState,
    user_id: Uuid,
    new_option_id: Uuid,
) -> Result<(LogDraft, ActiveSession), TrackerError> {
    let now = OffsetDateTime::now_utc();
    let (draft, session) = {
        let mut sessions = state.sessions.write().await;
        let Some(entry) = sessions.get_mut(&user_id) else {
            return Err(TrackerError::NotActive);
        };
        entry.switch(new_option_id, now)?
    };

    tracing::info!(
        %user_id,
        from = %draft.option_id,
        to = %session.option_id,
        minutes = draft.duration_minutes,
        "session switched"
    );
    worker::submit_log(state, PendingLog::from_draft(user_id, &draft)).await;
    Ok((draft, session))
}
