//! Active-session state machine.
//!
//! DESIGN
//! ======
//! At most one session runs at a time. The state is an explicit tagged
//! variant rather than an ambient optional so every transition is spelled
//! out: start (idle only), stop (active only, yields a log draft), and
//! switch (atomic stop-then-start, never carrying the scheduled id over).
//! "Scheduled" is a derived view computed in [`crate::tracker::schedule`],
//! never stored here.

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

/// The single in-progress timed activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActiveSession {
    pub option_id: Uuid,
    /// Set when the session was started from a calendar slot.
    pub scheduled_id: Option<Uuid>,
    pub started_at: OffsetDateTime,
}

/// A finished session, ready to be persisted as an activity log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LogDraft {
    pub option_id: Uuid,
    pub scheduled_id: Option<Uuid>,
    pub started_at: OffsetDateTime,
    pub ended_at: OffsetDateTime,
    pub duration_minutes: i64,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("a session is already active")]
    AlreadyActive,
    #[error("no session is active")]
    NotActive,
}

/// Tracking state for one user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Idle,
    Active(ActiveSession),
}

/// Whole minutes between two instants, truncated (125s becomes 2).
#[must_use]
pub fn duration_minutes(started_at: OffsetDateTime, ended_at: OffsetDateTime) -> i64 {
    (ended_at - started_at).whole_minutes()
}

impl SessionState {
    #[must_use]
    pub fn active(&self) -> Option<&ActiveSession> {
        match self {
            Self::Idle => None,
            Self::Active(session) => Some(session),
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }

    /// `Idle -> Active`. Records `now` as the session start.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::AlreadyActive`] if a session is running;
    /// callers switch instead of silently replacing it.
    pub fn start(
        &mut self,
        option_id: Uuid,
        scheduled_id: Option<Uuid>,
        now: OffsetDateTime,
    ) -> Result<ActiveSession, SessionError> {
        if self.is_active() {
            return Err(SessionError::AlreadyActive);
        }
        let session = ActiveSession { option_id, scheduled_id, started_at: now };
        *self = Self::Active(session);
        Ok(session)
    }

    /// `Active -> Idle`. Produces the log draft for the finished session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotActive`] if nothing is running.
    pub fn stop(&mut self, now: OffsetDateTime) -> Result<LogDraft, SessionError> {
        let Self::Active(session) = *self else {
            return Err(SessionError::NotActive);
        };
        *self = Self::Idle;
        Ok(LogDraft {
            option_id: session.option_id,
            scheduled_id: session.scheduled_id,
            started_at: session.started_at,
            ended_at: now,
            duration_minutes: duration_minutes(session.started_at, now),
        })
    }

    /// `Active -> Active`. Atomic stop-then-start: the old session becomes a
    /// log draft and the new one starts at `now` with no scheduled id.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotActive`] if nothing is running.
    pub fn switch(
        &mut self,
        new_option_id: Uuid,
        now: OffsetDateTime,
    ) -> Result<(LogDraft, ActiveSession), SessionError> {
        let draft = self.stop(now)?;
        let session = ActiveSession { option_id: new_option_id, scheduled_id: None, started_at: now };
        *self = Self::Active(session);
        Ok((draft, session))
    }
}
