//! Activity tracking core.
//!
//! ARCHITECTURE
//! ============
//! Pure state and arithmetic, no I/O. `session` is the tagged-variant state
//! machine for the single active session, `schedule` derives the scheduled
//! activity covering "now", and `stats` aggregates finished logs into
//! per-option totals. The tracker service owns the per-user instances and
//! handles persistence.

pub mod schedule;
pub mod session;
pub mod stats;

pub use session::{ActiveSession, LogDraft, SessionState};
