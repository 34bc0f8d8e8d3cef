//! Derived "current scheduled activity" lookup.
//!
//! DESIGN
//! ======
//! A scheduled activity is current when its closed interval
//! `[start_time, end_time]` contains now. Overlaps are legal (creation never
//! rejects them); ties resolve to the first row in the slice, and the
//! schedule service feeds rows ordered by `start_time`, so the
//! earliest-starting slot wins deterministically.

#[cfg(test)]
#[path = "schedule_test.rs"]
mod tests;

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

/// A calendar slot earmarked for an activity option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScheduledSlot {
    pub id: Uuid,
    pub option_id: Uuid,
    pub start_time: OffsetDateTime,
    pub end_time: OffsetDateTime,
}

impl ScheduledSlot {
    /// Closed-interval containment test.
    #[must_use]
    pub fn contains(&self, now: OffsetDateTime) -> bool {
        self.start_time <= now && now <= self.end_time
    }
}

/// Scan for the slot covering `now`. First match in slice order wins.
#[must_use]
pub fn current_scheduled(slots: &[ScheduledSlot], now: OffsetDateTime) -> Option<&ScheduledSlot> {
    slots.iter().find(|slot| slot.contains(now))
}
