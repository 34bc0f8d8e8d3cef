//! Log aggregation over day/week/month windows.
//!
//! DESIGN
//! ======
//! Windows are half-open `[start, end)` in UTC: the calendar day containing
//! now, the Monday-start week, or the calendar month. Logs are filtered by
//! `started_at`, grouped by option, summed in minutes, and converted to
//! hours at one decimal. Options with no time in the window are dropped.

#[cfg(test)]
#[path = "stats_test.rs"]
mod tests;

use std::collections::HashMap;

use time::{Date, Duration, Month, OffsetDateTime, Time};
use uuid::Uuid;

/// Aggregation window selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsRange {
    Day,
    Week,
    Month,
}

impl StatsRange {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "day" => Some(Self::Day),
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            _ => None,
        }
    }
}

/// The log fields aggregation needs.
#[derive(Debug, Clone, Copy)]
pub struct LogEntry {
    pub option_id: Uuid,
    pub started_at: OffsetDateTime,
    pub duration_minutes: i64,
}

/// Per-option total within a window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptionTotal {
    pub option_id: Uuid,
    pub minutes: i64,
    pub hours: f64,
}

fn day_start(date: Date) -> OffsetDateTime {
    date.with_time(Time::MIDNIGHT).assume_utc()
}

fn month_start(date: Date) -> Date {
    Date::from_calendar_date(date.year(), date.month(), 1).unwrap_or(date)
}

fn next_month_start(date: Date) -> Date {
    let (year, month) = match date.month() {
        Month::December => (date.year() + 1, Month::January),
        other => (date.year(), other.next()),
    };
    Date::from_calendar_date(year, month, 1).unwrap_or(date)
}

/// Compute the `[start, end)` window containing `now`.
#[must_use]
pub fn window(range: StatsRange, now: OffsetDateTime) -> (OffsetDateTime, OffsetDateTime) {
    let today = now.date();
    match range {
        StatsRange::Day => (day_start(today), day_start(today) + Duration::days(1)),
        StatsRange::Week => {
            let monday = today - Duration::days(i64::from(today.weekday().number_days_from_monday()));
            (day_start(monday), day_start(monday) + Duration::days(7))
        }
        StatsRange::Month => (day_start(month_start(today)), day_start(next_month_start(today))),
    }
}

/// Minutes rounded to hours at one decimal (75 minutes becomes 1.3).
#[must_use]
pub fn round_hours(minutes: i64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let hours = minutes as f64 / 60.0;
    (hours * 10.0).round() / 10.0
}

/// Aggregate in-window logs per option, in the order of `option_ids`.
/// Options with zero in-window minutes are omitted.
#[must_use]
pub fn aggregate(
    option_ids: &[Uuid],
    logs: &[LogEntry],
    start: OffsetDateTime,
    end: OffsetDateTime,
) -> Vec<OptionTotal> {
    let mut minutes_by_option: HashMap<Uuid, i64> = HashMap::new();
    for log in logs {
        if log.started_at >= start && log.started_at < end {
            *minutes_by_option.entry(log.option_id).or_default() += log.duration_minutes;
        }
    }

    option_ids
        .iter()
        .filter_map(|id| {
            let minutes = minutes_by_option.get(id).copied().unwrap_or(0);
            (minutes > 0).then_some(OptionTotal { option_id: *id, minutes, hours: round_hours(minutes) })
        })
        .collect()
}
