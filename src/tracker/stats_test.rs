use super::*;
use time::macros::datetime;

fn opt_x() -> Uuid {
    Uuid::from_u128(0x10)
}

fn opt_y() -> Uuid {
    Uuid::from_u128(0x20)
}

fn entry(option_id: Uuid, started_at: OffsetDateTime, duration_minutes: i64) -> LogEntry {
    LogEntry { option_id, started_at, duration_minutes }
}

// =============================================================================
// window
// =============================================================================

#[test]
fn day_window_covers_calendar_day() {
    let now = datetime!(2024-03-06 15:42 UTC);
    let (start, end) = window(StatsRange::Day, now);
    assert_eq!(start, datetime!(2024-03-06 00:00 UTC));
    assert_eq!(end, datetime!(2024-03-07 00:00 UTC));
}

#[test]
fn week_window_starts_monday() {
    // 2024-03-06 is a Wednesday.
    let now = datetime!(2024-03-06 15:42 UTC);
    let (start, end) = window(StatsRange::Week, now);
    assert_eq!(start, datetime!(2024-03-04 00:00 UTC));
    assert_eq!(end, datetime!(2024-03-11 00:00 UTC));
}

#[test]
fn week_window_on_monday_starts_today() {
    let now = datetime!(2024-03-04 00:30 UTC);
    let (start, _) = window(StatsRange::Week, now);
    assert_eq!(start, datetime!(2024-03-04 00:00 UTC));
}

#[test]
fn month_window_covers_calendar_month() {
    let now = datetime!(2024-02-10 08:00 UTC);
    let (start, end) = window(StatsRange::Month, now);
    assert_eq!(start, datetime!(2024-02-01 00:00 UTC));
    assert_eq!(end, datetime!(2024-03-01 00:00 UTC));
}

#[test]
fn month_window_rolls_over_december() {
    let now = datetime!(2023-12-25 12:00 UTC);
    let (start, end) = window(StatsRange::Month, now);
    assert_eq!(start, datetime!(2023-12-01 00:00 UTC));
    assert_eq!(end, datetime!(2024-01-01 00:00 UTC));
}

// =============================================================================
// round_hours
// =============================================================================

#[test]
fn round_hours_one_decimal() {
    assert!((round_hours(75) - 1.3).abs() < 1e-9);
    assert!((round_hours(30) - 0.5).abs() < 1e-9);
    assert!((round_hours(0)).abs() < 1e-9);
    assert!((round_hours(60) - 1.0).abs() < 1e-9);
}

// =============================================================================
// aggregate
// =============================================================================

#[test]
fn aggregate_sums_and_drops_zero_totals() {
    let now = datetime!(2024-03-06 12:00 UTC);
    let (start, end) = window(StatsRange::Day, now);
    let logs = vec![
        entry(opt_x(), datetime!(2024-03-06 09:00 UTC), 30),
        entry(opt_x(), datetime!(2024-03-06 11:00 UTC), 45),
        entry(opt_y(), datetime!(2024-03-06 10:00 UTC), 0),
    ];

    let totals = aggregate(&[opt_x(), opt_y()], &logs, start, end);
    assert_eq!(totals.len(), 1);
    assert_eq!(totals[0].option_id, opt_x());
    assert_eq!(totals[0].minutes, 75);
    assert!((totals[0].hours - 1.3).abs() < 1e-9);
}

#[test]
fn aggregate_filters_by_started_at() {
    let (start, end) = window(StatsRange::Day, datetime!(2024-03-06 12:00 UTC));
    let logs = vec![
        entry(opt_x(), datetime!(2024-03-05 23:59 UTC), 60),
        entry(opt_x(), datetime!(2024-03-06 00:00 UTC), 15),
    ];

    let totals = aggregate(&[opt_x()], &logs, start, end);
    assert_eq!(totals[0].minutes, 15);
}

#[test]
fn aggregate_preserves_option_order() {
    let (start, end) = window(StatsRange::Day, datetime!(2024-03-06 12:00 UTC));
    let logs = vec![
        entry(opt_y(), datetime!(2024-03-06 09:00 UTC), 10),
        entry(opt_x(), datetime!(2024-03-06 10:00 UTC), 20),
    ];

    let totals = aggregate(&[opt_x(), opt_y()], &logs, start, end);
    let ids: Vec<Uuid> = totals.iter().map(|t| t.option_id).collect();
    assert_eq!(ids, vec![opt_x(), opt_y()]);
}

#[test]
fn aggregate_ignores_logs_for_unknown_options() {
    let (start, end) = window(StatsRange::Day, datetime!(2024-03-06 12:00 UTC));
    let logs = vec![entry(opt_y(), datetime!(2024-03-06 09:00 UTC), 10)];
    let totals = aggregate(&[opt_x()], &logs, start, end);
    assert!(totals.is_empty());
}

// =============================================================================
// StatsRange
// =============================================================================

#[test]
fn stats_range_parse() {
    assert_eq!(StatsRange::parse("day"), Some(StatsRange::Day));
    assert_eq!(StatsRange::parse("week"), Some(StatsRange::Week));
    assert_eq!(StatsRange::parse("month"), Some(StatsRange::Month));
    assert_eq!(StatsRange::parse("year"), None);
}
