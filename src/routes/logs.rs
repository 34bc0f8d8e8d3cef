//! Log history and stats routes.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::routes::auth::AuthUser;
use crate::services::logs::{self, ActivityLog, LogsError};
use crate::services::options;
use crate::state::AppState;
use crate::tracker::stats::{self, LogEntry, StatsRange};

#[derive(Deserialize)]
pub struct StatsQuery {
    pub range: Option<String>,
}

#[derive(Serialize)]
pub struct StatsEntry {
    pub option_id: Uuid,
    pub name: String,
    pub color: String,
    pub minutes: i64,
    pub hours: f64,
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub range: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    pub start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end: OffsetDateTime,
    pub totals: Vec<StatsEntry>,
}

/// `GET /api/logs` — the user's finished sessions, newest first.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<ActivityLog>>, StatusCode> {
    let rows = logs::list_logs(&state.pool, auth.user.id)
        .await
        .map_err(logs_error_to_status)?;
    Ok(Json(rows))
}

/// `GET /api/stats?range=day|week|month` — per-option totals for the
/// window containing now. Defaults to `day`; an unknown range is a 422.
pub async fn stats(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<StatsQuery>,
) -> Result<Json<StatsResponse>, StatusCode> {
    let range = match query.range.as_deref() {
        None => StatsRange::Day,
        Some(raw) => StatsRange::parse(raw).ok_or(StatusCode::UNPROCESSABLE_ENTITY)?,
    };
    let (start, end) = stats::window(range, OffsetDateTime::now_utc());

    let options = options::list_options(&state.pool, auth.user.id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    let logs = logs::list_logs(&state.pool, auth.user.id)
        .await
        .map_err(logs_error_to_status)?;

    let entries: Vec<LogEntry> = logs
        .iter()
        .map(|log| LogEntry {
            option_id: log.option_id,
            started_at: log.started_at,
            duration_minutes: log.duration_minutes,
        })
        .collect();
    let option_ids: Vec<Uuid> = options.iter().map(|o| o.id).collect();
    let totals = stats::aggregate(&option_ids, &entries, start, end);

    // Totals come back in option order, so a linear zip-by-lookup is enough
    // to attach display names and colors.
    let decorated = totals
        .into_iter()
        .filter_map(|total| {
            options.iter().find(|o| o.id == total.option_id).map(|option| StatsEntry {
                option_id: total.option_id,
                name: option.name.clone(),
                color: option.color.clone(),
                minutes: total.minutes,
                hours: total.hours,
            })
        })
        .collect();

    Ok(Json(StatsResponse { range: range_label(range), start, end, totals: decorated }))
}

fn range_label(range: StatsRange) -> &'static str {
    match range {
        StatsRange::Day => "day",
        StatsRange::Week => "week",
        StatsRange::Month => "month",
    }
}

pub(crate) fn logs_error_to_status(err: LogsError) -> StatusCode {
    match err {
        LogsError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_labels_round_trip_through_parse() {
        for range in [StatsRange::Day, StatsRange::Week, StatsRange::Month] {
            assert_eq!(StatsRange::parse(range_label(range)), Some(range));
        }
    }
}
