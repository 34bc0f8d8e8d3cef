//! Tracker routes — start, stop, switch, and the active-session poll.

#[cfg(test)]
#[path = "tracker_test.rs"]
mod tests;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::routes::auth::AuthUser;
use crate::services::tracker::{self, TrackerError};
use crate::state::AppState;
use crate::tracker::session::{ActiveSession, LogDraft};

#[derive(Deserialize)]
pub struct StartBody {
    pub option_id: Uuid,
    pub scheduled_id: Option<Uuid>,
}

#[derive(Deserialize)]
pub struct SwitchBody {
    pub option_id: Uuid,
}

/// The poll payload. `elapsed_seconds` is computed at response time so the
/// client can render a ticking timer without trusting its own clock skew.
#[derive(Serialize)]
pub struct ActiveResponse {
    pub session: Option<ActiveSession>,
    pub elapsed_seconds: Option<i64>,
}

#[derive(Serialize)]
pub struct StopResponse {
    pub option_id: Uuid,
    pub scheduled_id: Option<Uuid>,
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub ended_at: OffsetDateTime,
    pub duration_minutes: i64,
}

#[derive(Serialize)]
pub struct SwitchResponse {
    pub logged: StopResponse,
    pub session: ActiveSession,
}

fn to_stop_response(draft: LogDraft) -> StopResponse {
    StopResponse {
        option_id: draft.option_id,
        scheduled_id: draft.scheduled_id,
        started_at: draft.started_at,
        ended_at: draft.ended_at,
        duration_minutes: draft.duration_minutes,
    }
}

fn elapsed_seconds(session: &ActiveSession, now: OffsetDateTime) -> i64 {
    (now - session.started_at).whole_seconds().max(0)
}

/// `GET /api/tracker/active` — the user's running session, if any.
pub async fn active(State(state): State<AppState>, auth: AuthUser) -> Json<ActiveResponse> {
    let session = tracker::active_session(&state, auth.user.id).await;
    let elapsed = session
        .as_ref()
        .map(|s| elapsed_seconds(s, OffsetDateTime::now_utc()));
    Json(ActiveResponse { session, elapsed_seconds: elapsed })
}

/// `POST /api/tracker/start` — begin tracking an option.
pub async fn start(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<StartBody>,
) -> Result<(StatusCode, Json<ActiveSession>), StatusCode> {
    let session = tracker::start(&state, auth.user.id, body.option_id, body.scheduled_id)
        .await
        .map_err(tracker_error_to_status)?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// `POST /api/tracker/stop` — stop tracking and log the session.
pub async fn stop(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<StopResponse>, StatusCode> {
    let draft = tracker::stop(&state, auth.user.id)
        .await
        .map_err(tracker_error_to_status)?;
    Ok(Json(to_stop_response(draft)))
}

/// `POST /api/tracker/switch` — log the running session and start another.
pub async fn switch(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<SwitchBody>,
) -> Result<Json<SwitchResponse>, StatusCode> {
    let (draft, session) = tracker::switch(&state, auth.user.id, body.option_id)
        .await
        .map_err(tracker_error_to_status)?;
    Ok(Json(SwitchResponse { logged: to_stop_response(draft), session }))
}

pub(crate) fn tracker_error_to_status(err: TrackerError) -> StatusCode {
    match err {
        TrackerError::AlreadyActive | TrackerError::NotActive => StatusCode::CONFLICT,
    }
}
