//! Schedule routes — calendar slots and the "current" derivation.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::routes::auth::AuthUser;
use crate::services::schedule::{self, ScheduleError};
use crate::state::AppState;
use crate::tracker::schedule::ScheduledSlot;

#[derive(Deserialize)]
pub struct CreateSlotBody {
    pub option_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
}

#[derive(Serialize)]
pub struct CurrentResponse {
    pub current: Option<ScheduledSlot>,
}

/// `GET /api/schedule` — list the user's slots ordered by start time.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<ScheduledSlot>>, StatusCode> {
    let slots = schedule::list_slots(&state.pool, auth.user.id)
        .await
        .map_err(schedule_error_to_status)?;
    Ok(Json(slots))
}

/// `POST /api/schedule` — create a slot.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateSlotBody>,
) -> Result<(StatusCode, Json<ScheduledSlot>), StatusCode> {
    let slot = schedule::create_slot(&state.pool, auth.user.id, body.option_id, body.start_time, body.end_time)
        .await
        .map_err(schedule_error_to_status)?;

    schedule::invalidate_cache(&state, auth.user.id).await;
    Ok((StatusCode::CREATED, Json(slot)))
}

/// `DELETE /api/schedule/:id` — delete a slot the user owns.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, StatusCode> {
    schedule::delete_slot(&state.pool, auth.user.id, id)
        .await
        .map_err(schedule_error_to_status)?;

    schedule::invalidate_cache(&state, auth.user.id).await;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/schedule/current` — the slot covering now, if any.
pub async fn current(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<CurrentResponse>, StatusCode> {
    let current = schedule::current_for_user(&state, auth.user.id)
        .await
        .map_err(schedule_error_to_status)?;
    Ok(Json(CurrentResponse { current }))
}

pub(crate) fn schedule_error_to_status(err: ScheduleError) -> StatusCode {
    match err {
        ScheduleError::NotFound(_) => StatusCode::NOT_FOUND,
        ScheduleError::EmptyInterval => StatusCode::UNPROCESSABLE_ENTITY,
        ScheduleError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_interval_maps_to_422() {
        assert_eq!(schedule_error_to_status(ScheduleError::EmptyInterval), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn not_found_maps_to_404() {
        let err = ScheduleError::NotFound(Uuid::new_v4());
        assert_eq!(schedule_error_to_status(err), StatusCode::NOT_FOUND);
    }
}
