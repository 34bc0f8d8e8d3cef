//! Activity option routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::routes::auth::AuthUser;
use crate::services::options::{self, ActivityOption, OptionsError};
use crate::state::AppState;

const DEFAULT_COLOR: &str = "#3b82f6";

#[derive(Deserialize)]
pub struct CreateOptionBody {
    pub name: String,
    pub color: Option<String>,
}

/// `GET /api/options` — list the user's activity options.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<ActivityOption>>, StatusCode> {
    let rows = options::list_options(&state.pool, auth.user.id)
        .await
        .map_err(options_error_to_status)?;
    Ok(Json(rows))
}

/// `POST /api/options` — create an activity option.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateOptionBody>,
) -> Result<(StatusCode, Json<ActivityOption>), StatusCode> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    let color = body.color.as_deref().unwrap_or(DEFAULT_COLOR);

    let row = options::create_option(&state.pool, auth.user.id, name, color)
        .await
        .map_err(options_error_to_status)?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// `DELETE /api/options/:id` — delete an option the user owns.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, StatusCode> {
    options::delete_option(&state.pool, auth.user.id, id)
        .await
        .map_err(options_error_to_status)?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) fn options_error_to_status(err: OptionsError) -> StatusCode {
    match err {
        OptionsError::NotFound(_) => StatusCode::NOT_FOUND,
        OptionsError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
