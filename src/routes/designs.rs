//! Bitmap design routes, including the JPEG export.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::grid::export::{encode_jpeg, export_filename};
use crate::grid::raster::{self, RasterStyle};
use crate::grid::{CellEntry, CellMap};
use crate::routes::auth::AuthUser;
use crate::services::design::{self, DesignError, DesignRow, PaintOutcome};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct DesignBody {
    pub name: Option<String>,
    pub rows: i32,
    pub cols: i32,
    pub cell_size: i32,
    #[serde(default)]
    pub cells: Vec<CellEntry>,
}

#[derive(Deserialize)]
pub struct PaintBody {
    pub x: f64,
    pub y: f64,
    #[serde(default = "default_zoom")]
    pub zoom: f64,
    pub color: Option<String>,
    #[serde(default)]
    pub erase: bool,
}

fn default_zoom() -> f64 {
    1.0
}

#[derive(Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub plain: bool,
}

#[derive(Serialize)]
pub struct DesignResponse {
    pub id: Uuid,
    pub name: String,
    pub rows: i32,
    pub cols: i32,
    pub cell_size: i32,
    pub cells: Vec<CellEntry>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

fn to_response(row: DesignRow) -> DesignResponse {
    DesignResponse {
        id: row.id,
        name: row.name,
        rows: row.rows,
        cols: row.cols,
        cell_size: row.cell_size,
        cells: row.cells,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

/// `GET /api/designs` — list the user's designs, most recently updated first.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<DesignResponse>>, StatusCode> {
    let rows = design::list_designs(&state.pool, auth.user.id)
        .await
        .map_err(design_error_to_status)?;
    Ok(Json(rows.into_iter().map(to_response).collect()))
}

/// `POST /api/designs` — create a design.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<DesignBody>,
) -> Result<(StatusCode, Json<DesignResponse>), StatusCode> {
    let name = body.name.as_deref().unwrap_or("Untitled Design");
    let row = design::create_design(
        &state.pool,
        auth.user.id,
        name,
        body.rows,
        body.cols,
        body.cell_size,
        &body.cells,
    )
    .await
    .map_err(design_error_to_status)?;
    Ok((StatusCode::CREATED, Json(to_response(row))))
}

/// `GET /api/designs/:id` — fetch one design.
pub async fn get_one(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DesignResponse>, StatusCode> {
    let row = design::get_design(&state.pool, auth.user.id, id)
        .await
        .map_err(design_error_to_status)?;
    Ok(Json(to_response(row)))
}

/// `PUT /api/designs/:id` — replace a design's contents.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<DesignBody>,
) -> Result<Json<DesignResponse>, StatusCode> {
    let name = body.name.as_deref().unwrap_or("Untitled Design");
    design::update_design(
        &state.pool,
        auth.user.id,
        id,
        name,
        body.rows,
        body.cols,
        body.cell_size,
        &body.cells,
    )
    .await
    .map_err(design_error_to_status)?;

    let row = design::get_design(&state.pool, auth.user.id, id)
        .await
        .map_err(design_error_to_status)?;
    Ok(Json(to_response(row)))
}

/// `DELETE /api/designs/:id` — delete a design.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, StatusCode> {
    design::delete_design(&state.pool, auth.user.id, id)
        .await
        .map_err(design_error_to_status)?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/designs/:id/paint` — apply one pointer point.
///
/// Misses (dead-zones, outside the grid) return `200` with `cell: null`
/// rather than an error, so the client can stream drag points unfiltered.
pub async fn paint(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<PaintBody>,
) -> Result<Json<PaintOutcome>, StatusCode> {
    let color = body.color.as_deref().unwrap_or("#3b82f6");
    let outcome = design::paint_design(
        &state.pool,
        auth.user.id,
        id,
        body.x,
        body.y,
        body.zoom,
        color,
        body.erase,
    )
    .await
    .map_err(design_error_to_status)?;
    Ok(Json(outcome))
}

/// `GET /api/designs/:id/export.jpg` — render the design to a JPEG
/// download. `?plain=true` drops the grid lines and pins.
pub async fn export_jpg(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, StatusCode> {
    let row = design::get_design(&state.pool, auth.user.id, id)
        .await
        .map_err(design_error_to_status)?;

    let grid = row.grid();
    let cells = CellMap::from_entries(&row.cells);
    let style = if query.plain {
        RasterStyle { show_grid: false, show_pins: false }
    } else {
        RasterStyle::default()
    };

    let image = raster::render(&grid, &cells, style);
    let bytes = encode_jpeg(&image).map_err(|e| {
        tracing::error!(error = %e, design_id = %id, "jpeg encode failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let disposition = format!("attachment; filename=\"{}\"", export_filename(&row.name));
    Ok((
        StatusCode::OK,
        [(CONTENT_TYPE, "image/jpeg".to_owned()), (CONTENT_DISPOSITION, disposition)],
        bytes,
    )
        .into_response())
}

pub(crate) fn design_error_to_status(err: DesignError) -> StatusCode {
    match err {
        DesignError::NotFound(_) => StatusCode::NOT_FOUND,
        DesignError::InvalidDimensions => StatusCode::UNPROCESSABLE_ENTITY,
        DesignError::InvalidCells(_) => StatusCode::INTERNAL_SERVER_ERROR,
        DesignError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn design_errors_map_to_statuses() {
        assert_eq!(design_error_to_status(DesignError::NotFound(Uuid::new_v4())), StatusCode::NOT_FOUND);
        assert_eq!(design_error_to_status(DesignError::InvalidDimensions), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
