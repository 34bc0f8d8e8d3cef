//! Bitmap design service — CRUD and the paint operation.
//!
//! DESIGN
//! ======
//! A design row stores its grid dimensions plus the sparse cell list as
//! JSONB. Painting loads the row, hit-tests the pointer against the
//! staggered grid, mutates the cell map, and writes it back; pointer misses
//! (dead-zones, out of bounds) are silent no-ops so drag-painting can
//! stream points without client-side filtering.

#[cfg(test)]
#[path = "design_test.rs"]
mod tests;

use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::grid::{CellEntry, CellMap, StaggerGrid};

#[derive(Debug, thiserror::Error)]
pub enum DesignError {
    #[error("design not found: {0}")]
    NotFound(Uuid),
    #[error("invalid design dimensions")]
    InvalidDimensions,
    #[error("invalid cell data: {0}")]
    InvalidCells(serde_json::Error),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Row from `bitmap_designs`.
#[derive(Debug, Clone)]
pub struct DesignRow {
    pub id: Uuid,
    pub name: String,
    pub rows: i32,
    pub cols: i32,
    pub cell_size: i32,
    pub cells: Vec<CellEntry>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl DesignRow {
    /// Grid parameters at 1.0 zoom.
    #[must_use]
    pub fn grid(&self) -> StaggerGrid {
        #[allow(clippy::cast_sign_loss)]
        StaggerGrid::new(self.rows.max(0) as u32, self.cols.max(0) as u32, f64::from(self.cell_size))
    }
}

/// What a paint stroke resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct PaintOutcome {
    /// The covered cell, or `None` when the point missed the grid.
    pub cell: Option<(u32, u32)>,
    /// Whether the stored cell list changed.
    pub changed: bool,
}

fn check_dimensions(rows: i32, cols: i32, cell_size: i32) -> Result<(), DesignError> {
    if rows <= 0 || cols <= 0 || cell_size <= 0 {
        return Err(DesignError::InvalidDimensions);
    }
    Ok(())
}

fn decode_cells(value: &serde_json::Value) -> Result<Vec<CellEntry>, DesignError> {
    serde_json::from_value(value.clone()).map_err(DesignError::InvalidCells)
}

fn encode_cells(entries: &[CellEntry]) -> serde_json::Value {
    serde_json::to_value(entries).unwrap_or_else(|_| serde_json::Value::Array(Vec::new()))
}

/// Sanitize an incoming cell list against the design's grid: out-of-range
/// entries are dropped rather than rejected.
fn clipped_entries(entries: &[CellEntry], grid: &StaggerGrid) -> Vec<CellEntry> {
    let mut map = CellMap::from_entries(entries);
    let dropped = map.clip(grid);
    if dropped > 0 {
        tracing::warn!(dropped, "dropped out-of-range cells from design payload");
    }
    map.to_entries()
}

/// Create a design.
///
/// # Errors
///
/// Returns [`DesignError::InvalidDimensions`] for non-positive dimensions,
/// or a database error if the insert fails.
pub async fn create_design(
    pool: &PgPool,
    user_id: Uuid,
    name: &str,
    rows: i32,
    cols: i32,
    cell_size: i32,
    cells: &[CellEntry],
) -> Result<DesignRow, DesignError> {
    check_dimensions(rows, cols, cell_size)?;
    #[allow(clippy::cast_sign_loss)]
    let grid = StaggerGrid::new(rows as u32, cols as u32, f64::from(cell_size));
    let entries = clipped_entries(cells, &grid);

    let (id, created_at, updated_at): (Uuid, OffsetDateTime, OffsetDateTime) = sqlx::query_as(
        "INSERT INTO bitmap_designs (user_id, name, rows, cols, cell_size, cells)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING id, created_at, updated_at",
    )
    .bind(user_id)
    .bind(name)
    .bind(rows)
    .bind(cols)
    .bind(cell_size)
    .bind(encode_cells(&entries))
    .fetch_one(pool)
    .await?;

    Ok(DesignRow {
        id,
        name: name.to_owned(),
        rows,
        cols,
        cell_size,
        cells: entries,
        created_at,
        updated_at,
    })
}

/// List the user's designs, most recently updated first.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_designs(pool: &PgPool, user_id: Uuid) -> Result<Vec<DesignRow>, DesignError> {
    let rows = sqlx::query_as::<
        _,
        (Uuid, String, i32, i32, i32, serde_json::Value, OffsetDateTime, OffsetDateTime),
    >(
        "SELECT id, name, rows, cols, cell_size, cells, created_at, updated_at
         FROM bitmap_designs
         WHERE user_id = $1
         ORDER BY updated_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let mut designs = Vec::with_capacity(rows.len());
    for (id, name, row_count, cols, cell_size, cells, created_at, updated_at) in rows {
        designs.push(DesignRow {
            id,
            name,
            rows: row_count,
            cols,
            cell_size,
            cells: decode_cells(&cells)?,
            created_at,
            updated_at,
        });
    }
    Ok(designs)
}

/// Fetch a single design the user owns.
///
/// # Errors
///
/// Returns [`DesignError::NotFound`] when missing or owned by someone else.
pub async fn get_design(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<DesignRow, DesignError> {
    let row = sqlx::query_as::<
        _,
        (Uuid, String, i32, i32, i32, serde_json::Value, OffsetDateTime, OffsetDateTime),
    >(
        "SELECT id, name, rows, cols, cell_size, cells, created_at, updated_at
         FROM bitmap_designs
         WHERE id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or(DesignError::NotFound(id))?;

    let (id, name, row_count, cols, cell_size, cells, created_at, updated_at) = row;
    Ok(DesignRow {
        id,
        name,
        rows: row_count,
        cols,
        cell_size,
        cells: decode_cells(&cells)?,
        created_at,
        updated_at,
    })
}

/// Replace a design's contents.
///
/// # Errors
///
/// Returns [`DesignError::NotFound`] when the row does not exist,
/// [`DesignError::InvalidDimensions`] for non-positive dimensions, or a
/// database error if the write fails.
pub async fn update_design(
    pool: &PgPool,
    user_id: Uuid,
    id: Uuid,
    name: &str,
    rows: i32,
    cols: i32,
    cell_size: i32,
    cells: &[CellEntry],
) -> Result<(), DesignError> {
    check_dimensions(rows, cols, cell_size)?;
    #[allow(clippy::cast_sign_loss)]
    let grid = StaggerGrid::new(rows as u32, cols as u32, f64::from(cell_size));
    let entries = clipped_entries(cells, &grid);

    let result = sqlx::query(
        "UPDATE bitmap_designs
         SET name = $3, rows = $4, cols = $5, cell_size = $6, cells = $7, updated_at = now()
         WHERE id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(user_id)
    .bind(name)
    .bind(rows)
    .bind(cols)
    .bind(cell_size)
    .bind(encode_cells(&entries))
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DesignError::NotFound(id));
    }
    Ok(())
}

/// Delete a design the user owns.
///
/// # Errors
///
/// Returns [`DesignError::NotFound`] when missing or owned by someone else.
pub async fn delete_design(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), DesignError> {
    let result = sqlx::query("DELETE FROM bitmap_designs WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DesignError::NotFound(id));
    }
    Ok(())
}

/// Pure half of the paint operation: resolve a pointer point against the
/// grid and apply the stroke to the cell map.
pub(crate) fn apply_stroke(
    grid: &StaggerGrid,
    cells: &mut CellMap,
    x: f64,
    y: f64,
    color: &str,
    erase: bool,
) -> PaintOutcome {
    let Some((row, col)) = grid.cell_at(x, y) else {
        return PaintOutcome { cell: None, changed: false };
    };

    let changed = if erase {
        cells.erase(row, col)
    } else {
        let already = cells.color_at(row, col) == Some(color);
        cells.paint(row, col, color);
        !already
    };

    PaintOutcome { cell: Some((row, col)), changed }
}

/// Paint or erase one pointer point on a stored design.
///
/// The zoom the client rendered at must be passed so pointer coordinates
/// resolve against the same geometry the user saw.
///
/// # Errors
///
/// Returns [`DesignError::NotFound`] when the design is missing, or a
/// database error if the write fails.
pub async fn paint_design(
    pool: &PgPool,
    user_id: Uuid,
    id: Uuid,
    x: f64,
    y: f64,
    zoom: f64,
    color: &str,
    erase: bool,
) -> Result<PaintOutcome, DesignError> {
    let design = get_design(pool, user_id, id).await?;
    let grid = design.grid().with_zoom(zoom);
    let mut cells = CellMap::from_entries(&design.cells);

    let outcome = apply_stroke(&grid, &mut cells, x, y, color, erase);
    if !outcome.changed {
        return Ok(outcome);
    }

    sqlx::query("UPDATE bitmap_designs SET cells = $3, updated_at = now() WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .bind(encode_cells(&cells.to_entries()))
        .execute(pool)
        .await?;

    Ok(outcome)
}
