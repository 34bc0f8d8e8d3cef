//! Staggered-grid addressing and hit-testing.
//!
//! DESIGN
//! ======
//! Even rows hold `cols` cells; odd rows are shifted right by half a cell and
//! hold `cols - 1`, so every row spans the same pixel width. Hit-testing
//! floor-divides into a candidate cell and then re-checks the exact cell
//! rectangle, which rejects the half-cell dead-zones at both ends of a
//! staggered row.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod tests;

/// Grid parameters. `zoom` scales the rendered cell size without changing
/// the logical layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaggerGrid {
    pub rows: u32,
    pub cols: u32,
    pub cell_size: f64,
    pub zoom: f64,
}

/// Axis-aligned pixel rectangle of a single cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellRect {
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

impl CellRect {
    /// Center point of the rectangle.
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.size / 2.0, self.y + self.size / 2.0)
    }

    /// Whether a point falls inside the rectangle (half-open on both axes).
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.size && y >= self.y && y < self.y + self.size
    }
}

impl StaggerGrid {
    #[must_use]
    pub fn new(rows: u32, cols: u32, cell_size: f64) -> Self {
        Self { rows, cols, cell_size, zoom: 1.0 }
    }

    #[must_use]
    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = zoom;
        self
    }

    /// Rendered cell size in pixels.
    #[must_use]
    pub fn effective_size(&self) -> f64 {
        self.cell_size * self.zoom
    }

    /// Number of cells in a row: odd rows carry one fewer.
    #[must_use]
    pub fn cols_for_row(&self, row: u32) -> u32 {
        if row % 2 == 1 { self.cols.saturating_sub(1) } else { self.cols }
    }

    /// Horizontal shift applied to a row (half a cell on odd rows).
    #[must_use]
    pub fn row_offset(&self, row: u32) -> f64 {
        if row % 2 == 1 { self.effective_size() * 0.5 } else { 0.0 }
    }

    /// Full canvas width. Staggered rows fit within the even-row width.
    #[must_use]
    pub fn width(&self) -> f64 {
        f64::from(self.cols) * self.effective_size()
    }

    /// Full canvas height.
    #[must_use]
    pub fn height(&self) -> f64 {
        f64::from(self.rows) * self.effective_size()
    }

    /// Pixel rectangle covered by a cell. Does not bounds-check `(row, col)`.
    #[must_use]
    pub fn cell_rect(&self, row: u32, col: u32) -> CellRect {
        let size = self.effective_size();
        CellRect {
            x: f64::from(col) * size + self.row_offset(row),
            y: f64::from(row) * size,
            size,
        }
    }

    /// Resolve the cell covering a pixel point, or `None` for out-of-bounds
    /// points and the dead-zones of staggered rows.
    #[must_use]
    pub fn cell_at(&self, x: f64, y: f64) -> Option<(u32, u32)> {
        let size = self.effective_size();
        if size <= 0.0 {
            return None;
        }

        let row = (y / size).floor();
        if row < 0.0 || row >= f64::from(self.rows) {
            return None;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let row = row as u32;

        let col = ((x - self.row_offset(row)) / size).floor();
        if col < 0.0 || col >= f64::from(self.cols_for_row(row)) {
            return None;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let col = col as u32;

        // Exact-bounds re-check keeps this the strict inverse of cell_rect
        // even at boundary values where floor rounding disagrees.
        if self.cell_rect(row, col).contains(x, y) {
            Some((row, col))
        } else {
            None
        }
    }
}
