//! Sparse cell color map.
//!
//! DESIGN
//! ======
//! Most cells stay unset, so the map stores only painted cells keyed by
//! `(row, col)`. A `BTreeMap` keeps the serialized entry list in a stable
//! row-major order. Storage rows hold the same entries as JSONB.

#[cfg(test)]
#[path = "cells_test.rs"]
mod tests;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::grid::geometry::StaggerGrid;

/// One painted cell in the storage encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellEntry {
    pub row: u32,
    pub col: u32,
    pub color: String,
}

/// Sparse map of painted cells. Absence means background/unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellMap {
    cells: BTreeMap<(u32, u32), String>,
}

impl CellMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Stored color of a cell, if painted.
    #[must_use]
    pub fn color_at(&self, row: u32, col: u32) -> Option<&str> {
        self.cells.get(&(row, col)).map(String::as_str)
    }

    /// Paint a cell. Repainting with the same color is a no-op.
    pub fn paint(&mut self, row: u32, col: u32, color: &str) {
        self.cells.insert((row, col), color.to_owned());
    }

    /// Erase a cell. Returns whether anything was removed; erasing an
    /// absent cell is a no-op.
    pub fn erase(&mut self, row: u32, col: u32) -> bool {
        self.cells.remove(&(row, col)).is_some()
    }

    /// Drop every painted cell.
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Painted cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, &str)> {
        self.cells.iter().map(|(&(row, col), color)| (row, col, color.as_str()))
    }

    /// Encode to the ordered entry list stored in `bitmap_designs.cells`.
    #[must_use]
    pub fn to_entries(&self) -> Vec<CellEntry> {
        self.iter()
            .map(|(row, col, color)| CellEntry { row, col, color: color.to_owned() })
            .collect()
    }

    /// Decode from the storage entry list. Exact inverse of [`Self::to_entries`];
    /// duplicate `(row, col)` entries resolve to the last one.
    #[must_use]
    pub fn from_entries(entries: &[CellEntry]) -> Self {
        let mut map = Self::new();
        for entry in entries {
            map.paint(entry.row, entry.col, &entry.color);
        }
        map
    }

    /// Remove cells that fall outside the grid (e.g. after a resize).
    /// Returns how many were dropped.
    pub fn clip(&mut self, grid: &StaggerGrid) -> usize {
        let before = self.cells.len();
        self.cells.retain(|&(row, col), _| row < grid.rows && col < grid.cols_for_row(row));
        before - self.cells.len()
    }
}
