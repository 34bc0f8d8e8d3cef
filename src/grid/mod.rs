//! Staggered-grid bitmap model.
//!
//! ARCHITECTURE
//! ============
//! Pure library code, no I/O. `geometry` maps pixel coordinates onto the
//! brick-pattern grid, `cells` holds the sparse color map, `raster` renders
//! both to an RGBA buffer, and `export` turns that buffer into a JPEG
//! download. The design service and routes layer on top.

pub mod cells;
pub mod export;
pub mod geometry;
pub mod raster;

pub use cells::{CellEntry, CellMap};
pub use geometry::StaggerGrid;
