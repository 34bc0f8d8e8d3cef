//! Raster rendering of a design to an RGBA buffer.
//!
//! DESIGN
//! ======
//! Draw order is background, outer border, then each visible cell (fill,
//! optional grid stroke, optional pin marks). Cells use the same rectangle
//! rule as hit-testing, so a rendered cell and its pointer target always
//! agree. Pin marks are two small circles near the top corners of a cell.

#[cfg(test)]
#[path = "raster_test.rs"]
mod tests;

use image::{Rgba, RgbaImage};

use crate::grid::cells::CellMap;
use crate::grid::geometry::StaggerGrid;

/// Canvas background and unset-cell fill.
pub const BACKGROUND: &str = "#1a1a2e";
/// Outer border color.
pub const BORDER: &str = "#3b82f6";
/// Grid stroke color.
pub const GRID_LINE: &str = "#ef4444";

const BORDER_WIDTH: u32 = 3;
const PIN_RADIUS_FACTOR: f64 = 0.08;
const PIN_OFFSET_FACTOR: f64 = 0.15;

/// Toggleable overlays, mirroring the editor's view settings.
#[derive(Debug, Clone, Copy)]
pub struct RasterStyle {
    pub show_grid: bool,
    pub show_pins: bool,
}

impl Default for RasterStyle {
    fn default() -> Self {
        Self { show_grid: true, show_pins: true }
    }
}

/// Parse a `#rrggbb` color. Anything else falls back to the background.
#[must_use]
pub fn parse_color(color: &str) -> Rgba<u8> {
    parse_hex(color).unwrap_or_else(|| parse_hex(BACKGROUND).unwrap_or(Rgba([0, 0, 0, 255])))
}

fn parse_hex(color: &str) -> Option<Rgba<u8>> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let value = u32::from_str_radix(hex, 16).ok()?;
    #[allow(clippy::cast_possible_truncation)]
    Some(Rgba([(value >> 16) as u8, (value >> 8) as u8, value as u8, 255]))
}

/// Render the full canvas for a grid and its painted cells.
#[must_use]
pub fn render(grid: &StaggerGrid, cells: &CellMap, style: RasterStyle) -> RgbaImage {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let width = grid.width().round().max(1.0) as u32;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let height = grid.height().round().max(1.0) as u32;

    let background = parse_color(BACKGROUND);
    let mut image = RgbaImage::from_pixel(width, height, background);

    stroke_rect(&mut image, 0.0, 0.0, f64::from(width), f64::from(height), BORDER_WIDTH, parse_color(BORDER));

    let size = grid.effective_size();
    let pin_radius = size * PIN_RADIUS_FACTOR;
    let pin_offset = size * PIN_OFFSET_FACTOR;

    for row in 0..grid.rows {
        for col in 0..grid.cols_for_row(row) {
            let rect = grid.cell_rect(row, col);
            let fill = cells.color_at(row, col).map_or(background, parse_color);
            fill_rect(&mut image, rect.x, rect.y, rect.size, rect.size, fill);

            if style.show_grid {
                stroke_rect(&mut image, rect.x, rect.y, rect.size, rect.size, 1, parse_color(GRID_LINE));
            }

            if style.show_pins {
                let white = Rgba([255, 255, 255, 255]);
                let black = Rgba([0, 0, 0, 255]);
                fill_circle(&mut image, rect.x + pin_offset, rect.y + pin_offset, pin_radius, white, black);
                fill_circle(&mut image, rect.x + rect.size - pin_offset, rect.y + pin_offset, pin_radius, white, black);
            }
        }
    }

    image
}

fn put_pixel_clipped(image: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>) {
    if x >= 0 && y >= 0 && x < i64::from(image.width()) && y < i64::from(image.height()) {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        image.put_pixel(x as u32, y as u32, color);
    }
}

#[allow(clippy::cast_possible_truncation)]
fn fill_rect(image: &mut RgbaImage, x: f64, y: f64, w: f64, h: f64, color: Rgba<u8>) {
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let x1 = (x + w).ceil() as i64;
    let y1 = (y + h).ceil() as i64;
    for py in y0..y1 {
        for px in x0..x1 {
            put_pixel_clipped(image, px, py, color);
        }
    }
}

fn stroke_rect(image: &mut RgbaImage, x: f64, y: f64, w: f64, h: f64, thickness: u32, color: Rgba<u8>) {
    let t = f64::from(thickness);
    fill_rect(image, x, y, w, t, color);
    fill_rect(image, x, y + h - t, w, t, color);
    fill_rect(image, x, y, t, h, color);
    fill_rect(image, x + w - t, y, t, h, color);
}

#[allow(clippy::cast_possible_truncation)]
fn fill_circle(image: &mut RgbaImage, cx: f64, cy: f64, radius: f64, fill: Rgba<u8>, stroke: Rgba<u8>) {
    if radius <= 0.0 {
        return;
    }
    let x0 = (cx - radius - 1.0).floor() as i64;
    let y0 = (cy - radius - 1.0).floor() as i64;
    let x1 = (cx + radius + 1.0).ceil() as i64;
    let y1 = (cy + radius + 1.0).ceil() as i64;

    for py in y0..y1 {
        for px in x0..x1 {
            #[allow(clippy::cast_precision_loss)]
            let dist = ((px as f64 + 0.5 - cx).powi(2) + (py as f64 + 0.5 - cy).powi(2)).sqrt();
            if dist <= radius - 1.0 {
                put_pixel_clipped(image, px, py, fill);
            } else if dist <= radius {
                put_pixel_clipped(image, px, py, stroke);
            }
        }
    }
}
