//! JPEG export of a rendered design.

#[cfg(test)]
#[path = "export_test.rs"]
mod tests;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbaImage};

/// Fixed export quality, matching the editor's 0.95 download quality.
pub const JPEG_QUALITY: u8 = 95;

const FALLBACK_STEM: &str = "untitled";

/// Encode a rendered canvas as JPEG. Alpha is flattened since JPEG has none.
///
/// # Errors
///
/// Returns an error if JPEG encoding fails.
pub fn encode_jpeg(image: &RgbaImage) -> Result<Vec<u8>, image::ImageError> {
    let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY).encode_image(&rgb)?;
    Ok(buf)
}

/// Download filename for a design: every non-alphanumeric character becomes
/// `_`, with a `.jpg` suffix. A blank name falls back to `untitled.jpg`.
#[must_use]
pub fn export_filename(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if stem.is_empty() {
        return format!("{FALLBACK_STEM}.jpg");
    }
    format!("{stem}.jpg")
}
