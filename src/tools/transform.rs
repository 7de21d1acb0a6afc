use serde::Deserialize;

use crate::dpi;
use crate::error::Result;
use crate::geometry::{self, CropRect};
use crate::raster::{Canvas, OutputFormat, SourceFormat, decode, encode};

/// Quality used when the tool has no quality knob of its own.
const DEFAULT_QUALITY: u8 = 92;
/// Passport crops always encode at fixed high quality.
const PASSPORT_QUALITY: u8 = 95;

/// Passport photo pixel presets carried over from the original tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PassportPreset {
    Us,
    Uk,
    India,
    Eu,
    China,
    Canada,
    Australia,
}

impl PassportPreset {
    /// Target dimensions in pixels (300 DPI print sizes).
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            // 2x2 inches
            PassportPreset::Us => (600, 600),
            // 35x45 mm
            PassportPreset::Uk | PassportPreset::India | PassportPreset::Eu
            | PassportPreset::Australia => (413, 531),
            // 33x48 mm
            PassportPreset::China => (390, 567),
            // 50x70 mm
            PassportPreset::Canada => (591, 827),
        }
    }
}

/// The output family a transformed image keeps: PNG sources stay PNG,
/// everything else becomes JPEG.
fn format_family(data: &[u8]) -> OutputFormat {
    match SourceFormat::sniff(data) {
        Some(SourceFormat::Png) => OutputFormat::Png,
        _ => OutputFormat::Jpeg,
    }
}

/// Resize an image, preserving its format family.
pub fn resize(data: &[u8], width: u32, height: u32, maintain_aspect: bool) -> Result<Vec<u8>> {
    let img = decode(data)?.to_rgba8();
    let (src_w, src_h) = img.dimensions();
    let (out_w, out_h) = geometry::plan_resize(src_w, src_h, width, height, maintain_aspect);

    let mut canvas = Canvas::new(out_w, out_h);
    canvas.draw_full(&img)?;
    encode(&canvas, format_family(data), DEFAULT_QUALITY)
}

/// Extract a rectangle without scaling, preserving the format family.
/// Rectangles outside the source bounds are rejected, not clamped.
pub fn crop(data: &[u8], rect: CropRect) -> Result<Vec<u8>> {
    let img = decode(data)?.to_rgba8();

    let mut canvas = Canvas::new(rect.w, rect.h);
    canvas.draw(&img, rect, CropRect::full(rect.w, rect.h))?;
    encode(&canvas, format_family(data), DEFAULT_QUALITY)
}

/// Center-crop to the target aspect ratio and scale onto a white
/// `target_w x target_h` JPEG surface. Always returns exactly the requested
/// pixel dimensions.
pub fn passport_crop(data: &[u8], target_w: u32, target_h: u32) -> Result<Vec<u8>> {
    let img = decode(data)?.to_rgba8();
    let (src_w, src_h) = img.dimensions();
    let window = geometry::plan_aspect_crop(src_w, src_h, target_w, target_h);

    let mut canvas = Canvas::new(target_w, target_h);
    canvas.fill_white();
    canvas.draw(&img, window, CropRect::full(target_w, target_h))?;
    encode(&canvas, OutputFormat::Jpeg, PASSPORT_QUALITY)
}

/// Resize to the pixel dimensions a physical print size requires at `dpi`,
/// then stamp that DPI into the resolution metadata. Dimensions are in
/// inches; cm conversion happens at the configuration layer.
pub fn change_dpi_resize(data: &[u8], width_in: f64, height_in: f64, dpi: f64) -> Result<Vec<u8>> {
    let (px_w, px_h) = geometry::plan_physical_to_pixels(width_in, height_in, dpi);
    let resized = resize(data, px_w, px_h, false)?;
    dpi::set_dpi(&resized, dpi)
}
