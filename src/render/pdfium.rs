//! pdfium-render wrapper: PDF page -> DynamicImage, in memory only.

use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::PathBuf;

use crate::error::{ImageKbError, Result};

/// Resolves the path to the pdfium shared library.
///
/// Search order:
/// 1. `PDFIUM_DYNAMIC_LIB_PATH` environment variable
/// 2. `vendor/pdfium/lib/` relative to the project root (for development)
fn resolve_pdfium_lib_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("PDFIUM_DYNAMIC_LIB_PATH") {
        let p = PathBuf::from(&path);
        if p.exists() {
            return Ok(p);
        }
        return Err(ImageKbError::render(format!(
            "PDFIUM_DYNAMIC_LIB_PATH is set to '{path}' but the path does not exist"
        )));
    }

    if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
        let vendor_path = PathBuf::from(&manifest_dir).join("vendor/pdfium/lib");
        if vendor_path.exists() {
            return Ok(vendor_path);
        }
    }

    Err(ImageKbError::render(
        "pdfium library not found: set PDFIUM_DYNAMIC_LIB_PATH or place libpdfium.so in vendor/pdfium/lib/",
    ))
}

/// Creates a new Pdfium instance by dynamically loading the shared library.
pub fn create_pdfium() -> Result<Pdfium> {
    let lib_path = resolve_pdfium_lib_path()?;
    let lib_path_str = lib_path
        .to_str()
        .ok_or_else(|| ImageKbError::render("pdfium library path contains non-UTF-8 characters"))?;
    let bindings =
        Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(lib_path_str))
            .map_err(|e| ImageKbError::render(e.to_string()))?;
    Ok(Pdfium::new(bindings))
}

/// Renders a page at `scale` pixels per point and returns a DynamicImage.
///
/// A scale of 1.0 maps one point to one pixel (72 DPI); the recompression
/// pipeline picks the scale from its quality setting.
pub fn render_page(page: &PdfPage, scale: f64) -> Result<DynamicImage> {
    let width_pts = f64::from(page.width().value);
    let height_pts = f64::from(page.height().value);
    let width_px = (width_pts * scale).round().max(1.0) as i32;
    let height_px = (height_pts * scale).round().max(1.0) as i32;

    let config = PdfRenderConfig::new()
        .set_target_width(width_px)
        .set_target_height(height_px);

    let bitmap = page
        .render_with_config(&config)
        .map_err(|e| ImageKbError::render(e.to_string()))?;

    Ok(bitmap.as_image())
}
