//! Resolution-metadata patching on already-encoded images. Operates on the
//! container bytes only; pixel data is never re-encoded.

pub mod jpeg;
pub mod png;

use crate::error::{ImageKbError, Result};
use crate::raster::decode::SourceFormat;

/// Rewrite the resolution metadata of an encoded JPEG or PNG to `dpi`.
///
/// Returns a new byte buffer; the input is never mutated. Any other
/// container is rejected before a single byte is written.
pub fn set_dpi(data: &[u8], dpi: f64) -> Result<Vec<u8>> {
    if !dpi.is_finite() || dpi <= 0.0 {
        return Err(ImageKbError::invalid_parameter(format!(
            "DPI must be a positive number, got {dpi}"
        )));
    }

    match SourceFormat::sniff(data) {
        Some(SourceFormat::Jpeg) => jpeg::set_jpeg_dpi(data, dpi),
        Some(SourceFormat::Png) => png::set_png_dpi(data, dpi),
        Some(other) => Err(ImageKbError::unsupported_container(format!(
            "DPI metadata can only be patched in JPEG or PNG, got {}",
            other.mime()
        ))),
        None => Err(ImageKbError::unsupported_container(
            "unrecognized container; DPI metadata can only be patched in JPEG or PNG",
        )),
    }
}
