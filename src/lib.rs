//! Image/document transformation engine: format conversion, size-targeted
//! compression, geometric transforms, DPI metadata patching, and PDF page
//! recompression. The binary drives it from YAML job files.

pub mod config;
pub mod dpi;
pub mod error;
pub mod geometry;
pub mod pdf;
pub mod pipeline;
pub mod raster;
#[cfg(feature = "render")]
pub mod render;
pub mod tools;
