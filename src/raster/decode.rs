use image::DynamicImage;

use crate::error::{ImageKbError, Result};

/// Container format detected from magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Jpeg,
    Png,
    Webp,
    Pdf,
}

impl SourceFormat {
    /// Sniff the container from leading magic bytes.
    pub fn sniff(data: &[u8]) -> Option<SourceFormat> {
        if data.len() >= 3 && data[0..3] == [0xFF, 0xD8, 0xFF] {
            Some(SourceFormat::Jpeg)
        } else if data.len() >= 8 && data[0..8] == [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A] {
            Some(SourceFormat::Png)
        } else if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            Some(SourceFormat::Webp)
        } else if data.len() >= 5 && &data[0..5] == b"%PDF-" {
            Some(SourceFormat::Pdf)
        } else {
            None
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            SourceFormat::Jpeg => "image/jpeg",
            SourceFormat::Png => "image/png",
            SourceFormat::Webp => "image/webp",
            SourceFormat::Pdf => "application/pdf",
        }
    }
}

/// Decode an image byte buffer into an addressable pixel surface.
///
/// PDF bytes are rejected here; pages go through the render module instead.
pub fn decode(data: &[u8]) -> Result<DynamicImage> {
    match SourceFormat::sniff(data) {
        Some(SourceFormat::Pdf) => Err(ImageKbError::decode(
            "source is a PDF document, not an image",
        )),
        Some(_) => image::load_from_memory(data).map_err(|e| ImageKbError::decode(e.to_string())),
        None => Err(ImageKbError::decode("unrecognized image container")),
    }
}
