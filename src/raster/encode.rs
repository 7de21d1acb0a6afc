use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ImageEncoder};
use serde::Deserialize;

use crate::error::{ImageKbError, Result};
use crate::raster::canvas::Canvas;

/// Output encoding for a pixel surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Png,
    Jpeg,
    Webp,
}

impl OutputFormat {
    pub fn mime(self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Webp => "image/webp",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Webp => "webp",
        }
    }
}

/// Serialize a surface into a compressed byte buffer.
///
/// `quality` is a percentage (1-100). PNG ignores it (lossless); JPEG drops
/// the alpha channel, which is why JPEG-bound surfaces get a white fill
/// before drawing.
pub fn encode(canvas: &Canvas, format: OutputFormat, quality: u8) -> Result<Vec<u8>> {
    if !(1..=100).contains(&quality) {
        return Err(ImageKbError::invalid_parameter(format!(
            "quality must be 1-100, got {quality}"
        )));
    }

    let out = match format {
        OutputFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgba8(canvas.pixels().clone()).to_rgb8();
            let mut buf = Cursor::new(Vec::new());
            let encoder = JpegEncoder::new_with_quality(&mut buf, quality);
            rgb.write_with_encoder(encoder)
                .map_err(|e| ImageKbError::encode(e.to_string()))?;
            buf.into_inner()
        }
        OutputFormat::Png => {
            let pixels = canvas.pixels();
            let mut buf = Vec::new();
            PngEncoder::new(&mut buf)
                .write_image(
                    pixels.as_raw(),
                    pixels.width(),
                    pixels.height(),
                    image::ExtendedColorType::Rgba8,
                )
                .map_err(|e| ImageKbError::encode(e.to_string()))?;
            buf
        }
        OutputFormat::Webp => {
            let pixels = canvas.pixels();
            let encoder = webp::Encoder::from_rgba(pixels.as_raw(), pixels.width(), pixels.height());
            encoder.encode(f32::from(quality)).to_vec()
        }
    };

    if out.is_empty() {
        return Err(ImageKbError::encode("encoder produced no output"));
    }
    Ok(out)
}
