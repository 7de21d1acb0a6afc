use serde::Deserialize;
use tracing::debug;

use crate::error::{ImageKbError, Result};
use crate::pdf::writer::PdfPageWriter;
use crate::raster::{Canvas, OutputFormat, decode, encode};

/// A4 page size in points.
const A4_WIDTH_PTS: f64 = 595.276;
const A4_HEIGHT_PTS: f64 = 841.89;
/// 10 mm page margin in points.
const MARGIN_PTS: f64 = 28.346;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    fn page_size(self) -> (f64, f64) {
        match self {
            Orientation::Portrait => (A4_WIDTH_PTS, A4_HEIGHT_PTS),
            Orientation::Landscape => (A4_HEIGHT_PTS, A4_WIDTH_PTS),
        }
    }
}

/// Aspect-fit an `img_w x img_h` image inside the page margin frame,
/// centered on the free axis. Returns `(x, y, w, h)` in points with the
/// origin at the bottom-left (the placement is vertically symmetric, so the
/// values hold for either origin convention).
pub fn fit_on_page(img_w: u32, img_h: u32, page_w: f64, page_h: f64, margin: f64) -> (f64, f64, f64, f64) {
    let img_ratio = f64::from(img_w) / f64::from(img_h);
    let page_ratio = page_w / page_h;
    if img_ratio > page_ratio {
        let w = page_w - 2.0 * margin;
        let h = w / img_ratio;
        (margin, (page_h - h) / 2.0, w, h)
    } else {
        let h = page_h - 2.0 * margin;
        let w = h * img_ratio;
        ((page_w - w) / 2.0, margin, w, h)
    }
}

/// Combine one or more images into a single A4 PDF, one page per image,
/// each aspect-fit inside a 10 mm margin.
pub fn images_to_pdf(images: &[Vec<u8>], orientation: Orientation, quality: u8) -> Result<Vec<u8>> {
    if images.is_empty() {
        return Err(ImageKbError::invalid_parameter(
            "at least one input image is required",
        ));
    }
    let (page_w, page_h) = orientation.page_size();

    let mut writer = PdfPageWriter::new();
    for (i, data) in images.iter().enumerate() {
        let img = decode(data)?.to_rgba8();
        let (px_w, px_h) = img.dimensions();

        let mut canvas = Canvas::new(px_w, px_h);
        canvas.fill_white();
        canvas.draw_full(&img)?;
        let jpeg = encode(&canvas, OutputFormat::Jpeg, quality)?;

        let rect = fit_on_page(px_w, px_h, page_w, page_h, MARGIN_PTS);
        writer.add_image_page(&jpeg, px_w, px_h, page_w, page_h, rect);
        debug!(page = i + 1, px_w, px_h, "placed image on page");
    }

    writer.finalize();
    writer.save_to_bytes()
}
