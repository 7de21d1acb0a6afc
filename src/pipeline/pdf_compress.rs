//! PDF recompression: render each page, JPEG-encode it, and rebuild a fresh
//! document around the JPEGs at the original page sizes.

use tracing::debug;

use crate::error::{ImageKbError, Result};
use crate::pdf::reader::PdfReader;
use crate::pdf::writer::PdfPageWriter;
use crate::raster::{Canvas, OutputFormat, encode};
use crate::render::pdfium;

/// Render scale for a quality percentage. Coarser quality settings also
/// render at lower pixel density, compounding the size reduction.
fn render_scale(quality: u8) -> f64 {
    match quality {
        ..=30 => 1.0,
        31..=50 => 1.2,
        51..=70 => 1.5,
        _ => 2.0,
    }
}

fn validate_quality(quality: u8) -> Result<()> {
    if !(10..=90).contains(&quality) || quality % 5 != 0 {
        return Err(ImageKbError::invalid_parameter(format!(
            "PDF quality must be 10-90 in steps of 5, got {quality}"
        )));
    }
    Ok(())
}

/// Recompress a PDF by rasterizing every page to JPEG at `quality`.
///
/// Pages are processed strictly in order; `progress` is invoked with the
/// 1-based page number and total before each page is rendered. Output pages
/// keep the source pages' point dimensions exactly, whatever the render
/// scale. When the rebuild is not smaller than the source, the result is
/// discarded and [`ImageKbError::NoImprovement`] is returned instead.
pub fn compress_pdf<F>(data: &[u8], quality: u8, mut progress: F) -> Result<Vec<u8>>
where
    F: FnMut(u32, u32),
{
    validate_quality(quality)?;
    let scale = render_scale(quality);

    // lopdf supplies the structure (page count, intrinsic dimensions);
    // pdfium supplies the pixels.
    let reader = PdfReader::from_bytes(data)?;
    let total_pages = reader.page_count();
    if total_pages == 0 {
        return Err(ImageKbError::pdf_read("document has no pages"));
    }

    let pdfium = pdfium::create_pdfium()?;
    let document = pdfium
        .load_pdf_from_byte_slice(data, None)
        .map_err(|e| ImageKbError::render(e.to_string()))?;

    let mut writer = PdfPageWriter::new();
    {
        let pages = document.pages();
        for (i, page) in pages.iter().enumerate() {
            let page_num = i as u32 + 1;
            progress(page_num, total_pages);

            let (width_pts, height_pts) = reader.page_dimensions(page_num)?;
            let bitmap = pdfium::render_page(&page, scale)?.to_rgba8();
            let (px_w, px_h) = bitmap.dimensions();

            // JPEG has no alpha; composite the render onto white.
            let mut canvas = Canvas::new(px_w, px_h);
            canvas.fill_white();
            canvas.draw_full(&bitmap)?;
            let jpeg = encode(&canvas, OutputFormat::Jpeg, quality)?;
            debug!(page_num, px_w, px_h, jpeg_bytes = jpeg.len(), "page re-encoded");

            writer.add_full_page(&jpeg, px_w, px_h, width_pts, height_pts);
        }
    }
    // Release the native parse handle before serializing; an early error
    // return drops it the same way.
    drop(document);

    writer.finalize();
    let rebuilt = writer.save_to_bytes()?;
    if rebuilt.len() >= data.len() {
        return Err(ImageKbError::NoImprovement {
            original: data.len(),
            rebuilt: rebuilt.len(),
        });
    }
    Ok(rebuilt)
}

#[cfg(test)]
mod tests {
    use super::{render_scale, validate_quality};

    #[test]
    fn scale_lookup_matches_quality_bands() {
        assert_eq!(render_scale(10), 1.0);
        assert_eq!(render_scale(30), 1.0);
        assert_eq!(render_scale(35), 1.2);
        assert_eq!(render_scale(50), 1.2);
        assert_eq!(render_scale(60), 1.5);
        assert_eq!(render_scale(70), 1.5);
        assert_eq!(render_scale(75), 2.0);
        assert_eq!(render_scale(90), 2.0);
    }

    #[test]
    fn quality_range_and_step_enforced() {
        assert!(validate_quality(60).is_ok());
        assert!(validate_quality(10).is_ok());
        assert!(validate_quality(90).is_ok());
        assert!(validate_quality(5).is_err());
        assert!(validate_quality(95).is_err());
        assert!(validate_quality(42).is_err());
    }
}
