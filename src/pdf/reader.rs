use std::path::Path;

use lopdf::Document;

use crate::error::{ImageKbError, Result};

/// Structural view of a source PDF: page count and intrinsic page
/// dimensions. Rendering is pdfium's job; this stays pure lopdf.
pub struct PdfReader {
    doc: Document,
}

impl PdfReader {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let doc = Document::load(path)?;
        Ok(Self { doc })
    }

    /// Parse a PDF held in memory.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let doc = Document::load_mem(data)?;
        Ok(Self { doc })
    }

    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// MediaBox of a page dictionary, following Parent inheritance.
    fn media_box(&self, dict: &lopdf::Dictionary) -> Result<lopdf::Object> {
        if let Ok(obj) = dict.get(b"MediaBox") {
            return Ok(obj.clone());
        }
        if let Ok(lopdf::Object::Reference(parent_id)) = dict.get(b"Parent") {
            let parent_dict = self.doc.get_dictionary(*parent_id)?;
            return self.media_box(parent_dict);
        }
        Err(ImageKbError::pdf_read("MediaBox not found"))
    }

    /// Intrinsic dimensions of page `page_num` (1-indexed) in points.
    pub fn page_dimensions(&self, page_num: u32) -> Result<(f64, f64)> {
        let page_id = self.page_id(page_num)?;
        let page_dict = self.doc.get_dictionary(page_id)?;
        let media_box = self.media_box(page_dict)?;

        let corners = media_box.as_array()?;
        if corners.len() < 4 {
            return Err(ImageKbError::pdf_read("invalid MediaBox"));
        }
        let to_f64 = |obj: &lopdf::Object| -> Result<f64> {
            match obj {
                lopdf::Object::Integer(i) => Ok(*i as f64),
                lopdf::Object::Real(f) => Ok(f64::from(*f)),
                _ => Err(ImageKbError::pdf_read("invalid MediaBox value")),
            }
        };
        let x0 = to_f64(&corners[0])?;
        let y0 = to_f64(&corners[1])?;
        let x1 = to_f64(&corners[2])?;
        let y1 = to_f64(&corners[3])?;

        let width = (x1 - x0).abs();
        let height = (y1 - y0).abs();
        if width <= 0.0 || height <= 0.0 {
            return Err(ImageKbError::pdf_read(
                "invalid MediaBox: non-positive page dimensions",
            ));
        }
        // Typical PDF implementation limit: 14,400 pt (200 in) per side.
        const PDF_MAX_DIMENSION_PT: f64 = 14_400.0;
        if width > PDF_MAX_DIMENSION_PT || height > PDF_MAX_DIMENSION_PT {
            return Err(ImageKbError::pdf_read(
                "invalid MediaBox: page dimensions exceed PDF limits",
            ));
        }
        Ok((width, height))
    }

    fn page_id(&self, page_num: u32) -> Result<lopdf::ObjectId> {
        self.doc
            .get_pages()
            .get(&page_num)
            .copied()
            .ok_or_else(|| ImageKbError::pdf_read(format!("page {page_num} not found")))
    }
}
