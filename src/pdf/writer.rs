use std::io::Write;

use flate2::Compression;
use flate2::write::ZlibEncoder;
use lopdf::{Document, Object, ObjectId, Stream, dictionary};

use crate::error::{ImageKbError, Result};

/// Builds a fresh document out of JPEG-filled pages. Used by the PDF
/// recompression pipeline (full-bleed pages at the source page size) and by
/// image-to-PDF conversion (aspect-fit placement on A4).
pub struct PdfPageWriter {
    doc: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
}

impl PdfPageWriter {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            page_ids: Vec::new(),
        }
    }

    /// JPEG image XObject (DCTDecode, 8-bit RGB).
    fn add_jpeg_xobject(&mut self, jpeg_data: &[u8], width: u32, height: u32) -> ObjectId {
        let dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(width),
            "Height" => i64::from(height),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "DCTDecode",
        };
        let stream = Stream::new(dict, jpeg_data.to_vec());
        self.doc.add_object(Object::Stream(stream))
    }

    /// Content stream placing `/Im0` into an `w x h` point rectangle at
    /// `(x, y)` (origin bottom-left).
    pub fn build_draw_content(x: f64, y: f64, w: f64, h: f64) -> Vec<u8> {
        format!("q {w:.2} 0 0 {h:.2} {x:.2} {y:.2} cm /Im0 Do Q").into_bytes()
    }

    /// Add a `page_w_pts x page_h_pts` page showing a single JPEG drawn into
    /// `rect` (`(x, y, w, h)` in points). The pixel dimensions only size the
    /// XObject; the page keeps its point dimensions regardless of render
    /// density.
    pub fn add_image_page(
        &mut self,
        jpeg_data: &[u8],
        px_width: u32,
        px_height: u32,
        page_w_pts: f64,
        page_h_pts: f64,
        rect: (f64, f64, f64, f64),
    ) -> ObjectId {
        let image_id = self.add_jpeg_xobject(jpeg_data, px_width, px_height);

        let mut xobjects = lopdf::Dictionary::new();
        xobjects.set("Im0", Object::Reference(image_id));
        let resources_id = self.doc.add_object(dictionary! {
            "XObject" => Object::Dictionary(xobjects),
        });

        let (x, y, w, h) = rect;
        let content = Stream::new(dictionary! {}, Self::build_draw_content(x, y, w, h));
        let content_id = self.doc.add_object(Object::Stream(content));

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![
                Object::Real(0.0),
                Object::Real(0.0),
                Object::Real(page_w_pts as f32),
                Object::Real(page_h_pts as f32),
            ],
            "Resources" => resources_id,
            "Contents" => content_id,
        });
        self.page_ids.push(page_id);
        page_id
    }

    /// Add a page filled edge-to-edge by its JPEG.
    pub fn add_full_page(
        &mut self,
        jpeg_data: &[u8],
        px_width: u32,
        px_height: u32,
        page_w_pts: f64,
        page_h_pts: f64,
    ) -> ObjectId {
        self.add_image_page(
            jpeg_data,
            px_width,
            px_height,
            page_w_pts,
            page_h_pts,
            (0.0, 0.0, page_w_pts, page_h_pts),
        )
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Assemble the page tree and catalog, then compact uncompressed
    /// streams with FlateDecode.
    pub fn finalize(&mut self) {
        let kids: Vec<Object> = self.page_ids.iter().map(|&id| id.into()).collect();
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => self.page_ids.len() as i64,
        };
        self.doc
            .objects
            .insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        self.compress_streams();
    }

    /// FlateDecode any stream that has no filter yet (content streams;
    /// image XObjects already carry DCTDecode and are skipped).
    fn compress_streams(&mut self) {
        let ids: Vec<ObjectId> = self.doc.objects.keys().copied().collect();
        for id in ids {
            let needs_compression = match self.doc.objects.get(&id) {
                Some(Object::Stream(stream)) => stream.dict.get(b"Filter").is_err(),
                _ => false,
            };
            if !needs_compression {
                continue;
            }
            let Some(Object::Stream(stream)) = self.doc.objects.get_mut(&id) else {
                continue;
            };

            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
            if encoder.write_all(&stream.content).is_err() {
                continue;
            }
            let Ok(compressed) = encoder.finish() else {
                continue;
            };
            if compressed.len() < stream.content.len() {
                stream.dict.set("Filter", Object::Name(b"FlateDecode".to_vec()));
                stream.set_content(compressed);
            }
        }
    }

    pub fn save_to_bytes(&mut self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.doc
            .save_to(&mut buf)
            .map_err(|e| ImageKbError::pdf_write(e.to_string()))?;
        Ok(buf)
    }
}

impl Default for PdfPageWriter {
    fn default() -> Self {
        Self::new()
    }
}
