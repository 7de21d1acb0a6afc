// PDF recompression pipeline tests.
//
// These need a pdfium shared library at runtime (PDFIUM_DYNAMIC_LIB_PATH or
// vendor/pdfium/lib/). When none is resolvable the tests skip themselves, so
// the rest of the suite stays green on machines without pdfium.
// Test PDFs are generated with lopdf / the image-to-pdf tool; no fixtures.
#![cfg(feature = "render")]

use imagekb::error::ImageKbError;
use imagekb::pdf::reader::PdfReader;
use imagekb::pipeline::pdf_compress::compress_pdf;
use imagekb::render::pdfium::create_pdfium;
use imagekb::tools::to_pdf::{self, Orientation};
use lopdf::{Document, Object, Stream, dictionary};

fn pdfium_available() -> bool {
    if create_pdfium().is_ok() {
        true
    } else {
        eprintln!("pdfium library not available; skipping");
        false
    }
}

/// Minimal blank PDF with `page_count` Letter-size pages.
fn blank_pdf(page_count: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.4");
    let pages_id = doc.new_object_id();

    let mut kids: Vec<Object> = Vec::new();
    for _ in 0..page_count {
        let content_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ],
            "Contents" => content_id,
            "Resources" => dictionary! {},
        });
        kids.push(page_id.into());
    }

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_count as i64,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("serialize blank PDF");
    buf
}

/// Image-heavy single-page PDF: deterministic noise compresses poorly, so
/// the source stays large enough for recompression to win.
fn noisy_pdf() -> Vec<u8> {
    let mut state: u32 = 0x9E37_79B9;
    let img = image::RgbaImage::from_fn(1000, 700, |_, _| {
        state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        let [r, g, b, _] = state.to_be_bytes();
        image::Rgba([r, g, b, 255])
    });
    let mut buf = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png).expect("png");
    to_pdf::images_to_pdf(&[buf.into_inner()], Orientation::Portrait, 92).expect("source pdf")
}

// ============================================================
// 1. Parameter validation (no pdfium needed: quality is checked first)
// ============================================================

#[test]
fn test_quality_out_of_range_rejected() {
    let pdf = blank_pdf(1);
    for quality in [0, 5, 95, 100] {
        let result = compress_pdf(&pdf, quality, |_, _| {});
        assert!(
            matches!(result, Err(ImageKbError::InvalidParameter(_))),
            "quality {quality} must be rejected"
        );
    }
}

#[test]
fn test_quality_off_step_rejected() {
    let pdf = blank_pdf(1);
    let result = compress_pdf(&pdf, 42, |_, _| {});
    assert!(matches!(result, Err(ImageKbError::InvalidParameter(_))));
}

// ============================================================
// 2. Progress order and the no-improvement guardrail
// ============================================================

#[test]
fn test_progress_reported_in_order_and_blank_source_is_no_improvement() {
    if !pdfium_available() {
        return;
    }
    let pdf = blank_pdf(3);

    let mut progress: Vec<(u32, u32)> = Vec::new();
    let result = compress_pdf(&pdf, 60, |page, total| progress.push((page, total)));

    assert_eq!(
        progress,
        vec![(1, 3), (2, 3), (3, 3)],
        "pages are strictly sequential, 1-based"
    );
    // A few hundred bytes of blank pages cannot shrink by being rasterized;
    // the pipeline must refuse to return the larger rebuild.
    match result {
        Err(ImageKbError::NoImprovement { original, rebuilt }) => {
            assert_eq!(original, pdf.len());
            assert!(rebuilt > original);
        }
        Err(other) => panic!("expected NoImprovement, got: {other}"),
        Ok(bytes) => panic!("expected NoImprovement, got {} bytes", bytes.len()),
    }
}

// ============================================================
// 3. Image-heavy sources shrink and keep their page geometry
// ============================================================

#[test]
fn test_noisy_source_shrinks_and_keeps_page_dimensions() {
    if !pdfium_available() {
        return;
    }
    let source = noisy_pdf();
    let src_reader = PdfReader::from_bytes(&source).expect("source parses");
    let (src_w, src_h) = src_reader.page_dimensions(1).expect("source dims");

    let rebuilt = compress_pdf(&source, 10, |_, _| {}).expect("recompression should win");

    assert!(
        rebuilt.len() < source.len(),
        "rebuilt {} bytes vs source {} bytes",
        rebuilt.len(),
        source.len()
    );

    let reader = PdfReader::from_bytes(&rebuilt).expect("rebuilt parses");
    assert_eq!(reader.page_count(), src_reader.page_count());
    let (w, h) = reader.page_dimensions(1).expect("rebuilt dims");
    assert!(
        (w - src_w).abs() < 0.01 && (h - src_h).abs() < 0.01,
        "point dimensions must survive recompression exactly"
    );
}
