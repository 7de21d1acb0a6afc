use crate::error::Result;
use crate::raster::{Canvas, OutputFormat, decode, encode};

/// Re-encode an image in another format at its native size. One encode,
/// no size search.
pub fn convert(data: &[u8], format: OutputFormat, quality: u8) -> Result<Vec<u8>> {
    let img = decode(data)?.to_rgba8();
    let (w, h) = img.dimensions();

    let mut canvas = Canvas::new(w, h);
    if format == OutputFormat::Jpeg {
        canvas.fill_white();
    }
    canvas.draw_full(&img)?;
    encode(&canvas, format, quality)
}
