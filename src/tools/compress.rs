use tracing::debug;

use crate::error::{ImageKbError, Result};
use crate::raster::{Canvas, OutputFormat, decode, encode};

/// Outcome of a size-targeting compression run.
///
/// `met_target` is false when the search exhausted both knobs; the bytes are
/// then the smallest attempt rather than a failure. Callers that need a hard
/// guarantee must check the flag.
pub struct Compressed {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
    /// Quality percentage of the returned encoding.
    pub quality: u8,
    /// Dimension scale factor of the returned encoding.
    pub scale: f64,
    pub met_target: bool,
}

const INITIAL_QUALITY: u8 = 92;
const QUALITY_STEP: u8 = 5;
const QUALITY_KNOB_FLOOR: u8 = 10;
const QUALITY_EXIT_FLOOR: u8 = 5;
const SCALE_STEP: f64 = 0.05;
const SCALE_EXIT_FLOOR: f64 = 0.10;

/// Compress an image under a byte-size ceiling.
///
/// Two decreasing knobs, quality first: quality drops are visually cheaper
/// than losing resolution, so dimensions are only sacrificed once quality
/// has bottomed out. The first encoding at or under the target wins; the
/// search does not hunt for a tighter fit.
pub fn compress_to_target(data: &[u8], target_kb: u32, format: OutputFormat) -> Result<Compressed> {
    if target_kb == 0 {
        return Err(ImageKbError::invalid_parameter(
            "target size must be a positive number of kilobytes",
        ));
    }
    if format == OutputFormat::Png {
        return Err(ImageKbError::invalid_parameter(
            "size-targeted compression outputs jpeg or webp, not png",
        ));
    }

    let img = decode(data)?.to_rgba8();
    let (src_w, src_h) = img.dimensions();
    let target_bytes = u64::from(target_kb) * 1024;

    let mut quality = INITIAL_QUALITY;
    let mut scale = 1.0_f64;

    loop {
        let out_w = ((f64::from(src_w) * scale).round() as u32).max(1);
        let out_h = ((f64::from(src_h) * scale).round() as u32).max(1);

        let mut canvas = Canvas::new(out_w, out_h);
        if format == OutputFormat::Jpeg {
            canvas.fill_white();
        }
        canvas.draw_full(&img)?;
        let bytes = encode(&canvas, format, quality)?;
        debug!(quality, scale, size = bytes.len(), target = target_bytes, "compression attempt");

        if bytes.len() as u64 <= target_bytes {
            return Ok(Compressed {
                bytes,
                format,
                quality,
                scale,
                met_target: true,
            });
        }

        let (attempt_quality, attempt_scale) = (quality, scale);
        if quality > QUALITY_KNOB_FLOOR {
            quality -= QUALITY_STEP;
        } else {
            scale -= SCALE_STEP;
        }
        if quality <= QUALITY_EXIT_FLOOR || scale <= SCALE_EXIT_FLOOR {
            // Both knobs exhausted: hand back the smallest attempt rather
            // than failing.
            return Ok(Compressed {
                bytes,
                format,
                quality: attempt_quality,
                scale: attempt_scale,
                met_target: false,
            });
        }
    }
}
