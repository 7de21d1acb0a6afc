//! Pure geometry planning: target dimensions for resize, centered
//! aspect-locked crop windows, and physical-print-size pixel counts.
//! No I/O, no pixel access.

/// Integer pixel rectangle inside an image (origin top-left).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl CropRect {
    /// Rectangle covering a full `w x h` surface.
    pub fn full(w: u32, h: u32) -> Self {
        CropRect { x: 0, y: 0, w, h }
    }
}

/// Compute output dimensions for a resize.
///
/// With `maintain_aspect`, the source is scaled by
/// `min(target_w/src_w, target_h/src_h)` so it fits inside the target box;
/// the ratio may be fractional (and may upscale). Without it, the target
/// dimensions are used exactly and the image may distort.
/// Outputs are rounded and never below 1 pixel.
pub fn plan_resize(
    src_w: u32,
    src_h: u32,
    target_w: u32,
    target_h: u32,
    maintain_aspect: bool,
) -> (u32, u32) {
    if !maintain_aspect {
        return (target_w.max(1), target_h.max(1));
    }
    let ratio = (f64::from(target_w) / f64::from(src_w)).min(f64::from(target_h) / f64::from(src_h));
    let out_w = (f64::from(src_w) * ratio).round() as u32;
    let out_h = (f64::from(src_h) * ratio).round() as u32;
    (out_w.max(1), out_h.max(1))
}

/// Compute the largest centered crop window matching `target_w / target_h`.
///
/// A relatively-wider source keeps its full height and is trimmed
/// horizontally; a relatively-taller source keeps its full width and is
/// trimmed vertically. This is the framing behind passport photos.
pub fn plan_aspect_crop(src_w: u32, src_h: u32, target_w: u32, target_h: u32) -> CropRect {
    let target_ratio = f64::from(target_w) / f64::from(target_h);
    let src_ratio = f64::from(src_w) / f64::from(src_h);

    let (mut sx, mut sy) = (0.0_f64, 0.0_f64);
    let (mut sw, mut sh) = (f64::from(src_w), f64::from(src_h));
    if src_ratio > target_ratio {
        sw = f64::from(src_h) * target_ratio;
        sx = (f64::from(src_w) - sw) / 2.0;
    } else {
        sh = f64::from(src_w) / target_ratio;
        sy = (f64::from(src_h) - sh) / 2.0;
    }

    let w = (sw.round() as u32).clamp(1, src_w);
    let h = (sh.round() as u32).clamp(1, src_h);
    // Rounding may push the window one pixel past the edge; pull it back in.
    let x = (sx.round() as u32).min(src_w - w);
    let y = (sy.round() as u32).min(src_h - h);
    CropRect { x, y, w, h }
}

/// Convert a physical print size in inches to pixel dimensions at `dpi`.
///
/// Unit conversion (cm to inches, factor 2.54) happens before this call.
pub fn plan_physical_to_pixels(width_in: f64, height_in: f64, dpi: f64) -> (u32, u32) {
    let px_w = (width_in * dpi).round() as u32;
    let px_h = (height_in * dpi).round() as u32;
    (px_w.max(1), px_h.max(1))
}
