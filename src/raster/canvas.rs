use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::error::{ImageKbError, Result};
use crate::geometry::CropRect;

/// Off-screen RGBA drawing surface.
///
/// Owns its pixel buffer for the duration of one operation; the
/// `width * height * 4 == buffer length` invariant holds by construction.
/// A fresh surface is fully transparent.
pub struct Canvas {
    pixels: RgbaImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Canvas {
            pixels: RgbaImage::new(width.max(1), height.max(1)),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Flood the surface with opaque white.
    ///
    /// JPEG has no alpha channel; targets that end up JPEG-encoded are
    /// pre-filled so transparency composites onto white instead of black.
    pub fn fill_white(&mut self) {
        for px in self.pixels.pixels_mut() {
            *px = Rgba([255, 255, 255, 255]);
        }
    }

    /// Draw `src_rect` of `src` into `dst_rect`, alpha-blending over existing
    /// content. Scaling (Lanczos3) only happens when the two rectangles
    /// differ in size, so same-size draws are exact pixel extractions.
    pub fn draw(&mut self, src: &RgbaImage, src_rect: CropRect, dst_rect: CropRect) -> Result<()> {
        if src_rect.w == 0 || src_rect.h == 0 {
            return Err(ImageKbError::invalid_parameter("empty source rectangle"));
        }
        let (src_w, src_h) = src.dimensions();
        if u64::from(src_rect.x) + u64::from(src_rect.w) > u64::from(src_w)
            || u64::from(src_rect.y) + u64::from(src_rect.h) > u64::from(src_h)
        {
            return Err(ImageKbError::invalid_parameter(format!(
                "source rectangle {}x{}+{}+{} exceeds image bounds {}x{}",
                src_rect.w, src_rect.h, src_rect.x, src_rect.y, src_w, src_h
            )));
        }

        let cropped = imageops::crop_imm(src, src_rect.x, src_rect.y, src_rect.w, src_rect.h);
        if (src_rect.w, src_rect.h) == (dst_rect.w, dst_rect.h) {
            imageops::overlay(
                &mut self.pixels,
                &cropped.to_image(),
                i64::from(dst_rect.x),
                i64::from(dst_rect.y),
            );
        } else {
            let scaled = imageops::resize(
                &cropped.to_image(),
                dst_rect.w.max(1),
                dst_rect.h.max(1),
                FilterType::Lanczos3,
            );
            imageops::overlay(
                &mut self.pixels,
                &scaled,
                i64::from(dst_rect.x),
                i64::from(dst_rect.y),
            );
        }
        Ok(())
    }

    /// Draw the whole of `src` scaled to cover the whole surface.
    pub fn draw_full(&mut self, src: &RgbaImage) -> Result<()> {
        let (w, h) = src.dimensions();
        self.draw(
            src,
            CropRect::full(w, h),
            CropRect::full(self.width(), self.height()),
        )
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_pixels(self) -> RgbaImage {
        self.pixels
    }
}
