//! JFIF / EXIF density patching on encoded JPEG bytes.
//!
//! The density lives in the JFIF APP0 segment (synthesized right after SOI
//! when the file carries none) and, when an EXIF APP1 is present, in the
//! IFD0 XResolution/YResolution/ResolutionUnit tags as well.

use crate::error::{ImageKbError, Result};

const MARKER_APP0: u8 = 0xE0;
const MARKER_APP1: u8 = 0xE1;
const MARKER_SOS: u8 = 0xDA;
const MARKER_EOI: u8 = 0xD9;

/// Overwrite the resolution fields of a JPEG with `dpi`, units = dots/inch.
pub fn set_jpeg_dpi(data: &[u8], dpi: f64) -> Result<Vec<u8>> {
    if data.len() < 4 || data[0..2] != [0xFF, 0xD8] {
        return Err(ImageKbError::decode("missing JPEG SOI marker"));
    }
    let density = dpi.round().clamp(1.0, 65_535.0) as u16;

    let mut out = data.to_vec();
    let mut jfif_patched = false;

    // Walk the metadata segments up to SOS. Entropy-coded data follows SOS
    // and is left untouched.
    let mut pos = 2usize;
    while pos + 4 <= out.len() {
        if out[pos] != 0xFF {
            return Err(ImageKbError::decode("corrupt JPEG segment stream"));
        }
        let marker = out[pos + 1];
        if marker == MARKER_SOS || marker == MARKER_EOI {
            break;
        }
        let seg_len = usize::from(u16::from_be_bytes([out[pos + 2], out[pos + 3]]));
        if seg_len < 2 || pos + 2 + seg_len > out.len() {
            return Err(ImageKbError::decode("truncated JPEG segment"));
        }
        let payload = pos + 4;
        let payload_len = seg_len - 2;

        if marker == MARKER_APP0 && payload_len >= 12 && &out[payload..payload + 5] == b"JFIF\0" {
            // id(5) version(2) units(1) xdensity(2) ydensity(2)
            out[payload + 7] = 1; // dots per inch
            out[payload + 8..payload + 10].copy_from_slice(&density.to_be_bytes());
            out[payload + 10..payload + 12].copy_from_slice(&density.to_be_bytes());
            jfif_patched = true;
        } else if marker == MARKER_APP1
            && payload_len >= 6
            && &out[payload..payload + 6] == b"Exif\0\0"
        {
            patch_exif_resolution(&mut out, payload + 6, pos + 2 + seg_len, density);
        }

        pos += 2 + seg_len;
    }

    if !jfif_patched {
        out.splice(2..2, jfif_app0_segment(density));
    }
    Ok(out)
}

/// A complete APP0 segment declaring `density` dots per inch, no thumbnail.
fn jfif_app0_segment(density: u16) -> Vec<u8> {
    let mut seg = Vec::with_capacity(18);
    seg.extend_from_slice(&[0xFF, MARKER_APP0, 0x00, 0x10]);
    seg.extend_from_slice(b"JFIF\0");
    seg.extend_from_slice(&[0x01, 0x02]); // version 1.2
    seg.push(1); // dots per inch
    seg.extend_from_slice(&density.to_be_bytes());
    seg.extend_from_slice(&density.to_be_bytes());
    seg.extend_from_slice(&[0x00, 0x00]); // no thumbnail
    seg
}

/// Overwrite IFD0 resolution tags in an EXIF blob, honoring its byte order.
///
/// Best effort: a malformed EXIF segment is left as-is (the JFIF patch has
/// already taken effect), so every read and write is bounds-checked and
/// bails silently.
fn patch_exif_resolution(buf: &mut [u8], tiff_start: usize, seg_end: usize, density: u16) {
    const TAG_X_RESOLUTION: u16 = 0x011A;
    const TAG_Y_RESOLUTION: u16 = 0x011B;
    const TAG_RESOLUTION_UNIT: u16 = 0x0128;
    const TYPE_SHORT: u16 = 3;
    const TYPE_RATIONAL: u16 = 5;
    const UNIT_INCHES: u16 = 2;

    if seg_end > buf.len() || tiff_start + 8 > seg_end {
        return;
    }
    let little_endian = match &buf[tiff_start..tiff_start + 2] {
        b"II" => true,
        b"MM" => false,
        _ => return,
    };

    let read_u16 = |buf: &[u8], at: usize| -> Option<u16> {
        let bytes: [u8; 2] = buf.get(at..at + 2)?.try_into().ok()?;
        Some(if little_endian {
            u16::from_le_bytes(bytes)
        } else {
            u16::from_be_bytes(bytes)
        })
    };
    let read_u32 = |buf: &[u8], at: usize| -> Option<u32> {
        let bytes: [u8; 4] = buf.get(at..at + 4)?.try_into().ok()?;
        Some(if little_endian {
            u32::from_le_bytes(bytes)
        } else {
            u32::from_be_bytes(bytes)
        })
    };
    let u16_bytes = |v: u16| {
        if little_endian {
            v.to_le_bytes()
        } else {
            v.to_be_bytes()
        }
    };
    let u32_bytes = |v: u32| {
        if little_endian {
            v.to_le_bytes()
        } else {
            v.to_be_bytes()
        }
    };

    if read_u16(buf, tiff_start + 2) != Some(42) {
        return;
    }
    let Some(ifd_offset) = read_u32(buf, tiff_start + 4) else {
        return;
    };
    let ifd = tiff_start + ifd_offset as usize;
    let Some(entry_count) = read_u16(buf, ifd) else {
        return;
    };

    for i in 0..usize::from(entry_count) {
        let entry = ifd + 2 + i * 12;
        if entry + 12 > seg_end {
            return;
        }
        let (Some(tag), Some(field_type)) = (read_u16(buf, entry), read_u16(buf, entry + 2)) else {
            return;
        };

        match (tag, field_type) {
            (TAG_RESOLUTION_UNIT, TYPE_SHORT) => {
                buf[entry + 8..entry + 10].copy_from_slice(&u16_bytes(UNIT_INCHES));
            }
            (TAG_X_RESOLUTION | TAG_Y_RESOLUTION, TYPE_RATIONAL) => {
                let Some(value_offset) = read_u32(buf, entry + 8) else {
                    return;
                };
                let at = tiff_start + value_offset as usize;
                if at + 8 > seg_end {
                    continue;
                }
                buf[at..at + 4].copy_from_slice(&u32_bytes(u32::from(density)));
                buf[at + 4..at + 8].copy_from_slice(&u32_bytes(1));
            }
            _ => {}
        }
    }
}
