//! pHYs chunk patching on encoded PNG bytes.
//!
//! PNG stores resolution as pixels per meter; the chunk is rewritten in
//! place when present, otherwise inserted before the first IDAT.

use crate::error::{ImageKbError, Result};

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const METERS_PER_INCH: f64 = 0.0254;
const UNIT_METER: u8 = 1;

/// Overwrite (or insert) the pHYs chunk so both axes read `dpi`.
pub fn set_png_dpi(data: &[u8], dpi: f64) -> Result<Vec<u8>> {
    if data.len() < 8 || data[0..8] != PNG_SIGNATURE {
        return Err(ImageKbError::decode("missing PNG signature"));
    }
    let ppm = (dpi / METERS_PER_INCH).round() as u32;

    let mut out = data.to_vec();
    let mut idat_at = None;

    let mut pos = 8usize;
    while pos + 12 <= out.len() {
        let chunk_len =
            u32::from_be_bytes([out[pos], out[pos + 1], out[pos + 2], out[pos + 3]]) as usize;
        if pos + 12 + chunk_len > out.len() {
            return Err(ImageKbError::decode("truncated PNG chunk"));
        }
        match &out[pos + 4..pos + 8] {
            b"pHYs" if chunk_len == 9 => {
                write_phys_payload(&mut out[pos + 8..pos + 17], ppm);
                let crc = chunk_crc(&out[pos + 4..pos + 17]);
                out[pos + 17..pos + 21].copy_from_slice(&crc.to_be_bytes());
                return Ok(out);
            }
            b"IDAT" => {
                idat_at = Some(pos);
                break;
            }
            b"IEND" => break,
            _ => {}
        }
        pos += 12 + chunk_len;
    }

    let at = idat_at.ok_or_else(|| ImageKbError::decode("PNG has no image data chunk"))?;
    out.splice(at..at, phys_chunk(ppm));
    Ok(out)
}

fn write_phys_payload(payload: &mut [u8], ppm: u32) {
    payload[0..4].copy_from_slice(&ppm.to_be_bytes());
    payload[4..8].copy_from_slice(&ppm.to_be_bytes());
    payload[8] = UNIT_METER;
}

/// A complete pHYs chunk: length, type, payload, CRC.
fn phys_chunk(ppm: u32) -> Vec<u8> {
    let mut body = Vec::with_capacity(13);
    body.extend_from_slice(b"pHYs");
    body.extend_from_slice(&ppm.to_be_bytes());
    body.extend_from_slice(&ppm.to_be_bytes());
    body.push(UNIT_METER);

    let mut chunk = Vec::with_capacity(21);
    chunk.extend_from_slice(&9u32.to_be_bytes());
    chunk.extend_from_slice(&body);
    chunk.extend_from_slice(&chunk_crc(&body).to_be_bytes());
    chunk
}

/// CRC-32 over chunk type + payload, as the PNG spec requires.
fn chunk_crc(type_and_payload: &[u8]) -> u32 {
    let mut crc = flate2::Crc::new();
    crc.update(type_and_payload);
    crc.sum()
}
