use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::ApproxResult;

/// Decoded sprite pixels, premultiplied RGBA8.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8 bytes, tightly packed, row-major.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> ApproxResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Decode an encoded frame into monochrome RGBA8 at `width x height`.
///
/// Luma is replicated into all three color channels so single-channel sampling sees the same
/// value the eye would. Frames of a different size are resized with a triangle filter.
pub fn decode_frame_luma(bytes: &[u8], width: u32, height: u32) -> ApproxResult<Vec<u8>> {
    let dyn_img = image::load_from_memory(bytes).context("decode frame from memory")?;
    let mut luma = dyn_img.to_luma8();
    if luma.dimensions() != (width, height) {
        luma = image::imageops::resize(&luma, width, height, image::imageops::FilterType::Triangle);
    }
    Ok(luma_to_rgba8(luma.as_raw()))
}

pub(crate) fn luma_to_rgba8(luma: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(luma.len() * 4);
    for &l in luma {
        out.extend_from_slice(&[l, l, l, 255]);
    }
    out
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
