// src/surface/mask.rs
//! Generic masking building blocks for drivers without a native mask primitive.
//!
//! A mask is white-on-black: each mask byte `a` weighs the new drawing
//! (`src`) against what the buffer held when the mask was set (`dst`):
//! `dst = (dst * (255 - a) + src * a) / 255`, truncating.

use crate::error::{Result, SurfaceError};
use crate::image::{Depth, RgbImage};
use crate::pixels::PhysicalPx;
use std::borrow::Cow;

/// Reduces an image to one luminance channel of `width` x `height` pixels.
///
/// Each output byte is `(r + g + b) / 3` truncated. The source is resampled
/// first when its pixel size differs; a depth-1 source is only resampled.
pub fn rgb3_to_rgb1(rgb3: &RgbImage, width: PhysicalPx, height: PhysicalPx) -> Result<RgbImage> {
    let source = if width != rgb3.data_w() || height != rgb3.data_h() {
        Cow::Owned(rgb3.copy(width, height)?)
    } else {
        Cow::Borrowed(rgb3)
    };
    if source.depth() == Depth::Gray {
        return source.copy(width, height);
    }
    let mut data = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height {
        data.extend(
            source
                .row(y)
                .chunks_exact(3)
                .map(|p| ((p[0] as u16 + p[1] as u16 + p[2] as u16) / 3) as u8),
        );
    }
    RgbImage::new(data, width, height, Depth::Gray)
}

/// Mixes `src` into `dst` weighted by the depth-1 `mask`.
///
/// Both buffers hold `mask.data_h()` rows of `line_size` bytes with 3 bytes
/// per pixel. With `bottom_to_top`, buffer row `i` pairs with mask row
/// `h - 1 - i`, for buffers whose scan lines run upwards.
pub fn copy_with_mask(
    mask: &RgbImage,
    dst: &mut [u8],
    src: &[u8],
    line_size: usize,
    bottom_to_top: bool,
) -> Result<()> {
    let w = mask.data_w() as usize;
    let h = mask.data_h() as usize;
    let mismatch = || SurfaceError::MaskMismatch {
        mask_w: w,
        mask_h: h,
        rows: dst.len().min(src.len()) / line_size.max(1),
        line_size,
    };
    if mask.depth() != Depth::Gray
        || line_size < 3 * w
        || dst.len() < h * line_size
        || src.len() < h * line_size
    {
        return Err(mismatch());
    }
    for i in 0..h {
        let alpha = mask.row(if bottom_to_top { (h - i - 1) as u32 } else { i as u32 });
        let start = i * line_size;
        let dst_row = &mut dst[start..start + 3 * w];
        let src_row = &src[start..start + 3 * w];
        for ((d, s), &u) in dst_row
            .chunks_exact_mut(3)
            .zip(src_row.chunks_exact(3))
            .zip(alpha)
        {
            let u = u as u32;
            let v = 255 - u;
            for c in 0..3 {
                d[c] = ((d[c] as u32 * v + s[c] as u32 * u) / 255) as u8;
            }
        }
    }
    Ok(())
}
