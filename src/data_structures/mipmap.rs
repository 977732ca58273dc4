//! CPU mip chain generation.
//!
//! Every level halves both dimensions (rounding down, never below 1) until the
//! image is 1x1. A destination texel is the rounded mean of the source block it
//! covers: normally 2x2, widening to 3 texels in the last column/row of an odd
//! dimension and narrowing to 1 when a dimension is already 1.

use std::ops::Range;

use image::RgbaImage;

/// Number of levels in a full chain for a `width` x `height` base image.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    let largest = width.max(height).max(1);
    u32::BITS - largest.leading_zeros()
}

/// The full chain, base level first, last level 1x1.
pub fn mip_chain(base: &RgbaImage) -> Vec<RgbaImage> {
    let count = mip_level_count(base.width(), base.height()) as usize;
    let mut levels = Vec::with_capacity(count);
    levels.push(base.clone());
    while levels.len() < count {
        let next = downsample(&levels[levels.len() - 1]);
        levels.push(next);
    }
    levels
}

/// Box-filter `src` down to the next mip level.
pub fn downsample(src: &RgbaImage) -> RgbaImage {
    let (width, height) = src.dimensions();
    let dst_width = (width / 2).max(1);
    let dst_height = (height / 2).max(1);

    RgbaImage::from_fn(dst_width, dst_height, |x, y| {
        let xs = footprint(x, dst_width, width);
        let ys = footprint(y, dst_height, height);
        let count = xs.len() as u32 * ys.len() as u32;

        let mut sum = [0u32; 4];
        for sy in ys {
            for sx in xs.clone() {
                let texel = src.get_pixel(sx, sy);
                for (acc, channel) in sum.iter_mut().zip(texel.0) {
                    *acc += channel as u32;
                }
            }
        }
        image::Rgba(sum.map(|acc| ((acc + count / 2) / count) as u8))
    })
}

// Source texels covered by destination texel `i`; the last one absorbs an odd remainder.
fn footprint(i: u32, dst_len: u32, src_len: u32) -> Range<u32> {
    let start = (i * 2).min(src_len - 1);
    let end = if i + 1 == dst_len {
        src_len
    } else {
        (i * 2 + 2).min(src_len)
    };
    start..end
}
