//! Spatial convolution with zero padding.
//!
//! Every output sample is the weighted sum of the source neighborhood under
//! the kernel. Taps that fall outside the image contribute nothing and the
//! kernel is not renormalized, so with a positive-sum kernel the edges come
//! out darker than the interior. Output alpha is always opaque.
//!
//! The result is written to a fresh buffer: taps must read unmodified source
//! pixels, so convolving in place would corrupt every neighbor after the
//! first.

use super::color::to_sample;
use super::raster::{CHANNELS, Kernel, RasterBuffer};

/// Texture enhancement kernel: center 20, neighbors -1 (weight sum 12).
pub const TEXTURE_KERNEL: [f32; 9] = [-1.0, -1.0, -1.0, -1.0, 20.0, -1.0, -1.0, -1.0, -1.0];

/// Final sharpening kernel. The right-hand neighbor is 0, so the kernel is
/// asymmetric (weight sum 2).
pub const SHARPEN_KERNEL: [f32; 9] = [-1.0, -1.0, -1.0, -1.0, 9.0, 0.0, -1.0, -1.0, -1.0];

pub fn texture_kernel() -> Kernel {
    Kernel::new(TEXTURE_KERNEL).expect("texture kernel is 3x3")
}

pub fn sharpen_kernel() -> Kernel {
    Kernel::new(SHARPEN_KERNEL).expect("sharpen kernel is 3x3")
}

/// Convolve `source` with `kernel`, producing a new buffer of the same size.
pub fn convolve(source: &RasterBuffer, kernel: &Kernel) -> RasterBuffer {
    if source.is_empty() {
        return source.clone();
    }
    let (width, height) = source.dimensions();
    let (w, h) = (width as isize, height as isize);
    let side = kernel.side();
    let half = kernel.half_width() as isize;
    let src = source.as_samples();

    let mut out = vec![0u8; src.len()];
    for (y, row) in out.chunks_exact_mut(width as usize * CHANNELS).enumerate() {
        let y = y as isize;
        for (x, px) in row.chunks_exact_mut(CHANNELS).enumerate() {
            let x = x as isize;
            let mut sum = [0.0f32; 3];
            for cy in 0..side {
                let sy = y + cy as isize - half;
                if sy < 0 || sy >= h {
                    continue;
                }
                for cx in 0..side {
                    let sx = x + cx as isize - half;
                    if sx < 0 || sx >= w {
                        continue;
                    }
                    let weight = kernel.weight(cy, cx);
                    let offset = (sy * w + sx) as usize * CHANNELS;
                    sum[0] += src[offset] as f32 * weight;
                    sum[1] += src[offset + 1] as f32 * weight;
                    sum[2] += src[offset + 2] as f32 * weight;
                }
            }
            px[0] = to_sample(sum[0] as f64);
            px[1] = to_sample(sum[1] as f64);
            px[2] = to_sample(sum[2] as f64);
            px[3] = 255;
        }
    }

    RasterBuffer::from_raw(width, height, out).expect("output is sized from the source")
}
