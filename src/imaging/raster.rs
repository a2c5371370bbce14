//! In-memory pixel buffers and convolution kernels.
//!
//! [`RasterBuffer`] is the unit of work for every pipeline stage: a flat,
//! row-major RGBA8 sample vector plus its dimensions. It converts to and from
//! `image::RgbaImage` without copying so the `image` crate can resample and
//! encode it.

use super::backend::ImagingError;
use image::RgbaImage;

/// Samples per pixel (red, green, blue, alpha).
pub const CHANNELS: usize = 4;

/// Row-major RGBA8 pixel buffer.
///
/// `data.len() == width * height * 4` always holds; constructors reject
/// anything else. A buffer is owned by exactly one pipeline run at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RasterBuffer {
    /// Wrap raw samples, checking the length against the dimensions.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self, ImagingError> {
        let expected = sample_count(width, height);
        if data.len() != expected {
            return Err(ImagingError::BufferLengthMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Buffer where every pixel has the same RGBA value.
    pub fn filled(width: u32, height: u32, pixel: [u8; 4]) -> Self {
        let pixels = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixels * CHANNELS);
        for _ in 0..pixels {
            data.extend_from_slice(&pixel);
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Build a buffer by evaluating `f` at every `(x, y)`.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> [u8; 4]) -> Self {
        let mut data = Vec::with_capacity(sample_count(width, height));
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// True when either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Fails with [`ImagingError::InvalidDimensions`] for a zero-sized buffer.
    pub fn ensure_not_empty(&self) -> Result<(), ImagingError> {
        if self.is_empty() {
            return Err(ImagingError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn as_samples(&self) -> &[u8] {
        &self.data
    }

    pub fn as_samples_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// RGBA value at `(x, y)`. Panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Iterate over pixels as mutable 4-sample chunks.
    pub fn pixels_mut(&mut self) -> std::slice::ChunksExactMut<'_, u8> {
        self.data.chunks_exact_mut(CHANNELS)
    }

    pub fn pixels(&self) -> std::slice::ChunksExact<'_, u8> {
        self.data.chunks_exact(CHANNELS)
    }

    #[inline]
    pub(crate) fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    /// Hand the samples to the `image` crate.
    pub fn into_rgba_image(self) -> RgbaImage {
        RgbaImage::from_raw(self.width, self.height, self.data)
            .expect("length invariant is upheld by every constructor")
    }

    pub fn from_rgba_image(img: RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }
}

fn sample_count(width: u32, height: u32) -> usize {
    width as usize * height as usize * CHANNELS
}

/// Odd-sized square matrix of filter weights, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    side: usize,
    weights: Vec<f32>,
}

impl Kernel {
    /// Build a kernel from `side * side` weights where `side` is odd.
    pub fn new(weights: impl Into<Vec<f32>>) -> Result<Self, ImagingError> {
        let weights = weights.into();
        let len = weights.len();
        let side = (len as f64).sqrt().round() as usize;
        if len == 0 || side * side != len || side % 2 == 0 {
            return Err(ImagingError::InvalidKernel(len));
        }
        Ok(Self { side, weights })
    }

    pub fn side(&self) -> usize {
        self.side
    }

    /// Distance from the center tap to the edge: `(side - 1) / 2`.
    pub fn half_width(&self) -> usize {
        self.side / 2
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Weight at row `cy`, column `cx`.
    #[inline]
    pub fn weight(&self, cy: usize, cx: usize) -> f32 {
        self.weights[cy * self.side + cx]
    }

    pub fn sum(&self) -> f32 {
        self.weights.iter().sum()
    }
}
