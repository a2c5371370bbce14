//! Pure Rust codec built on the `image` crate.
//!
//! ## Format mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, BMP, TIFF, WebP) | `image::load_from_memory_with_format` |
//! | Decode (HEIC, HEIF, SVG) | not built in; reported as unsupported |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` at the requested quality |
//!
//! JPEG has no alpha channel, so encoding composites every pixel over black
//! first. Opaque pixels pass through unchanged.

use super::backend::{Decoded, ImageCodec, ImagingError};
use super::params::Quality;
use super::raster::RasterBuffer;
use crate::formats::MediaType;
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};

/// Codec using the `image` crate's pure-Rust decoders and JPEG encoder.
pub struct RustCodec;

impl RustCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustCodec {
    fn default() -> Self {
        Self::new()
    }
}

/// Interleaved RGB8 samples with alpha composited over black.
fn flatten_alpha(buffer: &RasterBuffer) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(buffer.pixel_count() * 3);
    for px in buffer.pixels() {
        let alpha = px[3] as u32;
        for &c in &px[..3] {
            rgb.push(((c as u32 * alpha + 127) / 255) as u8);
        }
    }
    rgb
}

impl ImageCodec for RustCodec {
    fn decode(&self, bytes: &[u8], media_type: MediaType) -> Result<Decoded, ImagingError> {
        let format = media_type.image_format().ok_or_else(|| {
            ImagingError::UnsupportedFormat(format!(
                "{} requires external conversion",
                media_type.mime()
            ))
        })?;
        let img = image::load_from_memory_with_format(bytes, format).map_err(|e| {
            ImagingError::DecodingFailed(format!("{}: {}", media_type.mime(), e))
        })?;
        Ok(Decoded {
            buffer: RasterBuffer::from_rgba_image(img.to_rgba8()),
            original_size: bytes.len(),
        })
    }

    fn encode(&self, buffer: &RasterBuffer, quality: Quality) -> Result<Vec<u8>, ImagingError> {
        if buffer.is_empty() {
            return Err(ImagingError::EncodingFailed(format!(
                "cannot encode {}x{} image",
                buffer.width(),
                buffer.height()
            )));
        }
        let rgb = flatten_alpha(buffer);
        let mut out = Vec::new();
        JpegEncoder::new_with_quality(&mut out, quality.percent())
            .write_image(&rgb, buffer.width(), buffer.height(), ExtendedColorType::Rgb8)
            .map_err(|e| ImagingError::EncodingFailed(format!("JPEG encode failed: {}", e)))?;
        Ok(out)
    }
}
