//! Longest-edge resize.
//!
//! Target dimensions come from
//! [`calculate_fit_dimensions`](super::calculations::calculate_fit_dimensions);
//! resampling is `image::imageops::resize` with the Lanczos3 filter.

use super::backend::ImagingError;
use super::calculations::calculate_fit_dimensions;
use super::raster::RasterBuffer;
use image::imageops::{self, FilterType};
use tracing::debug;

/// Resize so neither edge exceeds `max_dimension`, preserving aspect ratio.
///
/// A buffer that already fits is returned as-is without resampling.
pub fn resize_to_fit(buffer: RasterBuffer, max_dimension: u32) -> Result<RasterBuffer, ImagingError> {
    buffer.ensure_not_empty()?;
    if max_dimension == 0 {
        return Err(ImagingError::InvalidParameters(
            "max dimension must be positive".into(),
        ));
    }

    let source = buffer.dimensions();
    let (width, height) = calculate_fit_dimensions(source, max_dimension);
    if (width, height) == source {
        return Ok(buffer);
    }

    debug!(
        from_w = source.0,
        from_h = source.1,
        to_w = width,
        to_h = height,
        "Resampling"
    );
    let resized = imageops::resize(&buffer.into_rgba_image(), width, height, FilterType::Lanczos3);
    Ok(RasterBuffer::from_rgba_image(resized))
}
