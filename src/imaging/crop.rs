//! Region extraction for user-selected crops.
//!
//! Cropping happens before the pipeline sees the image: the caller settles
//! on a [`CropRegion`] and the pipeline receives the cropped buffer.

use super::backend::ImagingError;
use super::calculations::CropRegion;
use super::raster::{CHANNELS, RasterBuffer};

/// Copy `region` out of `buffer` into a new buffer.
pub fn crop(buffer: &RasterBuffer, region: CropRegion) -> Result<RasterBuffer, ImagingError> {
    if region.is_empty() {
        return Err(ImagingError::InvalidCrop(format!(
            "region {}x{} is empty",
            region.width, region.height
        )));
    }
    if !region.fits_within(buffer.dimensions()) {
        return Err(ImagingError::InvalidCrop(format!(
            "region {}x{}+{}+{} exceeds image {}x{}",
            region.width,
            region.height,
            region.x,
            region.y,
            buffer.width(),
            buffer.height()
        )));
    }

    let row_len = region.width as usize * CHANNELS;
    let src = buffer.as_samples();
    let mut data = Vec::with_capacity(row_len * region.height as usize);
    for y in region.y..region.y + region.height {
        let start = buffer.offset(region.x, y);
        data.extend_from_slice(&src[start..start + row_len]);
    }
    RasterBuffer::from_raw(region.width, region.height, data)
}
