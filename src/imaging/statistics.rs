//! Global brightness and contrast estimates.
//!
//! Both figures are per-pixel means over the RGB channels; alpha is ignored.
//! A pixel's brightness is `(R + G + B) / 3` and its contrast is the summed
//! absolute deviation of each channel from that pixel's own brightness.

use super::raster::RasterBuffer;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageStatistics {
    pub brightness: f64,
    pub contrast: f64,
}

/// Compute [`ImageStatistics`] for a buffer. An empty buffer yields zeros.
pub fn analyze(buffer: &RasterBuffer) -> ImageStatistics {
    let count = buffer.pixel_count();
    if count == 0 {
        return ImageStatistics {
            brightness: 0.0,
            contrast: 0.0,
        };
    }

    let (total_brightness, total_contrast) =
        buffer
            .pixels()
            .fold((0.0f64, 0.0f64), |(brightness_sum, contrast_sum), px| {
                let (r, g, b) = (px[0] as f64, px[1] as f64, px[2] as f64);
                let brightness = (r + g + b) / 3.0;
                let contrast =
                    (r - brightness).abs() + (g - brightness).abs() + (b - brightness).abs();
                (brightness_sum + brightness, contrast_sum + contrast)
            });

    ImageStatistics {
        brightness: total_brightness / count as f64,
        contrast: total_contrast / count as f64,
    }
}
