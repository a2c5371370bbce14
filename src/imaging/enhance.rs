//! Automatic enhancement: color correction followed by two convolution passes.
//!
//! ```text
//! analyze → brightness → contrast → saturation → texture pass → sharpen pass
//! ```
//!
//! The color steps mutate the buffer in place. Each convolution pass reads
//! the previous buffer and replaces it with a new one.

use super::color::{adjust_brightness, adjust_contrast, adjust_saturation};
use super::convolution::{convolve, sharpen_kernel, texture_kernel};
use super::raster::RasterBuffer;
use super::statistics::analyze;
use tracing::{debug, instrument};

/// Images darker than this get brightened, everything else darkened.
pub const BRIGHTNESS_THRESHOLD: f64 = 100.0;
pub const DARK_IMAGE_BOOST: f64 = 10.0;
pub const BRIGHT_IMAGE_CUT: f64 = -70.0;
pub const SATURATION_BOOST: f64 = 1.1;

/// Two-branch brightness correction for a mean brightness.
pub fn brightness_adjustment(mean_brightness: f64) -> f64 {
    if mean_brightness < BRIGHTNESS_THRESHOLD {
        DARK_IMAGE_BOOST
    } else {
        BRIGHT_IMAGE_CUT
    }
}

/// Color-correct a buffer in place from its own statistics.
pub fn correct_colors(buffer: &mut RasterBuffer) {
    let stats = analyze(buffer);
    let delta = brightness_adjustment(stats.brightness);
    debug!(
        brightness = stats.brightness,
        contrast = stats.contrast,
        delta,
        "Color correction"
    );

    adjust_brightness(buffer, delta);
    adjust_contrast(buffer, stats.contrast);
    adjust_saturation(buffer, SATURATION_BOOST);
}

/// Run the full enhancement chain, consuming the buffer.
#[instrument(skip_all, fields(width = buffer.width(), height = buffer.height()))]
pub fn enhance(mut buffer: RasterBuffer) -> RasterBuffer {
    correct_colors(&mut buffer);
    let textured = convolve(&buffer, &texture_kernel());
    convolve(&textured, &sharpen_kernel())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brightness_adjustment_branches() {
        assert_eq!(brightness_adjustment(0.0), 10.0);
        assert_eq!(brightness_adjustment(99.9), 10.0);
        assert_eq!(brightness_adjustment(100.0), -70.0);
        assert_eq!(brightness_adjustment(128.0), -70.0);
    }

    #[test]
    fn correct_colors_on_mid_gray() {
        // 128 -> 58 (brightness) -> 72 (contrast, factor 170/259) -> 74 (saturation)
        let mut buf = RasterBuffer::filled(20, 10, [128, 128, 128, 255]);
        correct_colors(&mut buf);
        assert!(buf.pixels().all(|px| px == [74, 74, 74, 255]));
    }

    #[test]
    fn correct_colors_on_dark_gray() {
        // 40 -> 50 -> 100 - 50 * 0.6564 = 67.18 -> 67 -> 0.7*67 + 1.1*0.3*67 = 69.01 -> 69
        let mut buf = RasterBuffer::filled(4, 4, [40, 40, 40, 255]);
        correct_colors(&mut buf);
        assert_eq!(buf.pixel(2, 2), [69, 69, 69, 255]);
    }

    #[test]
    fn correct_colors_keeps_alpha() {
        let mut buf = RasterBuffer::filled(4, 4, [200, 30, 90, 12]);
        correct_colors(&mut buf);
        assert!(buf.pixels().all(|px| px[3] == 12));
    }

    #[test]
    fn enhance_mid_gray_saturates_to_white() {
        // Texture pass: 74 * 12 interior, 74 * 17 corners, 74 * 15 edges, all
        // above 255. Sharpen pass on an all-255 field: at least 9 - 7 = 2
        // times 255 everywhere, so the result is white and opaque.
        let buf = RasterBuffer::filled(200, 100, [128, 128, 128, 255]);
        let out = enhance(buf);
        assert_eq!(out.dimensions(), (200, 100));
        assert!(out.pixels().all(|px| px == [255, 255, 255, 255]));
    }

    #[test]
    fn sharpen_runs_on_textured_buffer() {
        // Black/white checkerboard: correction maps it to 35/161. Texture
        // leaves midtones on the border, e.g. 147 at (2, 0); sharpen then
        // lifts that pixel to 255.
        let checker = || {
            RasterBuffer::from_fn(9, 7, |x, y| {
                if (x + y) % 2 == 0 {
                    [0, 0, 0, 255]
                } else {
                    [255, 255, 255, 255]
                }
            })
        };
        let mut corrected = checker();
        correct_colors(&mut corrected);
        assert_eq!(corrected.pixel(0, 0), [35, 35, 35, 255]);
        assert_eq!(corrected.pixel(1, 0), [161, 161, 161, 255]);

        let textured = convolve(&corrected, &texture_kernel());
        assert_eq!(textured.pixel(2, 0), [147, 147, 147, 255]);

        let out = enhance(checker());
        assert_eq!(out, convolve(&textured, &sharpen_kernel()));
        assert_ne!(out, textured);
        assert_eq!(out.pixel(2, 0), [255, 255, 255, 255]);

        let reversed = convolve(&convolve(&corrected, &sharpen_kernel()), &texture_kernel());
        assert_ne!(out, reversed);
    }

    #[test]
    fn enhance_forces_opaque_alpha() {
        let buf = RasterBuffer::from_fn(8, 8, |x, y| [(x * 30) as u8, (y * 30) as u8, 60, 0]);
        let out = enhance(buf);
        assert!(out.pixels().all(|px| px[3] == 255));
    }

    #[test]
    fn enhance_is_deterministic() {
        let make = || RasterBuffer::from_fn(16, 9, |x, y| [(x * 13) as u8, (y * 21) as u8, 99, 255]);
        assert_eq!(enhance(make()), enhance(make()));
    }
}
