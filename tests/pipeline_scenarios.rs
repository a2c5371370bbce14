//! End-to-end pipeline behaviour through the public API.

use batchpix::formats::MediaType;
use batchpix::imaging::color::{adjust_brightness, adjust_contrast, contrast_factor};
use batchpix::imaging::convolution::{convolve, sharpen_kernel, texture_kernel};
use batchpix::imaging::resize::resize_to_fit;
use batchpix::imaging::statistics::analyze;
use batchpix::imaging::{
    ImageCodec, Kernel, ProcessingParameters, RasterBuffer, RustCodec, process_buffer,
};

fn gray_200x100() -> RasterBuffer {
    RasterBuffer::filled(200, 100, [128, 128, 128, 255])
}

/// Deterministic pseudo-random RGBA content.
fn noise(width: u32, height: u32, seed: u32) -> RasterBuffer {
    let mut state = seed.wrapping_mul(2654435761).max(1);
    RasterBuffer::from_fn(width, height, |_, _| {
        let mut next = || {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state & 0xFF) as u8
        };
        [next(), next(), next(), next()]
    })
}

#[test]
fn gray_without_enhance_is_untouched() {
    let params = ProcessingParameters::new(0.9, 1000, false).unwrap();
    let out = process_buffer(gray_200x100(), &params).unwrap();
    assert_eq!(out, gray_200x100());
}

#[test]
fn gray_with_enhance_reports_statistics_and_saturates() {
    let stats = analyze(&gray_200x100());
    assert_eq!(stats.brightness, 128.0);
    assert_eq!(stats.contrast, 0.0);

    let params = ProcessingParameters::new(0.9, 1000, true).unwrap();
    let out = process_buffer(gray_200x100(), &params).unwrap();
    assert_eq!(out.dimensions(), (200, 100));
    assert!(out.pixels().all(|px| px == [255, 255, 255, 255]));
}

#[test]
fn large_landscape_bounded_to_exact_ratio() {
    let params = ProcessingParameters::new(0.9, 800, false).unwrap();
    let buf = RasterBuffer::filled(4000, 2000, [30, 60, 90, 255]);
    let out = process_buffer(buf, &params).unwrap();
    assert_eq!(out.dimensions(), (800, 400));
}

#[test]
fn resize_never_exceeds_bound() {
    for (w, h, max) in [(1, 999, 7), (333, 334, 333), (5000, 3, 64), (17, 17, 16)] {
        let out = resize_to_fit(RasterBuffer::filled(w, h, [1, 2, 3, 255]), max).unwrap();
        let (ow, oh) = out.dimensions();
        assert!(ow <= max && oh <= max, "{w}x{h} -> {ow}x{oh} (max {max})");
        assert!(ow >= 1 && oh >= 1);
    }
}

#[test]
fn encode_decode_then_resize_is_stable() {
    let codec = RustCodec::new();
    let params = ProcessingParameters::new(0.85, 500, false).unwrap();
    let first = process_buffer(noise(1200, 900, 7), &params).unwrap();
    assert_eq!(first.dimensions(), (500, 375));

    let jpeg = codec.encode(&first, params.quality).unwrap();
    let decoded = codec.decode(&jpeg, MediaType::Jpeg).unwrap();
    assert_eq!(decoded.original_size, jpeg.len());

    let second = resize_to_fit(decoded.buffer, 500).unwrap();
    assert_eq!(second.dimensions(), (500, 375));
}

#[test]
fn neutral_color_parameters_change_nothing() {
    let src = noise(40, 30, 3);

    let mut buf = src.clone();
    adjust_brightness(&mut buf, 0.0);
    assert_eq!(buf, src);

    let neutral = 22695.0 / 425.0;
    assert!((contrast_factor(neutral) - 1.0).abs() < 1e-12);
    let mut buf = src.clone();
    adjust_contrast(&mut buf, neutral);
    assert_eq!(buf, src);
}

#[test]
fn convolution_output_is_opaque_for_any_input_alpha() {
    for seed in 1..5 {
        let src = noise(23, 19, seed);
        for kernel in [texture_kernel(), sharpen_kernel()] {
            let out = convolve(&src, &kernel);
            assert_eq!(out.dimensions(), src.dimensions());
            assert!(out.pixels().all(|px| px[3] == 255));
        }
    }
}

#[test]
fn zero_padding_dims_the_border() {
    let src = RasterBuffer::filled(32, 24, [60, 60, 60, 255]);
    let blur = Kernel::new(vec![1.0 / 9.0; 9]).unwrap();
    let out = convolve(&src, &blur);

    let (w, h) = out.dimensions();
    let mut border = (0u64, 0u64);
    let mut interior = (0u64, 0u64);
    for y in 0..h {
        for x in 0..w {
            let v = out.pixel(x, y)[0] as u64;
            let on_edge = x == 0 || y == 0 || x == w - 1 || y == h - 1;
            let slot = if on_edge { &mut border } else { &mut interior };
            slot.0 += v;
            slot.1 += 1;
        }
    }
    let border_mean = border.0 as f64 / border.1 as f64;
    let interior_mean = interior.0 as f64 / interior.1 as f64;
    assert_eq!(interior_mean, 60.0);
    assert!(border_mean < interior_mean);
}
