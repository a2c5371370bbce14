//! # batchpix
//!
//! A batch image resizer with automatic color correction and sharpening.
//! Point it at files or directories; every image is scaled to fit a maximum
//! edge, optionally enhanced, and re-encoded as JPEG.
//!
//! # Architecture: One Pipeline, Many Workers
//!
//! Each image flows through the same synchronous pipeline:
//!
//! ```text
//! decode → [crop] → resize → [color correction → texture → sharpen] → encode
//! ```
//!
//! The pixel stages are pure functions over an owned [`imaging::RasterBuffer`]:
//! no I/O, no shared state. That makes them trivially testable, and lets the
//! [`batch`] runner fan images out across a bounded worker pool without any
//! locking.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Pixel stages (statistics, color, convolution, resize, crop) and the codec seam |
//! | [`formats`] | Media type detection, accepted-format check, file size limit |
//! | [`batch`] | Bounded parallel processing with cancellation and progress events |
//! | [`config`] | `batchpix.toml` loading, merging, and validation |
//! | [`output`] | CLI output formatting for batch progress and checks |
//!
//! # Design Decisions
//!
//! ## Enhancement Is Global, Not Adaptive Per Pixel
//!
//! Color correction is driven by two whole-image statistics (mean brightness
//! and mean per-pixel channel spread). Dark images get a small brightness
//! boost, bright images a larger cut; contrast and saturation adjustments
//! follow. The texture and sharpen passes are fixed 3x3 kernels with zero
//! padding, so edge pixels darken slightly. This is intentional and matches
//! the look users expect from the tool.
//!
//! ## Integer Sizing
//!
//! Resize targets are truncated toward zero (minimum one pixel). Images that
//! already fit are passed through untouched; nothing is ever upscaled.
//!
//! ## Errors Stay With Their Image
//!
//! A corrupt or unsupported file fails its own slot in the batch report and
//! nothing else. The batch itself fails only when the output directory or the
//! worker pool cannot be created.
//!
//! ## Pure-Rust Codecs
//!
//! Decoding and JPEG encoding use the `image` crate with no system
//! libraries. Formats it cannot read (HEIC/HEIF, SVG) are recognised and
//! reported; a converting [`imaging::ImageCodec`] can be plugged in for them.

pub mod batch;
pub mod config;
pub mod formats;
pub mod imaging;
pub mod output;
