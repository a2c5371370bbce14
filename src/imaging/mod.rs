//! Image processing — pixel stages plus a pluggable codec.
//!
//! | Stage | Module |
//! |---|---|
//! | **Statistics** | [`statistics::analyze`] — mean brightness and contrast |
//! | **Color** | [`color`] — brightness, contrast, saturation in place |
//! | **Convolution** | [`convolution::convolve`] — zero-padded NxN filter |
//! | **Enhance** | [`enhance::enhance`] — color correction + texture + sharpen |
//! | **Resize** | [`resize::resize_to_fit`] — longest-edge bound, Lanczos3 |
//! | **Crop** | [`crop::crop`] — region extraction ahead of the pipeline |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing a processing request
//! - **Backend**: [`ImageCodec`] trait + [`RustCodec`]
//! - **Operations**: High-level functions combining stages + codec

pub mod backend;
mod calculations;
pub mod color;
pub mod convolution;
pub mod crop;
pub mod enhance;
pub mod operations;
mod params;
pub mod raster;
pub mod resize;
pub mod rust_backend;
pub mod statistics;

pub use backend::{Decoded, ImageCodec, ImagingError};
pub use calculations::{CropRegion, calculate_fit_dimensions};
pub use operations::{ProcessingResult, process_buffer, process_decoded, process_image};
pub use params::{ProcessingParameters, Quality};
pub use raster::{Kernel, RasterBuffer};
pub use rust_backend::RustCodec;
pub use statistics::ImageStatistics;
