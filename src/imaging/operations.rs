//! High-level image operations.
//!
//! These functions chain the pixel stages with codec calls:
//!
//! ```text
//! decode → resize → [enhance] → encode → ProcessingResult
//! ```

use super::backend::{Decoded, ImageCodec, ImagingError};
use super::enhance::enhance;
use super::params::ProcessingParameters;
use super::raster::RasterBuffer;
use super::resize::resize_to_fit;
use crate::formats::MediaType;
use tracing::{debug, instrument};

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, ImagingError>;

/// Outcome of processing one image. Owned entirely by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingResult {
    /// Final pixels, after resize and optional enhancement.
    pub buffer: RasterBuffer,
    /// Encoded output bytes.
    pub encoded: Vec<u8>,
    /// Encoded input length in bytes.
    pub original_size: usize,
    /// Encoded output length in bytes.
    pub processed_size: usize,
    pub width: u32,
    pub height: u32,
}

/// Resize and, when requested, enhance a decoded buffer.
pub fn process_buffer(buffer: RasterBuffer, params: &ProcessingParameters) -> Result<RasterBuffer> {
    params.validate()?;
    let resized = resize_to_fit(buffer, params.max_dimension)?;
    Ok(if params.enhance {
        enhance(resized)
    } else {
        resized
    })
}

/// Run the pixel pipeline on already-decoded input and encode the result.
#[instrument(skip_all, fields(original_size = decoded.original_size))]
pub fn process_decoded(
    codec: &impl ImageCodec,
    decoded: Decoded,
    params: &ProcessingParameters,
) -> Result<ProcessingResult> {
    let Decoded {
        buffer,
        original_size,
    } = decoded;
    let buffer = process_buffer(buffer, params)?;
    let encoded = codec.encode(&buffer, params.quality)?;
    let (width, height) = buffer.dimensions();
    debug!(width, height, processed_size = encoded.len(), "Encoded");

    Ok(ProcessingResult {
        buffer,
        processed_size: encoded.len(),
        encoded,
        original_size,
        width,
        height,
    })
}

/// Decode, process, and encode one image.
pub fn process_image(
    codec: &impl ImageCodec,
    bytes: &[u8],
    media_type: MediaType,
    params: &ProcessingParameters,
) -> Result<ProcessingResult> {
    params.validate()?;
    let decoded = codec.decode(bytes, media_type)?;
    process_decoded(codec, decoded, params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockCodec, RecordedOp};
    use crate::imaging::params::Quality;

    fn params(max_dimension: u32, enhance: bool) -> ProcessingParameters {
        ProcessingParameters {
            quality: Quality::new(0.75).unwrap(),
            max_dimension,
            enhance,
        }
    }

    #[test]
    fn process_buffer_without_enhance_is_identity_when_fitting() {
        let buf = RasterBuffer::filled(200, 100, [128, 128, 128, 255]);
        let out = process_buffer(buf.clone(), &params(1000, false)).unwrap();
        assert_eq!(out, buf);
    }

    #[test]
    fn process_buffer_with_enhance_changes_pixels() {
        let buf = RasterBuffer::filled(200, 100, [128, 128, 128, 255]);
        let out = process_buffer(buf, &params(1000, true)).unwrap();
        assert_eq!(out.pixel(100, 50), [255, 255, 255, 255]);
    }

    #[test]
    fn process_buffer_rejects_empty() {
        let buf = RasterBuffer::from_raw(0, 3, Vec::new()).unwrap();
        assert!(matches!(
            process_buffer(buf, &params(10, true)),
            Err(ImagingError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn process_image_reports_sizes() {
        let codec = MockCodec::with_size(4000, 2000);
        let result = process_image(&codec, &[7; 321], MediaType::Jpeg, &params(800, false)).unwrap();

        assert_eq!(result.original_size, 321);
        assert_eq!(result.processed_size, 100);
        assert_eq!(result.encoded.len(), 100);
        assert_eq!((result.width, result.height), (800, 400));
        assert_eq!(result.buffer.dimensions(), (800, 400));
    }

    #[test]
    fn process_image_calls_codec_in_order() {
        let codec = MockCodec::with_size(50, 40);
        process_image(&codec, &[1, 2], MediaType::Png, &params(100, true)).unwrap();

        let ops = codec.get_operations();
        assert_eq!(ops.len(), 2);
        assert!(matches!(
            &ops[0],
            RecordedOp::Decode {
                len: 2,
                media_type: MediaType::Png
            }
        ));
        assert!(matches!(
            &ops[1],
            RecordedOp::Encode {
                width: 50,
                height: 40,
                quality
            } if *quality == 0.75
        ));
    }

    #[test]
    fn process_image_propagates_encoding_failure() {
        let codec = MockCodec::failing_encode();
        let result = process_image(&codec, &[0], MediaType::Jpeg, &params(100, false));
        assert!(matches!(result, Err(ImagingError::EncodingFailed(_))));
    }

    #[test]
    fn process_image_rejects_invalid_params_before_decoding() {
        let codec = MockCodec::new();
        let result = process_image(&codec, &[0], MediaType::Jpeg, &params(0, false));
        assert!(matches!(result, Err(ImagingError::InvalidParameters(_))));
        assert!(codec.get_operations().is_empty());
    }
}
