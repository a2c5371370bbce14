//! Codec trait and shared error type.
//!
//! Decoding and encoding are the pipeline's only contact with container
//! formats. The [`ImageCodec`] trait keeps them at arm's length: the pixel
//! stages never see bytes, and tests swap in a mock that records calls.
//!
//! The production implementation is
//! [`RustCodec`](super::rust_backend::RustCodec), built on the `image` crate.

use super::params::Quality;
use super::raster::RasterBuffer;
use crate::formats::MediaType;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImagingError {
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("Invalid kernel: {0} weights do not form an odd square")]
    InvalidKernel(usize),
    #[error("Buffer length mismatch: expected {expected} samples, got {actual}")]
    BufferLengthMismatch { expected: usize, actual: usize },
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
    #[error("Invalid crop region: {0}")]
    InvalidCrop(String),
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("Decoding failed: {0}")]
    DecodingFailed(String),
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// Output of a decode: pixels plus the size of the encoded input.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub buffer: RasterBuffer,
    /// Length in bytes of the encoded source, reported as the original size.
    pub original_size: usize,
}

/// Decoder/encoder pair used by the pipeline.
///
/// `Sync` so a single codec can be shared by every worker in a batch.
pub trait ImageCodec: Sync {
    /// Decode encoded bytes of the given media type into an RGBA buffer.
    fn decode(&self, bytes: &[u8], media_type: MediaType) -> Result<Decoded, ImagingError>;

    /// Encode a buffer at the given quality.
    fn encode(&self, buffer: &RasterBuffer, quality: Quality) -> Result<Vec<u8>, ImagingError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mock codec that records operations instead of touching real formats.
    ///
    /// Every decode yields a uniform gray buffer of `decode_size`; every
    /// encode yields `encoded_len` zero bytes. Uses Mutex (not RefCell) so
    /// it is Sync and works with rayon's par_iter.
    pub struct MockCodec {
        pub decode_size: (u32, u32),
        pub encoded_len: usize,
        pub fail_encode: bool,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Decode {
            len: usize,
            media_type: MediaType,
        },
        Encode {
            width: u32,
            height: u32,
            quality: f32,
        },
    }

    impl Default for MockCodec {
        fn default() -> Self {
            Self::with_size(64, 48)
        }
    }

    impl MockCodec {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_size(width: u32, height: u32) -> Self {
            Self {
                decode_size: (width, height),
                encoded_len: 100,
                fail_encode: false,
                operations: Mutex::new(Vec::new()),
            }
        }

        pub fn failing_encode() -> Self {
            Self {
                fail_encode: true,
                ..Self::default()
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }
    }

    impl ImageCodec for MockCodec {
        fn decode(&self, bytes: &[u8], media_type: MediaType) -> Result<Decoded, ImagingError> {
            self.operations.lock().unwrap().push(RecordedOp::Decode {
                len: bytes.len(),
                media_type,
            });
            let (w, h) = self.decode_size;
            Ok(Decoded {
                buffer: RasterBuffer::filled(w, h, [128, 128, 128, 255]),
                original_size: bytes.len(),
            })
        }

        fn encode(&self, buffer: &RasterBuffer, quality: Quality) -> Result<Vec<u8>, ImagingError> {
            self.operations.lock().unwrap().push(RecordedOp::Encode {
                width: buffer.width(),
                height: buffer.height(),
                quality: quality.value(),
            });
            if self.fail_encode {
                return Err(ImagingError::EncodingFailed("mock failure".into()));
            }
            Ok(vec![0; self.encoded_len])
        }
    }

    #[test]
    fn mock_records_decode() {
        let codec = MockCodec::with_size(800, 600);
        let decoded = codec.decode(&[1, 2, 3], MediaType::Png).unwrap();
        assert_eq!(decoded.buffer.dimensions(), (800, 600));
        assert_eq!(decoded.original_size, 3);

        let ops = codec.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(
            &ops[0],
            RecordedOp::Decode {
                len: 3,
                media_type: MediaType::Png
            }
        ));
    }

    #[test]
    fn mock_records_encode() {
        let codec = MockCodec::new();
        let buf = RasterBuffer::filled(10, 5, [0, 0, 0, 255]);
        let bytes = codec.encode(&buf, Quality::new(0.8).unwrap()).unwrap();
        assert_eq!(bytes.len(), 100);
        assert!(matches!(
            &codec.get_operations()[0],
            RecordedOp::Encode {
                width: 10,
                height: 5,
                ..
            }
        ));
    }

    #[test]
    fn mock_can_fail_encode() {
        let codec = MockCodec::failing_encode();
        let buf = RasterBuffer::filled(1, 1, [0, 0, 0, 255]);
        assert!(matches!(
            codec.encode(&buf, Quality::default()),
            Err(ImagingError::EncodingFailed(_))
        ));
    }
}
