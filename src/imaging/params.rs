//! Parameter types supplied once per image.
//!
//! - [`Quality`] — lossy encoding quality in `(0, 1]`. Validated on construction.
//! - [`ProcessingParameters`] — quality, longest-edge bound, and the enhance flag.

use super::backend::ImagingError;
use serde::{Deserialize, Serialize};

/// Quality setting for lossy encoding, in `(0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct Quality(f32);

impl Quality {
    pub fn new(value: f32) -> Result<Self, ImagingError> {
        if value.is_finite() && value > 0.0 && value <= 1.0 {
            Ok(Self(value))
        } else {
            Err(ImagingError::InvalidParameters(format!(
                "quality must be in (0, 1], got {value}"
            )))
        }
    }

    pub fn value(self) -> f32 {
        self.0
    }

    /// Integer quality on the 1–100 scale JPEG encoders expect.
    pub fn percent(self) -> u8 {
        (self.0 * 100.0).round().clamp(1.0, 100.0) as u8
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(0.9)
    }
}

impl TryFrom<f32> for Quality {
    type Error = ImagingError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quality> for f32 {
    fn from(q: Quality) -> f32 {
        q.0
    }
}

/// Per-image processing request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProcessingParameters {
    pub quality: Quality,
    /// Upper bound for both output dimensions, in pixels.
    pub max_dimension: u32,
    /// Run color correction and sharpening after resizing.
    pub enhance: bool,
}

impl ProcessingParameters {
    pub fn new(quality: f32, max_dimension: u32, enhance: bool) -> Result<Self, ImagingError> {
        let params = Self {
            quality: Quality::new(quality)?,
            max_dimension,
            enhance,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ImagingError> {
        if self.max_dimension == 0 {
            return Err(ImagingError::InvalidParameters(
                "max dimension must be positive".into(),
            ));
        }
        Ok(())
    }
}

impl Default for ProcessingParameters {
    fn default() -> Self {
        Self {
            quality: Quality::default(),
            max_dimension: 2048,
            enhance: false,
        }
    }
}
