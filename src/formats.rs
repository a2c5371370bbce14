//! Input format acceptance.
//!
//! Every input is screened before any pixels are decoded: the media type
//! must be one we know, and the file must fit under the size limit.
//!
//! ## Accepted types
//!
//! | Media type | Extensions | Built-in decode |
//! |---|---|---|
//! | `image/jpeg` (also `image/jpg`, `image/jfif`) | jpg, jpeg, jfif | yes |
//! | `image/png` | png | yes |
//! | `image/bmp` | bmp | yes |
//! | `image/webp` | webp | yes |
//! | `image/tiff` | tif, tiff | yes |
//! | `image/svg+xml` | svg | needs conversion |
//! | `image/heic`, `image/heif` | heic, heif | needs conversion |
//!
//! A declared media type wins over the extension. Types flagged as needing
//! conversion are accepted here so that a converting [`ImageCodec`](crate::imaging::ImageCodec)
//! can handle them; the built-in codec reports them as unsupported.

use serde::Serialize;
use std::path::Path;
use thiserror::Error;

/// Default upper bound on input file size: 50 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("Unsupported file type: {0}")]
    Unsupported(String),
    #[error("File too large: {size} bytes (limit {limit} bytes)")]
    TooLarge { size: u64, limit: u64 },
}

/// An image media type the pipeline knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "&'static str")]
pub enum MediaType {
    Jpeg,
    Png,
    Bmp,
    WebP,
    Tiff,
    Svg,
    Heic,
    Heif,
}

impl MediaType {
    /// Parse a MIME string such as `image/jpeg`. Case-insensitive.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let lower = mime.trim().to_ascii_lowercase();
        Some(match lower.as_str() {
            "image/jpeg" | "image/jpg" | "image/jfif" | "image/pjpeg" => Self::Jpeg,
            "image/png" => Self::Png,
            "image/bmp" => Self::Bmp,
            "image/webp" => Self::WebP,
            "image/tiff" => Self::Tiff,
            "image/svg+xml" => Self::Svg,
            "image/heic" => Self::Heic,
            "image/heif" => Self::Heif,
            _ => return None,
        })
    }

    /// Map a file extension (without the dot) to a media type.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let lower = ext.to_ascii_lowercase();
        Some(match lower.as_str() {
            "jpg" | "jpeg" | "jfif" => Self::Jpeg,
            "png" => Self::Png,
            "bmp" => Self::Bmp,
            "webp" => Self::WebP,
            "tif" | "tiff" => Self::Tiff,
            "svg" => Self::Svg,
            "heic" => Self::Heic,
            "heif" => Self::Heif,
            _ => return None,
        })
    }

    /// Derive the media type from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Canonical MIME string.
    pub fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Bmp => "image/bmp",
            Self::WebP => "image/webp",
            Self::Tiff => "image/tiff",
            Self::Svg => "image/svg+xml",
            Self::Heic => "image/heic",
            Self::Heif => "image/heif",
        }
    }

    /// The `image` crate format used to decode this type, if it has one.
    pub fn image_format(self) -> Option<image::ImageFormat> {
        match self {
            Self::Jpeg => Some(image::ImageFormat::Jpeg),
            Self::Png => Some(image::ImageFormat::Png),
            Self::Bmp => Some(image::ImageFormat::Bmp),
            Self::WebP => Some(image::ImageFormat::WebP),
            Self::Tiff => Some(image::ImageFormat::Tiff),
            Self::Svg | Self::Heic | Self::Heif => None,
        }
    }

    /// True for types that must be converted before pixels are available.
    pub fn needs_conversion(self) -> bool {
        self.image_format().is_none()
    }
}

impl From<MediaType> for &'static str {
    fn from(media_type: MediaType) -> Self {
        media_type.mime()
    }
}

impl std::str::FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_mime(s).ok_or_else(|| format!("unsupported media type '{s}'"))
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mime())
    }
}

/// Resolve the media type of an input.
///
/// The declared type takes precedence; without one the extension decides.
pub fn resolve_media_type(
    declared: Option<MediaType>,
    path: &Path,
) -> Result<MediaType, InputError> {
    match declared {
        Some(media_type) => Ok(media_type),
        None => MediaType::from_path(path).ok_or_else(|| {
            let ext = path
                .extension()
                .map(|e| e.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            InputError::Unsupported(if ext.is_empty() {
                path.display().to_string()
            } else {
                format!("image/{}", ext)
            })
        }),
    }
}

/// Reject inputs over `limit` bytes.
pub fn check_size(size: u64, limit: u64) -> Result<(), InputError> {
    if size > limit {
        Err(InputError::TooLarge { size, limit })
    } else {
        Ok(())
    }
}

/// Screen one input: known media type and within the size limit.
pub fn validate_input(
    path: &Path,
    size: u64,
    limit: u64,
    declared: Option<MediaType>,
) -> Result<MediaType, InputError> {
    let media_type = resolve_media_type(declared, path)?;
    check_size(size, limit)?;
    Ok(media_type)
}
