//! Pure calculation functions for image dimensions and regions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Calculate output dimensions that fit within `max_dimension` on both axes.
///
/// Images that already fit are returned unchanged. Otherwise the longer edge
/// becomes `max_dimension` and the shorter edge is scaled by the same factor,
/// truncated toward zero (never below 1 pixel). Square images scale on both
/// edges equally.
///
/// # Arguments
/// * `source` - Original image dimensions (width, height)
/// * `max_dimension` - Upper bound for either edge
///
/// # Returns
/// * `(width, height)` - Fitted dimensions
///
/// # Examples
/// ```
/// # use batchpix::imaging::calculate_fit_dimensions;
/// // 4000x2000 landscape into 800 → 800x400
/// assert_eq!(calculate_fit_dimensions((4000, 2000), 800), (800, 400));
///
/// // Already fits → unchanged
/// assert_eq!(calculate_fit_dimensions((640, 480), 1000), (640, 480));
/// ```
pub fn calculate_fit_dimensions(source: (u32, u32), max_dimension: u32) -> (u32, u32) {
    let (src_w, src_h) = source;

    if src_w <= max_dimension && src_h <= max_dimension {
        return source;
    }

    if src_w > src_h {
        // Landscape: width is the long edge
        (max_dimension, scaled(src_h, max_dimension, src_w))
    } else {
        // Portrait or square: height is the long edge
        (scaled(src_w, max_dimension, src_h), max_dimension)
    }
}

/// `edge * max / long`, truncated. Integer math keeps exact ratios exact.
fn scaled(edge: u32, max_dimension: u32, long_edge: u32) -> u32 {
    ((edge as u64 * max_dimension as u64 / long_edge as u64) as u32).max(1)
}

/// A rectangular region in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRegion {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Region spanned by two corner points given in any order, such as the
    /// start and end of a pointer drag.
    pub fn from_corners(start: (u32, u32), end: (u32, u32)) -> Self {
        let x = start.0.min(end.0);
        let y = start.1.min(end.1);
        Self {
            x,
            y,
            width: start.0.max(end.0) - x,
            height: start.1.max(end.1) - y,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// True when the region lies entirely inside an image of the given size.
    pub fn fits_within(&self, dimensions: (u32, u32)) -> bool {
        let (w, h) = dimensions;
        self.x as u64 + self.width as u64 <= w as u64
            && self.y as u64 + self.height as u64 <= h as u64
    }
}

impl std::str::FromStr for CropRegion {
    type Err = String;

    /// Parse `x,y,width,height`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<u32> = s
            .split(',')
            .map(|p| p.trim().parse::<u32>())
            .collect::<Result<_, _>>()
            .map_err(|e| format!("invalid crop region {s:?}: {e}"))?;
        match parts.as_slice() {
            [x, y, w, h] => Ok(Self::new(*x, *y, *w, *h)),
            _ => Err(format!(
                "invalid crop region {s:?}: expected x,y,width,height"
            )),
        }
    }
}
