//! Core geometry, option and error types shared by every operation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for raster operations.
///
/// Every fallible operation returns one of these instead of a placeholder
/// image, so a failure stays visible all the way to the caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RasterError {
    /// A requested or computed size has a zero or negative dimension.
    #[error("Invalid dimension: {width}x{height}")]
    InvalidDimension { width: f32, height: f32 },

    /// The drawing surface could not be constructed.
    #[error("Failed to allocate drawing surface: {0}")]
    SurfaceAllocation(String),

    /// The mask image carries no usable pixel data.
    #[error("Malformed mask image: {0}")]
    MalformedMaskImage(String),

    /// The mask path is empty or encloses no area.
    #[error("Mask path has no drawable area")]
    MalformedPath,

    /// Path data supplied by the caller could not be read.
    #[error("Invalid path segments: {0}")]
    InvalidPath(String),

    /// The pixel buffer length does not match the stated dimensions.
    #[error("Pixel buffer size mismatch: expected {expected} bytes, got {actual}")]
    MalformedPixels { expected: usize, actual: usize },
}

/// Width and height in logical units (pixels divided by device scale).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Both dimensions are strictly positive (and not NaN).
    pub fn is_positive(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Return `self` if both dimensions are positive, otherwise the error
    /// every operation reports for a degenerate size.
    pub fn validate(self) -> Result<Self, RasterError> {
        if self.is_positive() {
            Ok(self)
        } else {
            Err(RasterError::InvalidDimension {
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Like [`Size::validate`], and also rejects a size that rounds to zero
    /// pixels at device `scale`.
    pub fn validate_at(self, scale: f32) -> Result<Self, RasterError> {
        let size = self.validate()?;
        if (size.width * scale).round() < 1.0 || (size.height * scale).round() < 1.0 {
            return Err(RasterError::InvalidDimension {
                width: size.width,
                height: size.height,
            });
        }
        Ok(size)
    }

    /// Width divided by height.
    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }
}

/// An axis-aligned rectangle: origin plus size, in logical units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle at the origin spanning `size`.
    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Shrink by `d` on every side.
    pub fn inset(&self, d: f32) -> Self {
        Self::new(
            self.x + d,
            self.y + d,
            self.width - 2.0 * d,
            self.height - 2.0 * d,
        )
    }

    /// Convert to a tiny-skia rect. `None` when the rect has no area.
    pub(crate) fn to_skia(self) -> Option<tiny_skia::Rect> {
        tiny_skia::Rect::from_xywh(self.x, self.y, self.width, self.height)
    }

    pub(crate) fn from_skia(rect: tiny_skia::Rect) -> Self {
        Self::new(rect.x(), rect.y(), rect.width(), rect.height())
    }
}

/// Border stroked around a masked shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BorderSpec {
    /// Line width in logical units. Zero draws nothing.
    pub width: f32,
    /// Straight RGBA color.
    pub color: [u8; 4],
}

impl BorderSpec {
    pub fn new(width: f32, color: [u8; 4]) -> Self {
        Self { width, color }
    }

    /// No border.
    pub fn none() -> Self {
        Self {
            width: 0.0,
            color: [0, 0, 0, 0],
        }
    }

    pub fn is_visible(&self) -> bool {
        self.width > 0.0
    }
}

impl Default for BorderSpec {
    fn default() -> Self {
        Self::none()
    }
}

/// Filter type for resampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    #[default]
    Bilinear,
    /// Lanczos3 interpolation (slower, highest quality).
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }

    /// Sampling quality used when the canvas draws a raster.
    pub(crate) fn to_skia_quality(self) -> tiny_skia::FilterQuality {
        match self {
            FilterType::Nearest => tiny_skia::FilterQuality::Nearest,
            FilterType::Bilinear => tiny_skia::FilterQuality::Bilinear,
            FilterType::Lanczos3 => tiny_skia::FilterQuality::Bicubic,
        }
    }
}

/// Rendering tunables shared by all operations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Resampling filter for resize and scaled draws.
    #[serde(default)]
    pub filter: FilterType,
    /// Anti-alias clip edges and border strokes.
    #[serde(default = "default_anti_alias")]
    pub anti_alias: bool,
}

fn default_anti_alias() -> bool {
    true
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            filter: FilterType::default(),
            anti_alias: true,
        }
    }
}
