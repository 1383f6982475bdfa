//! The raster type every operation consumes and produces.

use tiny_skia::{ColorU8, IntSize, Pixmap, PremultipliedColorU8};

use crate::transform::Orientation;
use crate::types::{RasterError, Size};

/// An immutable RGBA pixel buffer.
///
/// Pixels are straight (non-premultiplied) RGBA8 in row-major order.
/// `scale` relates pixel size to logical size (2.0 for "retina" assets) and
/// `orientation` records how the stored pixels must be transformed to
/// appear upright.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    scale: f32,
    orientation: Orientation,
}

impl Raster {
    /// Create an upright raster at scale 1.0.
    ///
    /// # Errors
    ///
    /// `InvalidDimension` for a zero dimension, `MalformedPixels` when the
    /// buffer is not `width * height * 4` bytes.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::InvalidDimension {
                width: width as f32,
                height: height as f32,
            });
        }
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(RasterError::MalformedPixels {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
            scale: 1.0,
            orientation: Orientation::Normal,
        })
    }

    /// A raster filled with a single straight RGBA color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self, RasterError> {
        let count = width as usize * height as usize;
        let pixels = rgba.iter().copied().cycle().take(count * 4).collect();
        Self::new(width, height, pixels)
    }

    /// Wrap an `image::RgbaImage`.
    pub fn from_rgba_image(img: image::RgbaImage) -> Result<Self, RasterError> {
        let (width, height) = img.dimensions();
        Self::new(width, height, img.into_raw())
    }

    /// Copy into an `image::RgbaImage` for resampling.
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        // Length is checked in `new`, so from_raw cannot reject the buffer.
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
            .unwrap_or_else(|| image::RgbaImage::new(self.width, self.height))
    }

    /// Replace the device scale. Non-positive or non-finite values fall back to 1.0.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
        self
    }

    /// Replace the orientation tag.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Consume the raster and return its pixel buffer.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Pixel dimensions as floats.
    pub fn pixel_size(&self) -> Size {
        Size::new(self.width as f32, self.height as f32)
    }

    /// Pixel dimensions divided by device scale.
    pub fn logical_size(&self) -> Size {
        Size::new(
            self.width as f32 / self.scale,
            self.height as f32 / self.scale,
        )
    }

    /// RGBA value at `(x, y)`, or `None` outside the raster.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ])
    }

    /// Premultiply into a tiny-skia pixmap for drawing.
    pub(crate) fn to_pixmap(&self) -> Result<Pixmap, RasterError> {
        let size = IntSize::from_wh(self.width, self.height).ok_or_else(|| {
            RasterError::SurfaceAllocation(format!("{}x{}", self.width, self.height))
        })?;
        let mut data = Vec::with_capacity(self.pixels.len());
        for px in self.pixels.chunks_exact(4) {
            let c = ColorU8::from_rgba(px[0], px[1], px[2], px[3]).premultiply();
            data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        Pixmap::from_vec(data, size).ok_or_else(|| {
            RasterError::SurfaceAllocation(format!("{}x{}", self.width, self.height))
        })
    }

    /// Demultiply a finished pixmap back into a raster.
    pub(crate) fn from_pixmap(pixmap: &Pixmap, scale: f32) -> Result<Self, RasterError> {
        let pixels = pixmap
            .pixels()
            .iter()
            .flat_map(|p: &PremultipliedColorU8| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();
        Ok(Self::new(pixmap.width(), pixmap.height(), pixels)?.with_scale(scale))
    }
}
