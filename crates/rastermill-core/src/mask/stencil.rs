//! Stencil (image-based) masks.
//!
//! A second image acts as a stencil over the source: black samples fully
//! reveal it, white samples fully hide it, and gray yields a proportional
//! alpha of `1 - sample`. The stencil is stretched to the source's pixel
//! size when their dimensions differ.

use image::{imageops, GrayImage};

use crate::canvas::Canvas;
use crate::luminance::gray_over_white;
use crate::raster::Raster;
use crate::transform::upright;
use crate::types::{RasterError, RenderOptions};

/// 8-bit gray stencil samples (0 = reveal, 255 = hide).
#[derive(Debug, Clone, PartialEq)]
pub struct StencilMask {
    samples: GrayImage,
}

impl StencilMask {
    /// Build a stencil from raw 8-bit gray rows.
    ///
    /// `bytes_per_row` may exceed `width` for padded rows; padding is ignored.
    ///
    /// # Errors
    ///
    /// `MalformedMaskImage` when a dimension is zero, the stride is shorter
    /// than a row, or `data` is too short for the described layout.
    pub fn from_gray(
        width: u32,
        height: u32,
        bytes_per_row: usize,
        data: &[u8],
    ) -> Result<Self, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::MalformedMaskImage(format!(
                "empty mask {}x{}",
                width, height
            )));
        }
        let row = width as usize;
        if bytes_per_row < row {
            return Err(RasterError::MalformedMaskImage(format!(
                "stride {} shorter than row of {}",
                bytes_per_row, row
            )));
        }
        let needed = bytes_per_row * (height as usize - 1) + row;
        if data.len() < needed {
            return Err(RasterError::MalformedMaskImage(format!(
                "expected at least {} bytes, got {}",
                needed,
                data.len()
            )));
        }

        let mut samples = Vec::with_capacity(row * height as usize);
        for line in data.chunks(bytes_per_row).take(height as usize) {
            samples.extend_from_slice(&line[..row]);
        }
        Self::from_samples(width, height, samples)
    }

    /// Build a stencil from an RGBA raster's luminance.
    ///
    /// Transparent areas count as white, so they hide the source.
    pub fn from_raster(mask: &Raster) -> Result<Self, RasterError> {
        let samples = mask
            .pixels()
            .chunks_exact(4)
            .map(|px| gray_over_white(px[0], px[1], px[2], px[3]))
            .collect();
        Self::from_samples(mask.width(), mask.height(), samples)
    }

    fn from_samples(width: u32, height: u32, samples: Vec<u8>) -> Result<Self, RasterError> {
        GrayImage::from_raw(width, height, samples)
            .map(|samples| Self { samples })
            .ok_or_else(|| RasterError::MalformedMaskImage("sample count mismatch".to_string()))
    }

    pub fn width(&self) -> u32 {
        self.samples.width()
    }

    pub fn height(&self) -> u32 {
        self.samples.height()
    }

    /// Per-pixel coverage for a `width` x `height` surface (255 = reveal).
    fn coverage(&self, width: u32, height: u32, options: &RenderOptions) -> Vec<u8> {
        let stretched;
        let samples = if self.samples.dimensions() == (width, height) {
            &self.samples
        } else {
            stretched = imageops::resize(
                &self.samples,
                width,
                height,
                options.filter.to_image_filter(),
            );
            &stretched
        };
        samples.as_raw().iter().map(|&s| 255 - s).collect()
    }
}

/// Mask `raster` by the luminance of `mask`.
pub fn mask_image(raster: &Raster, mask: &Raster) -> Result<Raster, RasterError> {
    mask_stencil(raster, &StencilMask::from_raster(mask)?, &RenderOptions::default())
}

/// Mask `raster` by a prepared stencil.
///
/// Stencil row 0 lines up with source row 0; both use a top-left origin.
pub fn mask_stencil(
    raster: &Raster,
    stencil: &StencilMask,
    options: &RenderOptions,
) -> Result<Raster, RasterError> {
    let src = upright(raster)?;
    Canvas::render(src.logical_size(), src.scale(), options, |canvas| {
        let (width, height) = canvas.pixel_dimensions();
        canvas.clip_coverage(stencil.coverage(width, height, options))?;
        canvas.draw_raster(&src, canvas.bounds())
    })
    .inspect_err(|e| log::warn!("image mask failed: {}", e))
}
