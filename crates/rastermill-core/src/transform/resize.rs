//! Aspect-ratio-aware resizing under three fit policies.
//!
//! The source is first normalized upright, then scaled by a single ratio
//! chosen per [`FitMode`], then finished per mode:
//!
//! ```text
//!   Clip   fit inside the target, keep aspect      -> <= target
//!   Crop   fill the target, trim the centered excess -> == target
//!   Scale  fill the target, stretch to exact size   -> == target
//! ```
//!
//! Sizes are logical (pixels / device scale); the output keeps the source's
//! device scale.

use image::imageops;
use serde::{Deserialize, Serialize};

use super::orientation::upright;
use crate::raster::Raster;
use crate::types::{RasterError, RenderOptions, Size};

/// Resize policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FitMode {
    /// Fit entirely within the target, preserving aspect ratio.
    #[default]
    Clip,
    /// Fill the target and crop the overflow around the center.
    Crop,
    /// Stretch to exactly the target, ignoring aspect ratio.
    Scale,
}

impl FitMode {
    /// Ratio selection table: Clip takes the smaller ratio so the result
    /// fits, Crop and Scale take the larger so the target is covered.
    pub fn scale_ratio(self, width_ratio: f32, height_ratio: f32) -> f32 {
        match self {
            FitMode::Clip => width_ratio.min(height_ratio),
            FitMode::Crop | FitMode::Scale => width_ratio.max(height_ratio),
        }
    }
}

/// Size of the intermediate scaled image for `original` under `mode`.
///
/// Each dimension is `original * ratio` rounded half away from zero, and
/// never below one unit.
pub fn scaled_size(original: Size, target: Size, mode: FitMode) -> Size {
    let ratio = mode.scale_ratio(
        target.width / original.width,
        target.height / original.height,
    );
    Size::new(
        (original.width * ratio).round().max(1.0),
        (original.height * ratio).round().max(1.0),
    )
}

/// Resize `raster` to `target` with default options.
///
/// # Errors
///
/// `InvalidDimension` if either target dimension is zero or negative, or
/// rounds to zero pixels at the raster's device scale.
pub fn resize(raster: &Raster, target: Size, mode: FitMode) -> Result<Raster, RasterError> {
    resize_with(raster, target, mode, &RenderOptions::default())
}

/// Resize `raster` to `target` using the filter in `options`.
///
/// Crop and Scale always produce exactly `target`; Clip produces a size
/// where one dimension matches the target and the other is no larger.
pub fn resize_with(
    raster: &Raster,
    target: Size,
    mode: FitMode,
    options: &RenderOptions,
) -> Result<Raster, RasterError> {
    let target = target.validate_at(raster.scale()).inspect_err(|e| {
        log::warn!("resize rejected: {}", e);
    })?;
    let src = upright(raster)?;
    let scaled = resample(&src, scaled_size(src.logical_size(), target, mode), options)?;

    let out = match mode {
        FitMode::Clip => scaled,
        FitMode::Crop => crop_centered(&scaled, target)?,
        FitMode::Scale => resample(&scaled, target, options)?,
    };

    log::debug!(
        "resize {:?}: {}x{} -> {}x{}",
        mode,
        raster.width(),
        raster.height(),
        out.width(),
        out.height()
    );
    Ok(out)
}

/// Resize so the longest edge is at most `max_edge`, preserving aspect ratio.
///
/// Rasters that already fit come back upright but otherwise unchanged.
pub fn resize_to_fit(raster: &Raster, max_edge: f32) -> Result<Raster, RasterError> {
    resize_to_fit_with(raster, max_edge, &RenderOptions::default())
}

pub fn resize_to_fit_with(
    raster: &Raster,
    max_edge: f32,
    options: &RenderOptions,
) -> Result<Raster, RasterError> {
    let bound = Size::new(max_edge, max_edge).validate_at(raster.scale())?;
    let src = upright(raster)?;
    let size = src.logical_size();
    if size.width <= bound.width && size.height <= bound.height {
        return Ok(src.into_owned());
    }
    resize_with(&src, bound, FitMode::Clip, options)
}

/// Pixel dimensions of a logical size at `scale`, at least one pixel each.
fn pixel_dimensions(size: Size, scale: f32) -> (u32, u32) {
    (
        (size.width * scale).round().max(1.0) as u32,
        (size.height * scale).round().max(1.0) as u32,
    )
}

/// Draw `raster` stretched into a new buffer of logical `size`.
fn resample(raster: &Raster, size: Size, options: &RenderOptions) -> Result<Raster, RasterError> {
    let (width, height) = pixel_dimensions(size, raster.scale());

    // Fast path: if dimensions match, just clone
    if raster.width() == width && raster.height() == height {
        return Ok(raster.clone());
    }

    let resized = imageops::resize(
        &raster.to_rgba_image(),
        width,
        height,
        options.filter.to_image_filter(),
    );
    Ok(Raster::from_rgba_image(resized)?.with_scale(raster.scale()))
}

/// Take the centered `target` window out of `raster`.
///
/// When the window is larger than the source on an axis the origin goes
/// negative and the uncovered margin stays transparent.
fn crop_centered(raster: &Raster, target: Size) -> Result<Raster, RasterError> {
    let (width, height) = pixel_dimensions(target, raster.scale());
    if raster.width() == width && raster.height() == height {
        return Ok(raster.clone());
    }

    let offset_x = (raster.width() as i64 - width as i64) / 2;
    let offset_y = (raster.height() as i64 - height as i64) / 2;

    let mut out = image::RgbaImage::new(width, height);
    imageops::replace(&mut out, &raster.to_rgba_image(), -offset_x, -offset_y);
    Ok(Raster::from_rgba_image(out)?.with_scale(raster.scale()))
}


// ============================================================================
// Property-Based Tests
// ============================================================================
