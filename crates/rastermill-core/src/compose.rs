//! Layer compositing: draw one raster over another.
//!
//! The output has the base's logical size and device scale. Layers are
//! drawn source-over into their frames; a frame may extend past the base
//! and is clipped by the surface, not clamped.

use crate::canvas::Canvas;
use crate::raster::Raster;
use crate::transform::upright;
use crate::types::{RasterError, Rect, RenderOptions};

/// Draw `layer` over `base`, stretched into `frame`.
///
/// # Errors
///
/// `InvalidDimension` when `frame` has a zero or negative size.
pub fn overlay(base: &Raster, layer: &Raster, frame: Rect) -> Result<Raster, RasterError> {
    overlay_all_with(base, &[(layer, frame)], &RenderOptions::default())
}

pub fn overlay_with(
    base: &Raster,
    layer: &Raster,
    frame: Rect,
    options: &RenderOptions,
) -> Result<Raster, RasterError> {
    overlay_all_with(base, &[(layer, frame)], options)
}

/// Draw each `(layer, frame)` over `base` in order.
pub fn overlay_all(base: &Raster, layers: &[(&Raster, Rect)]) -> Result<Raster, RasterError> {
    overlay_all_with(base, layers, &RenderOptions::default())
}

pub fn overlay_all_with(
    base: &Raster,
    layers: &[(&Raster, Rect)],
    options: &RenderOptions,
) -> Result<Raster, RasterError> {
    for (_, frame) in layers {
        frame.size().validate()?;
    }

    let src = upright(base)?;
    let out = Canvas::render(src.logical_size(), src.scale(), options, |canvas| {
        canvas.draw_raster(&src, canvas.bounds())?;
        for (layer, frame) in layers {
            let layer = upright(layer)?;
            canvas.draw_raster(&layer, *frame)?;
        }
        Ok(())
    })
    .inspect_err(|e| log::warn!("overlay failed: {}", e))?;

    log::debug!(
        "composited {} layer(s) onto {}x{}",
        layers.len(),
        out.width(),
        out.height()
    );
    Ok(out)
}
