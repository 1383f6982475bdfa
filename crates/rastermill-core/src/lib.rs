//! Rastermill Core - Raster transformation library
//!
//! This crate provides the image operations behind Rastermill: orientation
//! normalization, resizing under Clip/Crop/Scale policies, shape, path and
//! stencil masks, layer compositing, and a chainable [`Pipeline`] over all
//! of them.
//!
//! All operations take an immutable [`Raster`] and return a new one. Sizes
//! are logical units; a raster's device scale maps them to pixels.

pub mod canvas;
pub mod compose;
pub mod luminance;
pub mod mask;
pub mod pipeline;
pub mod raster;
pub mod transform;
pub mod types;

pub use canvas::Canvas;
pub use compose::{overlay, overlay_all, overlay_all_with, overlay_with};
pub use mask::{
    mask_circle, mask_circle_with, mask_ellipse, mask_ellipse_with, mask_image, mask_path,
    mask_path_with, mask_rounded_rect, mask_rounded_rect_with, mask_stencil, MaskPath,
    PathSegment, StencilMask,
};
pub use pipeline::Pipeline;
pub use raster::Raster;
pub use transform::{
    normalize_orientation, resize, resize_to_fit, resize_to_fit_with, resize_with, scaled_size,
    FitMode, Orientation,
};
pub use types::{BorderSpec, FilterType, RasterError, Rect, RenderOptions, Size};
