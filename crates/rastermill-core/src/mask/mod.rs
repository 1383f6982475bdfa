//! Geometric and image-based masks.
//!
//! Every mask brings the source upright, allocates a canvas of the source's
//! logical size at its device scale, clips, and draws the source through
//! the clip. Pixels outside the shape come out fully transparent.
//!
//! ## Mask Types
//!
//! - **Ellipse / Circle**: inscribed ellipse, optional inset border
//! - **Rounded Rect**: corner-radius rectangle, optional border
//! - **Path**: caller-supplied contour fitted into the output rect
//! - **Stencil**: a second image whose gray level hides the source

pub mod path;
pub mod shape;
pub mod stencil;

pub use path::{fit_transform, mask_path, mask_path_with, MaskPath, PathSegment};
pub use shape::{
    mask_circle, mask_circle_with, mask_ellipse, mask_ellipse_with, mask_rounded_rect,
    mask_rounded_rect_with,
};
pub use stencil::{mask_image, mask_stencil, StencilMask};
