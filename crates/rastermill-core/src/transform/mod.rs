//! Geometric transforms: orientation normalization and resizing.
//!
//! # Transform Order
//!
//! Every operation that reads source pixels first brings them upright:
//! 1. Orientation (EXIF tag baked into the buffer)
//! 2. The operation itself (resize, mask, overlay)
//!
//! # Coordinate System
//!
//! - Sizes and rects are logical units (pixels / device scale)
//! - Origin is top-left corner

mod orientation;
mod resize;

pub use orientation::{normalize_orientation, Orientation};
pub use resize::{resize, resize_to_fit, resize_to_fit_with, resize_with, scaled_size, FitMode};

pub(crate) use orientation::upright;
