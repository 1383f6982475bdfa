//! Rastermill WASM - WebAssembly bindings for Rastermill
//!
//! This crate exposes the rastermill-core operations to JavaScript/TypeScript,
//! both as free functions and as a chainable `JsPipeline`.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible raster wrapper and parameter conversions
//! - `ops` - One free function per operation (resize, masks, overlay)
//! - `pipeline` - Chainable pipeline object
//! - `logging` - Browser console logger
//!
//! # Usage
//!
//! ```typescript
//! import init, { init_logging, JsPipeline, JsRaster } from '@rastermill/wasm';
//!
//! await init();
//! init_logging('debug');
//!
//! const photo = new JsRaster(width, height, rgbaBytes);
//! const avatar = new JsPipeline(photo)
//!   .resize(256, 256, 1)                 // Crop
//!   .mask_circle(4, 0xffffffff)          // white 4px border
//!   .finish();
//! ```

use wasm_bindgen::prelude::*;

mod logging;
mod ops;
mod pipeline;
mod types;

pub use logging::init_logging;
pub use ops::{
    mask_circle, mask_ellipse, mask_image, mask_path, mask_path_with, mask_rounded_rect,
    mask_stencil, normalize_orientation, overlay, resize, resize_to_fit,
};
pub use pipeline::JsPipeline;
pub use types::JsRaster;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    // Logging stays off until the host calls init_logging
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
