//! WASM-compatible wrapper types for raster data.
//!
//! This module provides the JavaScript-facing raster type and the small
//! conversions from plain numbers to core parameter types.

use rastermill_core::{
    BorderSpec, FilterType, FitMode, Orientation, Raster, RasterError, Rect, RenderOptions,
};
use wasm_bindgen::prelude::*;

/// A raster wrapper for JavaScript.
///
/// Pixels are straight RGBA (4 bytes per pixel, row-major). The buffer is
/// validated when the raster is passed to an operation, not at construction.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. `pixels()` copies it out to a
/// `Uint8Array`. `free()` releases the WASM copy early; otherwise the
/// wasm-bindgen finalizer does it.
#[wasm_bindgen]
pub struct JsRaster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    scale: f32,
    orientation: u8,
}

#[wasm_bindgen]
impl JsRaster {
    /// Create an upright raster at device scale 1.
    ///
    /// # Arguments
    /// * `width` - Width in pixels
    /// * `height` - Height in pixels
    /// * `pixels` - RGBA pixel data (4 bytes per pixel, row-major order)
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsRaster {
        JsRaster {
            width,
            height,
            pixels,
            scale: 1.0,
            orientation: Orientation::Normal as u8,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Device scale (pixels per logical unit)
    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    #[wasm_bindgen(setter)]
    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }

    /// EXIF orientation tag (1-8)
    #[wasm_bindgen(getter)]
    pub fn orientation(&self) -> u8 {
        self.orientation
    }

    #[wasm_bindgen(setter)]
    pub fn set_orientation(&mut self, orientation: u8) {
        self.orientation = Orientation::from(orientation as u32) as u8;
    }

    /// Number of bytes in the pixel buffer (width * height * 4)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGBA pixel data as Uint8Array (a copy).
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Explicitly free WASM memory.
    pub fn free(self) {}
}

impl JsRaster {
    pub(crate) fn from_core(raster: Raster) -> Self {
        let (width, height) = (raster.width(), raster.height());
        let scale = raster.scale();
        let orientation = raster.orientation() as u8;
        Self {
            width,
            height,
            pixels: raster.into_pixels(),
            scale,
            orientation,
        }
    }

    /// Convert to a core raster. Clones the pixel data.
    pub(crate) fn to_core(&self) -> Result<Raster, RasterError> {
        Ok(Raster::new(self.width, self.height, self.pixels.clone())?
            .with_scale(self.scale)
            .with_orientation(Orientation::from(self.orientation as u32)))
    }
}

pub(crate) fn to_js_error(err: RasterError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Convert a u8 filter value to the core FilterType.
///
/// Values:
/// - 0 = Nearest
/// - 1 = Bilinear
/// - 2 = Lanczos3
///
/// Any other value defaults to Bilinear.
pub(crate) fn filter_from_u8(value: u8) -> FilterType {
    match value {
        0 => FilterType::Nearest,
        2 => FilterType::Lanczos3,
        _ => FilterType::Bilinear,
    }
}

/// Convert a u8 fit mode value to the core FitMode.
///
/// Values: 0 = Clip, 1 = Crop, 2 = Scale. Any other value defaults to Clip.
pub(crate) fn fit_mode_from_u8(value: u8) -> FitMode {
    match value {
        1 => FitMode::Crop,
        2 => FitMode::Scale,
        _ => FitMode::Clip,
    }
}

pub(crate) fn options(filter: u8, anti_alias: bool) -> RenderOptions {
    RenderOptions {
        filter: filter_from_u8(filter),
        anti_alias,
    }
}

/// Border from a width and a packed 0xRRGGBBAA color.
pub(crate) fn border(width: f32, rgba: u32) -> BorderSpec {
    BorderSpec::new(width, rgba.to_be_bytes())
}

pub(crate) fn frame(x: f32, y: f32, width: f32, height: f32) -> Rect {
    Rect::new(x, y, width, height)
}
