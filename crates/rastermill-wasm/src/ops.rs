//! WASM bindings for the raster operations.
//!
//! Each function converts its `JsRaster` arguments to core rasters, runs the
//! core operation and wraps the result. Failures surface as a rejected
//! `JsValue` carrying the error message, never as an empty image.

use crate::types::{border, fit_mode_from_u8, frame, options, to_js_error, JsRaster};
use js_sys::Function;
use rastermill_core::{
    mask_circle_with as core_mask_circle, mask_ellipse_with as core_mask_ellipse,
    mask_path_with as core_mask_path_with, mask_rounded_rect_with as core_mask_rounded_rect,
    mask_stencil as core_mask_stencil, normalize_orientation as core_normalize,
    overlay_with as core_overlay, resize_to_fit_with as core_resize_to_fit,
    resize_with as core_resize, MaskPath, PathSegment, RasterError, Rect, Size, StencilMask,
};
use wasm_bindgen::prelude::*;

/// Bake the EXIF orientation into the pixels.
#[wasm_bindgen]
pub fn normalize_orientation(image: &JsRaster) -> Result<JsRaster, JsValue> {
    image
        .to_core()
        .and_then(|src| core_normalize(&src))
        .map(JsRaster::from_core)
        .map_err(to_js_error)
}

/// Resize an image to a logical target size.
///
/// # Arguments
///
/// * `image` - Source image
/// * `width` / `height` - Target size in logical units
/// * `mode` - 0 = Clip (fit inside), 1 = Crop (fill and trim), 2 = Scale (stretch)
/// * `filter` - 0 = Nearest, 1 = Bilinear, 2 = Lanczos3
///
/// # Example (TypeScript)
///
/// ```typescript
/// // 500px thumbnail that fits inside the box
/// const thumb = resize(photo, 500, 500, 0, 1);
/// ```
#[wasm_bindgen]
pub fn resize(
    image: &JsRaster,
    width: f32,
    height: f32,
    mode: u8,
    filter: u8,
) -> Result<JsRaster, JsValue> {
    let opts = options(filter, true);
    image
        .to_core()
        .and_then(|src| {
            core_resize(&src, Size::new(width, height), fit_mode_from_u8(mode), &opts)
        })
        .map(JsRaster::from_core)
        .map_err(to_js_error)
}

/// Fit the longest edge within `max_edge` without upscaling.
#[wasm_bindgen]
pub fn resize_to_fit(image: &JsRaster, max_edge: f32, filter: u8) -> Result<JsRaster, JsValue> {
    let opts = options(filter, true);
    image
        .to_core()
        .and_then(|src| core_resize_to_fit(&src, max_edge, &opts))
        .map(JsRaster::from_core)
        .map_err(to_js_error)
}

/// Clip to the inscribed ellipse with an optional border.
///
/// `border_rgba` is packed as 0xRRGGBBAA; a `border_width` of 0 draws none.
/// Like every mask function, the last two arguments are the resampling
/// filter (0-2) and whether clip edges and borders are anti-aliased.
///
/// # Example (TypeScript)
///
/// ```typescript
/// // 4px opaque white ring, bilinear, anti-aliased
/// const avatar = mask_ellipse(photo, 4, 0xffffffff, 1, true);
/// ```
#[wasm_bindgen]
pub fn mask_ellipse(
    image: &JsRaster,
    border_width: f32,
    border_rgba: u32,
    filter: u8,
    anti_alias: bool,
) -> Result<JsRaster, JsValue> {
    let opts = options(filter, anti_alias);
    image
        .to_core()
        .and_then(|src| core_mask_ellipse(&src, border(border_width, border_rgba), &opts))
        .map(JsRaster::from_core)
        .map_err(to_js_error)
}

/// Circular mask over the centered square.
#[wasm_bindgen]
pub fn mask_circle(
    image: &JsRaster,
    border_width: f32,
    border_rgba: u32,
    filter: u8,
    anti_alias: bool,
) -> Result<JsRaster, JsValue> {
    let opts = options(filter, anti_alias);
    image
        .to_core()
        .and_then(|src| core_mask_circle(&src, border(border_width, border_rgba), &opts))
        .map(JsRaster::from_core)
        .map_err(to_js_error)
}

#[wasm_bindgen]
pub fn mask_rounded_rect(
    image: &JsRaster,
    corner_radius: f32,
    border_width: f32,
    border_rgba: u32,
    filter: u8,
    anti_alias: bool,
) -> Result<JsRaster, JsValue> {
    let opts = options(filter, anti_alias);
    image
        .to_core()
        .and_then(|src| {
            core_mask_rounded_rect(&src, corner_radius, border(border_width, border_rgba), &opts)
        })
        .map(JsRaster::from_core)
        .map_err(to_js_error)
}

/// Read path segments passed from JavaScript.
pub(crate) fn path_from_js(segments: JsValue) -> Result<MaskPath, RasterError> {
    let segments: Vec<PathSegment> = serde_wasm_bindgen::from_value(segments)
        .map_err(|e| RasterError::InvalidPath(e.to_string()))?;
    Ok(MaskPath::from_segments(segments))
}

/// Call a JS path builder with the output rect and read its segments.
pub(crate) fn call_builder(build: &Function, rect: Rect) -> Result<MaskPath, RasterError> {
    let arg = serde_wasm_bindgen::to_value(&rect)
        .map_err(|e| RasterError::InvalidPath(e.to_string()))?;
    let segments = build.call1(&JsValue::NULL, &arg).map_err(|e| {
        RasterError::InvalidPath(
            e.as_string()
                .unwrap_or_else(|| "path builder threw".to_string()),
        )
    })?;
    path_from_js(segments)
}

/// Mask to an arbitrary path, fitted into the image preserving its aspect.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const diamond = mask_path(photo, [
///   { op: 'move_to', x: 50, y: 0 },
///   { op: 'line_to', x: 100, y: 50 },
///   { op: 'line_to', x: 50, y: 100 },
///   { op: 'line_to', x: 0, y: 50 },
///   { op: 'close' },
/// ], 1, true);
/// ```
#[wasm_bindgen]
pub fn mask_path(
    image: &JsRaster,
    segments: JsValue,
    filter: u8,
    anti_alias: bool,
) -> Result<JsRaster, JsValue> {
    let opts = options(filter, anti_alias);
    let path = path_from_js(segments).map_err(to_js_error)?;
    image
        .to_core()
        .and_then(|src| core_mask_path_with(&src, |_| path, &opts))
        .map(JsRaster::from_core)
        .map_err(to_js_error)
}

/// Mask to a path returned by `build`, which receives the output rect
/// `{ x, y, width, height }` and returns path segments.
#[wasm_bindgen]
pub fn mask_path_with(
    image: &JsRaster,
    build: &Function,
    filter: u8,
    anti_alias: bool,
) -> Result<JsRaster, JsValue> {
    let opts = options(filter, anti_alias);
    let src = image.to_core().map_err(to_js_error)?;

    let mut failure = None;
    let result = core_mask_path_with(
        &src,
        |rect| match call_builder(build, rect) {
            Ok(path) => path,
            Err(e) => {
                failure = Some(e);
                MaskPath::new()
            }
        },
        &opts,
    );
    if let Some(e) = failure {
        return Err(to_js_error(e));
    }
    result.map(JsRaster::from_core).map_err(to_js_error)
}

/// Mask by another image's luminance: dark shows the source, light hides it.
#[wasm_bindgen]
pub fn mask_image(
    image: &JsRaster,
    mask: &JsRaster,
    filter: u8,
    anti_alias: bool,
) -> Result<JsRaster, JsValue> {
    let opts = options(filter, anti_alias);
    image
        .to_core()
        .and_then(|src| {
            let stencil = StencilMask::from_raster(&mask.to_core()?)?;
            core_mask_stencil(&src, &stencil, &opts)
        })
        .map(JsRaster::from_core)
        .map_err(to_js_error)
}

/// Mask by a raw 8-bit gray stencil with the given row stride.
#[wasm_bindgen]
pub fn mask_stencil(
    image: &JsRaster,
    width: u32,
    height: u32,
    bytes_per_row: u32,
    gray: &[u8],
    filter: u8,
    anti_alias: bool,
) -> Result<JsRaster, JsValue> {
    let opts = options(filter, anti_alias);
    image
        .to_core()
        .and_then(|src| {
            let stencil = StencilMask::from_gray(width, height, bytes_per_row as usize, gray)?;
            core_mask_stencil(&src, &stencil, &opts)
        })
        .map(JsRaster::from_core)
        .map_err(to_js_error)
}

/// Draw `layer` over `base`, stretched into the given frame.
#[wasm_bindgen]
pub fn overlay(
    base: &JsRaster,
    layer: &JsRaster,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    filter: u8,
) -> Result<JsRaster, JsValue> {
    let opts = options(filter, true);
    base.to_core()
        .and_then(|src| {
            core_overlay(&src, &layer.to_core()?, frame(x, y, width, height), &opts)
        })
        .map(JsRaster::from_core)
        .map_err(to_js_error)
}

/// WASM-specific tests that require JsValue.
///
/// These tests use functions that return `Result<T, JsValue>` and can only
/// run on wasm32 targets. Use `wasm-pack test` to run these. The operations
/// themselves are covered by the rastermill-core tests.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> JsRaster {
        JsRaster::new(width, height, rgba.repeat((width * height) as usize))
    }

    #[wasm_bindgen_test]
    fn test_resize_clip() {
        let out = resize(&solid(200, 100, [1, 2, 3, 255]), 50.0, 50.0, 0, 1).unwrap();
        assert_eq!((out.width(), out.height()), (50, 25));
    }

    #[wasm_bindgen_test]
    fn test_resize_invalid_target() {
        assert!(resize(&solid(10, 10, [0; 4]), 0.0, 10.0, 0, 1).is_err());
    }

    #[wasm_bindgen_test]
    fn test_malformed_buffer_rejected() {
        let bad = JsRaster::new(10, 10, vec![0; 7]);
        assert!(mask_ellipse(&bad, 0.0, 0, 1, true).is_err());
    }

    #[wasm_bindgen_test]
    fn test_mask_circle_square() {
        let out = mask_circle(&solid(30, 20, [9, 9, 9, 255]), 2.0, 0xffffffff, 1, true).unwrap();
        assert_eq!((out.width(), out.height()), (20, 20));
    }

    #[wasm_bindgen_test]
    fn test_mask_path_invalid_segments() {
        let img = solid(10, 10, [0, 0, 0, 255]);
        let err = mask_path(&img, JsValue::from_str("not a path"), 1, true).unwrap_err();
        assert!(err.as_string().unwrap().starts_with("Invalid path segments"));
    }

    #[wasm_bindgen_test]
    fn test_mask_without_anti_alias_has_hard_edges() {
        let out = mask_ellipse(&solid(40, 40, [9, 9, 9, 255]), 0.0, 0, 0, false).unwrap();
        assert!(out.pixels().chunks_exact(4).all(|p| p[3] == 0 || p[3] == 255));
    }

    #[wasm_bindgen_test]
    fn test_mask_path_with_builder_error_reported() {
        let img = solid(10, 10, [0, 0, 0, 255]);
        let build = Function::new_with_args("rect", "throw 'no shape'");
        let err = mask_path_with(&img, &build, 1, true).unwrap_err();
        assert_eq!(err.as_string().unwrap(), "Invalid path segments: no shape");
    }

    #[wasm_bindgen_test]
    fn test_overlay_keeps_base_size() {
        let base = solid(40, 30, [255; 4]);
        let layer = solid(5, 5, [255, 0, 0, 255]);
        let out = overlay(&base, &layer, 10.0, 10.0, 10.0, 10.0, 1).unwrap();
        assert_eq!((out.width(), out.height()), (40, 30));
    }

    #[wasm_bindgen_test]
    fn test_mask_stencil_short_data() {
        let img = solid(10, 10, [0, 0, 0, 255]);
        assert!(mask_stencil(&img, 4, 4, 4, &[0; 3], 1, true).is_err());
    }
}
