//! Chainable pipeline binding.
//!
//! Every method consumes the pipeline and returns it, so calls chain from
//! JavaScript. A failed step leaves the pipeline empty; later steps pass it
//! through untouched and `finish()` reports the first failure.
//!
//! ```typescript
//! const out = new JsPipeline(photo)
//!   .normalize()
//!   .resize(320, 240, 1)
//!   .mask_rounded_rect(16, 2, 0x000000ff)
//!   .finish();
//! ```

use crate::ops::{call_builder, path_from_js};
use crate::types::{border, fit_mode_from_u8, frame, options, to_js_error, JsRaster};
use js_sys::Function;
use rastermill_core::{MaskPath, Pipeline, RasterError, Size, StencilMask};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct JsPipeline {
    inner: Pipeline,
}

impl JsPipeline {
    fn map(self, step: impl FnOnce(Pipeline) -> Pipeline) -> JsPipeline {
        JsPipeline {
            inner: step(self.inner),
        }
    }

    /// Fail with `err` unless an earlier step already failed.
    fn fail(self, err: RasterError) -> JsPipeline {
        if self.inner.is_present() {
            log::warn!("pipeline argument rejected: {}", err);
            JsPipeline {
                inner: Pipeline::from_result(Err(err)),
            }
        } else {
            self
        }
    }
}

#[wasm_bindgen]
impl JsPipeline {
    /// Start a pipeline. A malformed raster starts it already failed.
    #[wasm_bindgen(constructor)]
    pub fn new(image: &JsRaster) -> JsPipeline {
        JsPipeline {
            inner: Pipeline::from_result(image.to_core()),
        }
    }

    /// Set the resampling filter (0-2) and anti-aliasing for later steps.
    pub fn with_options(self, filter: u8, anti_alias: bool) -> JsPipeline {
        self.map(|p| p.with_options(options(filter, anti_alias)))
    }

    pub fn normalize(self) -> JsPipeline {
        self.map(Pipeline::normalize)
    }

    /// `mode`: 0 = Clip, 1 = Crop, 2 = Scale
    pub fn resize(self, width: f32, height: f32, mode: u8) -> JsPipeline {
        self.map(|p| p.resize(Size::new(width, height), fit_mode_from_u8(mode)))
    }

    pub fn resize_to_fit(self, max_edge: f32) -> JsPipeline {
        self.map(|p| p.resize_to_fit(max_edge))
    }

    pub fn mask_ellipse(self, border_width: f32, border_rgba: u32) -> JsPipeline {
        self.map(|p| p.mask_ellipse(border(border_width, border_rgba)))
    }

    pub fn mask_circle(self, border_width: f32, border_rgba: u32) -> JsPipeline {
        self.map(|p| p.mask_circle(border(border_width, border_rgba)))
    }

    pub fn mask_rounded_rect(
        self,
        corner_radius: f32,
        border_width: f32,
        border_rgba: u32,
    ) -> JsPipeline {
        self.map(|p| p.mask_rounded_rect(corner_radius, border(border_width, border_rgba)))
    }

    /// Unreadable segments fail the step with the reason they were rejected.
    pub fn mask_path(self, segments: JsValue) -> JsPipeline {
        match path_from_js(segments) {
            Ok(path) => self.map(|p| p.mask_path(&path)),
            Err(e) => self.fail(e),
        }
    }

    /// Mask to the path `build` returns for the output rect. The callback is
    /// not called once the pipeline has failed.
    pub fn mask_path_with(self, build: &Function) -> JsPipeline {
        let mut failure = None;
        let next = self.map(|p| {
            p.mask_path_with(|rect| match call_builder(build, rect) {
                Ok(path) => path,
                Err(e) => {
                    failure = Some(e);
                    MaskPath::new()
                }
            })
        });
        match failure {
            Some(e) => {
                log::warn!("pipeline path builder failed: {}", e);
                JsPipeline {
                    inner: Pipeline::from_result(Err(e)),
                }
            }
            None => next,
        }
    }

    pub fn mask_image(self, mask: &JsRaster) -> JsPipeline {
        match mask.to_core() {
            Ok(mask) => self.map(|p| p.mask_image(&mask)),
            Err(e) => self.fail(e),
        }
    }

    pub fn mask_stencil(
        self,
        width: u32,
        height: u32,
        bytes_per_row: u32,
        gray: &[u8],
    ) -> JsPipeline {
        match StencilMask::from_gray(width, height, bytes_per_row as usize, gray) {
            Ok(stencil) => self.map(|p| p.mask_stencil(&stencil)),
            Err(e) => self.fail(e),
        }
    }

    pub fn overlay(
        self,
        layer: &JsRaster,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> JsPipeline {
        match layer.to_core() {
            Ok(layer) => self.map(|p| p.overlay(&layer, frame(x, y, width, height))),
            Err(e) => self.fail(e),
        }
    }

    /// Whether every step so far succeeded.
    #[wasm_bindgen(getter)]
    pub fn is_present(&self) -> bool {
        self.inner.is_present()
    }

    /// Message of the failure that stopped the pipeline, if any.
    #[wasm_bindgen(getter)]
    pub fn error(&self) -> Option<String> {
        self.inner.error().map(|e| e.to_string())
    }

    /// Copy of the current raster without ending the pipeline.
    pub fn raster(&self) -> Option<JsRaster> {
        self.inner.raster().cloned().map(JsRaster::from_core)
    }

    pub fn finish(self) -> Result<JsRaster, JsValue> {
        self.inner
            .finish()
            .map(JsRaster::from_core)
            .map_err(to_js_error)
    }
}


/// WASM-specific tests that require JsValue.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> JsRaster {
        JsRaster::new(width, height, rgba.repeat((width * height) as usize))
    }

    #[wasm_bindgen_test]
    fn test_unreadable_segments_reported() {
        let p = JsPipeline::new(&solid(10, 10, [0, 0, 0, 255]))
            .mask_path(JsValue::from_str("not a path"))
            .normalize();
        let msg = p.error().unwrap();
        assert!(msg.starts_with("Invalid path segments"), "got {}", msg);
    }

    #[wasm_bindgen_test]
    fn test_mask_path_with_builder() {
        let build = Function::new_with_args(
            "rect",
            "return [{ op: 'move_to', x: rect.x, y: rect.y }, \
             { op: 'line_to', x: rect.x + rect.width, y: rect.y }, \
             { op: 'line_to', x: rect.x, y: rect.y + rect.height }, \
             { op: 'close' }];",
        );
        let out = JsPipeline::new(&solid(20, 20, [0, 0, 0, 255]))
            .with_options(0, false)
            .mask_path_with(&build)
            .finish()
            .unwrap();
        let alpha = |x: u32, y: u32| out.pixels()[((y * 20 + x) * 4 + 3) as usize];
        assert_eq!(alpha(2, 2), 255);
        assert_eq!(alpha(17, 17), 0);
    }

    #[wasm_bindgen_test]
    fn test_mask_path_with_builder_error_kept() {
        let build = Function::new_with_args("rect", "throw 'no shape'");
        let p = JsPipeline::new(&solid(10, 10, [0, 0, 0, 255])).mask_path_with(&build);
        assert_eq!(p.error().unwrap(), "Invalid path segments: no shape");
    }
}
