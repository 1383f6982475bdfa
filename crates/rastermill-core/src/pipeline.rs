//! Chainable operation pipeline.
//!
//! A [`Pipeline`] threads one raster through successive operations by value.
//! Each step consumes the pipeline and returns a new one holding either the
//! step's output or the error that stopped it. Once a step fails, every
//! later step is skipped and the first error is kept for the caller.
//!
//! # Example
//!
//! ```ignore
//! use rastermill_core::{BorderSpec, FitMode, Pipeline, Size};
//!
//! let avatar = Pipeline::new(photo)
//!     .resize(Size::new(256.0, 256.0), FitMode::Crop)
//!     .mask_circle(BorderSpec::new(4.0, [255, 255, 255, 255]))
//!     .finish()?;
//! ```

use crate::compose;
use crate::mask::{self, MaskPath, StencilMask};
use crate::raster::Raster;
use crate::transform::{self, FitMode};
use crate::types::{BorderSpec, RasterError, Rect, RenderOptions, Size};

#[derive(Debug, Clone)]
pub struct Pipeline {
    state: Result<Raster, RasterError>,
    options: RenderOptions,
}

impl Pipeline {
    /// Start a pipeline from a raster.
    pub fn new(raster: Raster) -> Self {
        Self::from_result(Ok(raster))
    }

    /// Start a pipeline from the outcome of an earlier operation.
    pub fn from_result(state: Result<Raster, RasterError>) -> Self {
        Self {
            state,
            options: RenderOptions::default(),
        }
    }

    /// Options used by every later step.
    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    fn then<F>(self, step: &str, op: F) -> Self
    where
        F: FnOnce(&Raster, &RenderOptions) -> Result<Raster, RasterError>,
    {
        let state = match self.state {
            Ok(raster) => op(&raster, &self.options),
            Err(e) => {
                log::debug!("skipping {}: {}", step, e);
                Err(e)
            }
        };
        Self {
            state,
            options: self.options,
        }
    }

    pub fn normalize(self) -> Self {
        self.then("normalize", |r, _| transform::normalize_orientation(r))
    }

    pub fn resize(self, target: Size, mode: FitMode) -> Self {
        self.then("resize", |r, o| transform::resize_with(r, target, mode, o))
    }

    pub fn resize_to_fit(self, max_edge: f32) -> Self {
        self.then("resize_to_fit", |r, o| {
            transform::resize_to_fit_with(r, max_edge, o)
        })
    }

    pub fn mask_ellipse(self, border: BorderSpec) -> Self {
        self.then("mask_ellipse", |r, o| mask::mask_ellipse_with(r, border, o))
    }

    pub fn mask_circle(self, border: BorderSpec) -> Self {
        self.then("mask_circle", |r, o| mask::mask_circle_with(r, border, o))
    }

    pub fn mask_rounded_rect(self, corner_radius: f32, border: BorderSpec) -> Self {
        self.then("mask_rounded_rect", |r, o| {
            mask::mask_rounded_rect_with(r, corner_radius, border, o)
        })
    }

    pub fn mask_path(self, path: &MaskPath) -> Self {
        self.then("mask_path", |r, o| {
            mask::mask_path_with(r, |_| path.clone(), o)
        })
    }

    /// Mask with a path built from the output rect at the time of the step.
    pub fn mask_path_with<F>(self, build: F) -> Self
    where
        F: FnOnce(Rect) -> MaskPath,
    {
        self.then("mask_path_with", |r, o| mask::mask_path_with(r, build, o))
    }

    pub fn mask_image(self, mask_image: &Raster) -> Self {
        self.then("mask_image", |r, o| {
            mask::mask_stencil(r, &StencilMask::from_raster(mask_image)?, o)
        })
    }

    pub fn mask_stencil(self, stencil: &StencilMask) -> Self {
        self.then("mask_stencil", |r, o| mask::mask_stencil(r, stencil, o))
    }

    pub fn overlay(self, layer: &Raster, frame: Rect) -> Self {
        self.then("overlay", |r, o| compose::overlay_with(r, layer, frame, o))
    }

    pub fn overlay_all(self, layers: &[(&Raster, Rect)]) -> Self {
        self.then("overlay_all", |r, o| compose::overlay_all_with(r, layers, o))
    }

    /// Whether every step so far succeeded.
    pub fn is_present(&self) -> bool {
        self.state.is_ok()
    }

    /// Current raster, if no step has failed.
    pub fn raster(&self) -> Option<&Raster> {
        self.state.as_ref().ok()
    }

    /// The error that stopped the pipeline.
    pub fn error(&self) -> Option<&RasterError> {
        self.state.as_ref().err()
    }

    pub fn finish(self) -> Result<Raster, RasterError> {
        self.state
    }
}

impl From<Raster> for Pipeline {
    fn from(raster: Raster) -> Self {
        Self::new(raster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Orientation;
    use crate::types::FilterType;

    fn photo(width: u32, height: u32) -> Raster {
        Raster::solid(width, height, [90, 140, 200, 255]).unwrap()
    }

    #[test]
    fn test_chain_resize_then_circle() {
        let out = Pipeline::new(photo(300, 200))
            .resize(Size::new(64.0, 64.0), FitMode::Crop)
            .mask_circle(BorderSpec::none())
            .finish()
            .unwrap();

        assert_eq!((out.width(), out.height()), (64, 64));
        assert_eq!(out.pixel(0, 0).unwrap()[3], 0);
        assert_eq!(out.pixel(32, 32).unwrap()[3], 255);
    }

    #[test]
    fn test_failure_skips_later_steps_and_keeps_reason() {
        let layer = photo(4, 4);
        let pipeline = Pipeline::new(photo(30, 30))
            .resize(Size::new(0.0, 10.0), FitMode::Scale)
            .mask_ellipse(BorderSpec::none())
            .overlay(&layer, Rect::new(0.0, 0.0, 4.0, 4.0));

        assert!(!pipeline.is_present());
        assert!(pipeline.raster().is_none());
        assert_eq!(
            pipeline.error(),
            Some(&RasterError::InvalidDimension {
                width: 0.0,
                height: 10.0
            })
        );
    }

    #[test]
    fn test_from_failed_result_is_noop() {
        let pipeline = Pipeline::from_result(Err(RasterError::MalformedPath))
            .normalize()
            .resize_to_fit(10.0);
        assert_eq!(pipeline.finish(), Err(RasterError::MalformedPath));
    }

    #[test]
    fn test_path_builder_not_called_after_failure() {
        let mut called = false;
        let pipeline = Pipeline::from_result(Err(RasterError::MalformedPath)).mask_path_with(
            |rect| {
                called = true;
                MaskPath::ellipse(rect)
            },
        );
        assert!(!pipeline.is_present());
        assert!(!called);
    }

    #[test]
    fn test_normalize_step() {
        let img = photo(20, 10).with_orientation(Orientation::Rotate90CW);
        let out = Pipeline::from(img).normalize().finish().unwrap();
        assert_eq!((out.width(), out.height()), (10, 20));
    }

    #[test]
    fn test_options_carried_through() {
        let opts = RenderOptions {
            filter: FilterType::Nearest,
            anti_alias: false,
        };
        let out = Pipeline::new(photo(40, 40))
            .with_options(opts)
            .mask_ellipse(BorderSpec::none())
            .finish()
            .unwrap();
        // Without anti-aliasing every pixel is fully in or fully out
        assert!(out.pixels().chunks_exact(4).all(|p| p[3] == 0 || p[3] == 255));
    }

    #[test]
    fn test_resize_to_fit_uses_options() {
        // Alternating black and white columns
        let pixels: Vec<u8> = (0..32 * 64)
            .flat_map(|i| if i % 2 == 0 { [0, 0, 0, 255] } else { [255; 4] })
            .collect();
        let stripes = Raster::new(64, 32, pixels).unwrap();
        let nearest = RenderOptions {
            filter: FilterType::Nearest,
            anti_alias: true,
        };

        let out = Pipeline::new(stripes.clone())
            .with_options(nearest)
            .resize_to_fit(16.0)
            .finish()
            .unwrap();
        assert_eq!(out, transform::resize_to_fit_with(&stripes, 16.0, &nearest).unwrap());
        assert_ne!(out, transform::resize_to_fit(&stripes, 16.0).unwrap());
    }

    #[test]
    fn test_all_mask_families_chain() {
        let stencil = StencilMask::from_gray(1, 1, 1, &[0]).unwrap();
        let mask_img = Raster::solid(2, 2, [0, 0, 0, 255]).unwrap();
        let triangle = MaskPath::polygon(&[(0.0, 1.0), (0.5, 0.0), (1.0, 1.0)]);

        let pipeline = Pipeline::new(photo(50, 50))
            .mask_rounded_rect(8.0, BorderSpec::new(2.0, [0, 0, 0, 255]))
            .mask_image(&mask_img)
            .mask_stencil(&stencil)
            .mask_path(&triangle)
            .overlay_all(&[(&photo(5, 5), Rect::new(20.0, 30.0, 10.0, 10.0))]);

        let out = pipeline.finish().unwrap();
        assert_eq!((out.width(), out.height()), (50, 50));
        assert_eq!(out.pixel(1, 1).unwrap()[3], 0);
        assert_eq!(out.pixel(25, 45).unwrap()[3], 255);
    }
}
