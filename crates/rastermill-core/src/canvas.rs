//! Drawing surface used by the mask and compositing operations.
//!
//! A [`Canvas`] is a transparent tiny-skia pixmap with a current transform
//! and an optional clip. Coordinates are logical; the base transform maps
//! them to pixels by the device scale. A canvas lives only for the duration
//! of one operation: [`Canvas::render`] creates it, hands it to the drawing
//! closure and reads the result back, and the surface is dropped on every
//! exit path including errors.

use tiny_skia::{FillRule, IntSize, Mask, Paint, Path, Pixmap, PixmapPaint, Stroke, Transform};

use crate::raster::Raster;
use crate::types::{RasterError, Rect, RenderOptions, Size};

pub struct Canvas {
    pixmap: Pixmap,
    size: Size,
    scale: f32,
    transform: Transform,
    clip: Option<Mask>,
    options: RenderOptions,
}

impl Canvas {
    /// Allocate a transparent surface of `size` logical units at `scale`.
    ///
    /// # Errors
    ///
    /// `InvalidDimension` when the size is not positive or rounds to zero
    /// pixels, `SurfaceAllocation` when the pixmap cannot be created.
    pub fn new(size: Size, scale: f32, options: &RenderOptions) -> Result<Self, RasterError> {
        let size = size.validate_at(scale)?;
        let width = (size.width * scale).round();
        let height = (size.height * scale).round();
        let pixmap = Pixmap::new(width as u32, height as u32)
            .ok_or_else(|| RasterError::SurfaceAllocation(format!("{}x{}", width, height)))?;

        Ok(Self {
            pixmap,
            size,
            scale,
            transform: Transform::from_scale(scale, scale),
            clip: None,
            options: *options,
        })
    }

    /// Run `draw` against a fresh canvas and return what it drew.
    pub fn render<F>(
        size: Size,
        scale: f32,
        options: &RenderOptions,
        draw: F,
    ) -> Result<Raster, RasterError>
    where
        F: FnOnce(&mut Canvas) -> Result<(), RasterError>,
    {
        let mut canvas = Canvas::new(size, scale, options)?;
        draw(&mut canvas)?;
        canvas.finish()
    }

    /// Logical size of the surface.
    pub fn size(&self) -> Size {
        self.size
    }

    /// The full surface as a rect at the origin.
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.size)
    }

    /// Pixel dimensions of the surface.
    pub fn pixel_dimensions(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    /// Append `transform` to the current transform (applied to geometry first).
    pub fn concat(&mut self, transform: Transform) {
        self.transform = self.transform.pre_concat(transform);
    }

    pub fn translate(&mut self, tx: f32, ty: f32) {
        self.concat(Transform::from_translate(tx, ty));
    }

    pub fn scale(&mut self, sx: f32, sy: f32) {
        self.concat(Transform::from_scale(sx, sy));
    }

    /// Rotate clockwise by `degrees` about the current origin.
    pub fn rotate(&mut self, degrees: f32) {
        self.concat(Transform::from_rotate(degrees));
    }

    /// Restrict later drawing to the inside of `path`, intersected with any
    /// existing clip. The path is interpreted under the current transform.
    pub fn clip_path(&mut self, path: &Path) -> Result<(), RasterError> {
        let (width, height) = self.pixel_dimensions();
        let mut mask = Mask::new(width, height)
            .ok_or_else(|| RasterError::SurfaceAllocation("clip mask".to_string()))?;
        mask.fill_path(
            path,
            FillRule::Winding,
            self.options.anti_alias,
            self.transform,
        );
        self.intersect_clip(mask);
        Ok(())
    }

    /// Restrict later drawing by per-pixel coverage (0 hides, 255 reveals).
    ///
    /// `coverage` is in device pixels and must match the surface size.
    pub fn clip_coverage(&mut self, coverage: Vec<u8>) -> Result<(), RasterError> {
        let (width, height) = self.pixel_dimensions();
        let expected = width as usize * height as usize;
        if coverage.len() != expected {
            return Err(RasterError::MalformedPixels {
                expected,
                actual: coverage.len(),
            });
        }
        let mask = IntSize::from_wh(width, height)
            .and_then(|size| Mask::from_vec(coverage, size))
            .ok_or_else(|| RasterError::SurfaceAllocation("coverage mask".to_string()))?;
        self.intersect_clip(mask);
        Ok(())
    }

    fn intersect_clip(&mut self, mask: Mask) {
        self.clip = Some(match self.clip.take() {
            None => mask,
            Some(mut current) => {
                for (c, m) in current.data_mut().iter_mut().zip(mask.data()) {
                    *c = ((*c as u16 * *m as u16 + 127) / 255) as u8;
                }
                current
            }
        });
    }

    /// Draw `raster` stretched into `rect`, source-over, under the current
    /// transform and clip.
    pub fn draw_raster(&mut self, raster: &Raster, rect: Rect) -> Result<(), RasterError> {
        let src = raster.to_pixmap()?;
        let placement = Transform::from_row(
            rect.width / src.width() as f32,
            0.0,
            0.0,
            rect.height / src.height() as f32,
            rect.x,
            rect.y,
        );
        let paint = PixmapPaint {
            quality: self.options.filter.to_skia_quality(),
            ..Default::default()
        };
        self.pixmap.draw_pixmap(
            0,
            0,
            src.as_ref(),
            &paint,
            self.transform.pre_concat(placement),
            self.clip.as_ref(),
        );
        Ok(())
    }

    /// Stroke `path` with a line of `width` logical units in straight RGBA `color`.
    pub fn stroke_path(&mut self, path: &Path, width: f32, color: [u8; 4]) {
        let mut paint = Paint::default();
        paint.set_color_rgba8(color[0], color[1], color[2], color[3]);
        paint.anti_alias = self.options.anti_alias;

        let stroke = Stroke {
            width,
            ..Default::default()
        };
        self.pixmap.stroke_path(
            path,
            &paint,
            &stroke,
            self.transform,
            self.clip.as_ref(),
        );
    }

    /// Read the surface back as a raster at the canvas's device scale.
    pub fn finish(self) -> Result<Raster, RasterError> {
        Raster::from_pixmap(&self.pixmap, self.scale)
    }
}
