//! Arbitrary path masks.
//!
//! A [`MaskPath`] is fitted into the output rect preserving its own aspect
//! ratio (centered along the slack axis), the canvas is clipped to it and
//! the source is drawn through the clip.

use serde::{Deserialize, Serialize};
use tiny_skia::{Path, PathBuilder, Transform};

use crate::canvas::Canvas;
use crate::raster::Raster;
use crate::transform::upright;
use crate::types::{RasterError, Rect, RenderOptions};

/// Cubic control-point distance for a quarter circle of unit radius.
pub(crate) const KAPPA: f32 = 0.552_284_8;

/// One segment of a [`MaskPath`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PathSegment {
    MoveTo { x: f32, y: f32 },
    LineTo { x: f32, y: f32 },
    QuadTo { x1: f32, y1: f32, x: f32, y: f32 },
    CubicTo { x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32 },
    Close,
}

/// An ordered contour used as a mask shape.
///
/// Coordinates are arbitrary; the path is scaled and translated into the
/// output rect when applied.
///
/// # Example
/// ```
/// use rastermill_core::mask::MaskPath;
///
/// let star = MaskPath::new()
///     .move_to(50.0, 0.0)
///     .line_to(61.0, 35.0)
///     .line_to(98.0, 35.0)
///     .line_to(68.0, 57.0)
///     .line_to(79.0, 91.0)
///     .line_to(50.0, 70.0)
///     .line_to(21.0, 91.0)
///     .line_to(32.0, 57.0)
///     .line_to(2.0, 35.0)
///     .line_to(39.0, 35.0)
///     .close();
/// assert!(star.bounds().is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaskPath {
    pub segments: Vec<PathSegment>,
}

impl MaskPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    pub fn move_to(mut self, x: f32, y: f32) -> Self {
        self.segments.push(PathSegment::MoveTo { x, y });
        self
    }

    pub fn line_to(mut self, x: f32, y: f32) -> Self {
        self.segments.push(PathSegment::LineTo { x, y });
        self
    }

    pub fn quad_to(mut self, x1: f32, y1: f32, x: f32, y: f32) -> Self {
        self.segments.push(PathSegment::QuadTo { x1, y1, x, y });
        self
    }

    pub fn cubic_to(mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) -> Self {
        self.segments.push(PathSegment::CubicTo {
            x1,
            y1,
            x2,
            y2,
            x,
            y,
        });
        self
    }

    pub fn close(mut self) -> Self {
        self.segments.push(PathSegment::Close);
        self
    }

    /// Closed polygon through `points`.
    pub fn polygon(points: &[(f32, f32)]) -> Self {
        let mut path = Self::new();
        for (i, &(x, y)) in points.iter().enumerate() {
            path = if i == 0 {
                path.move_to(x, y)
            } else {
                path.line_to(x, y)
            };
        }
        path.close()
    }

    /// Ellipse inscribed in `rect`, as four cubic arcs.
    pub fn ellipse(rect: Rect) -> Self {
        let (rx, ry) = (rect.width / 2.0, rect.height / 2.0);
        let (cx, cy) = (rect.x + rx, rect.y + ry);
        let (kx, ky) = (rx * KAPPA, ry * KAPPA);

        Self::new()
            .move_to(cx + rx, cy)
            .cubic_to(cx + rx, cy + ky, cx + kx, cy + ry, cx, cy + ry)
            .cubic_to(cx - kx, cy + ry, cx - rx, cy + ky, cx - rx, cy)
            .cubic_to(cx - rx, cy - ky, cx - kx, cy - ry, cx, cy - ry)
            .cubic_to(cx + kx, cy - ry, cx + rx, cy - ky, cx + rx, cy)
            .close()
    }

    /// Build the tiny-skia path. `None` if there is nothing to draw.
    pub(crate) fn to_skia(&self) -> Option<Path> {
        let mut pb = PathBuilder::new();
        for segment in &self.segments {
            match *segment {
                PathSegment::MoveTo { x, y } => pb.move_to(x, y),
                PathSegment::LineTo { x, y } => pb.line_to(x, y),
                PathSegment::QuadTo { x1, y1, x, y } => pb.quad_to(x1, y1, x, y),
                PathSegment::CubicTo {
                    x1,
                    y1,
                    x2,
                    y2,
                    x,
                    y,
                } => pb.cubic_to(x1, y1, x2, y2, x, y),
                PathSegment::Close => pb.close(),
            }
        }
        pb.finish()
    }

    /// Bounding box of all points, or `None` for an empty path.
    pub fn bounds(&self) -> Option<Rect> {
        self.to_skia().map(|p| Rect::from_skia(p.bounds()))
    }
}

/// Transform that fits `bounds` into `target`, preserving aspect ratio.
///
/// A path wider than the target (relative to height) is scaled by the
/// width ratio and centered vertically; otherwise it is scaled by the height
/// ratio and centered horizontally.
pub fn fit_transform(bounds: Rect, target: Rect) -> Transform {
    let (scale, tx, ty) = if bounds.size().aspect() > target.size().aspect() {
        let s = target.width / bounds.width;
        (s, 0.0, (target.height - bounds.height * s) / 2.0)
    } else {
        let s = target.height / bounds.height;
        (s, (target.width - bounds.width * s) / 2.0, 0.0)
    };
    Transform::from_row(
        scale,
        0.0,
        0.0,
        scale,
        target.x + tx - bounds.x * scale,
        target.y + ty - bounds.y * scale,
    )
}

/// Mask `raster` to `path` with default options.
///
/// # Errors
///
/// `MalformedPath` when the path is empty or has zero width or height.
pub fn mask_path(raster: &Raster, path: &MaskPath) -> Result<Raster, RasterError> {
    mask_path_with(raster, |_| path.clone(), &RenderOptions::default())
}

/// Mask `raster` to a path built from the output rect.
///
/// `build` receives the logical output rect, so size-dependent shapes can be
/// constructed for the exact surface they will clip.
pub fn mask_path_with<F>(
    raster: &Raster,
    build: F,
    options: &RenderOptions,
) -> Result<Raster, RasterError>
where
    F: FnOnce(Rect) -> MaskPath,
{
    let src = upright(raster)?;
    Canvas::render(src.logical_size(), src.scale(), options, |canvas| {
        let rect = canvas.bounds();
        let path = build(rect).to_skia().ok_or(RasterError::MalformedPath)?;

        let bounds = Rect::from_skia(path.bounds());
        if bounds.width <= 0.0 || bounds.height <= 0.0 {
            return Err(RasterError::MalformedPath);
        }
        let fitted = path
            .transform(fit_transform(bounds, rect))
            .ok_or(RasterError::MalformedPath)?;

        canvas.clip_path(&fitted)?;
        canvas.draw_raster(&src, rect)
    })
    .inspect_err(|e| log::warn!("path mask failed: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opaque(width: u32, height: u32) -> Raster {
        Raster::solid(width, height, [30, 60, 90, 255]).unwrap()
    }

    fn alpha(raster: &Raster, x: u32, y: u32) -> u8 {
        raster.pixel(x, y).unwrap()[3]
    }

    #[test]
    fn test_bounds() {
        let path = MaskPath::polygon(&[(10.0, 20.0), (30.0, 20.0), (20.0, 60.0)]);
        assert_eq!(path.bounds(), Some(Rect::new(10.0, 20.0, 20.0, 40.0)));
        assert_eq!(MaskPath::new().bounds(), None);
    }

    #[test]
    fn test_ellipse_bounds() {
        let path = MaskPath::ellipse(Rect::new(0.0, 0.0, 40.0, 20.0));
        let b = path.bounds().unwrap();
        assert!((b.width - 40.0).abs() < 1e-3);
        assert!((b.height - 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_fit_transform_tall_path_centers_horizontally() {
        let ts = fit_transform(
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(0.0, 0.0, 100.0, 50.0),
        );
        assert_eq!((ts.sx, ts.sy), (5.0, 5.0));
        assert_eq!((ts.tx, ts.ty), (25.0, 0.0));
    }

    #[test]
    fn test_fit_transform_wide_path_centers_vertically() {
        let ts = fit_transform(
            Rect::new(100.0, 100.0, 40.0, 10.0),
            Rect::new(0.0, 0.0, 20.0, 20.0),
        );
        assert_eq!(ts.sx, 0.5);
        assert_eq!(ts.tx, -50.0);
        assert_eq!(ts.ty, 7.5 - 50.0);
    }

    #[test]
    fn test_square_path_on_landscape_image() {
        let img = opaque(100, 50);
        let square = MaskPath::polygon(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let out = mask_path(&img, &square).unwrap();

        assert_eq!((out.width(), out.height()), (100, 50));
        assert_eq!(alpha(&out, 10, 25), 0);
        assert_eq!(alpha(&out, 50, 25), 255);
        assert_eq!(alpha(&out, 90, 25), 0);
    }

    #[test]
    fn test_path_offset_is_normalized() {
        let img = opaque(40, 40);
        let far = MaskPath::polygon(&[
            (500.0, 500.0),
            (520.0, 500.0),
            (520.0, 520.0),
            (500.0, 520.0),
        ]);
        let out = mask_path(&img, &far).unwrap();
        // Square fills the square image entirely
        assert_eq!(alpha(&out, 0, 0), 255);
        assert_eq!(alpha(&out, 39, 39), 255);
    }

    #[test]
    fn test_outside_triangle_transparent() {
        let img = opaque(60, 60);
        let triangle = MaskPath::polygon(&[(0.0, 60.0), (30.0, 0.0), (60.0, 60.0)]);
        let out = mask_path(&img, &triangle).unwrap();

        assert_eq!(alpha(&out, 2, 2), 0);
        assert_eq!(alpha(&out, 57, 2), 0);
        assert_eq!(alpha(&out, 30, 50), 255);
    }

    #[test]
    fn test_builder_receives_output_rect() {
        let img = opaque(80, 20).with_scale(2.0);
        let mut seen = None;
        let out = mask_path_with(
            &img,
            |rect| {
                seen = Some(rect);
                MaskPath::ellipse(rect)
            },
            &RenderOptions::default(),
        )
        .unwrap();

        assert_eq!(seen, Some(Rect::new(0.0, 0.0, 40.0, 10.0)));
        assert_eq!((out.width(), out.height()), (80, 20));
        assert_eq!(out.scale(), 2.0);
    }

    #[test]
    fn test_empty_path_rejected() {
        let img = opaque(10, 10);
        assert_eq!(
            mask_path(&img, &MaskPath::new()),
            Err(RasterError::MalformedPath)
        );
    }

    #[test]
    fn test_degenerate_line_rejected() {
        let img = opaque(10, 10);
        let line = MaskPath::new().move_to(0.0, 5.0).line_to(10.0, 5.0);
        assert_eq!(mask_path(&img, &line), Err(RasterError::MalformedPath));
    }
}
