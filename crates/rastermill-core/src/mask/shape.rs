//! Ellipse and rounded-rectangle masks with optional borders.

use tiny_skia::{Path, PathBuilder};

use super::path::KAPPA;
use crate::canvas::Canvas;
use crate::raster::Raster;
use crate::transform::upright;
use crate::types::{BorderSpec, RasterError, Rect, RenderOptions, Size};

fn oval(rect: Rect) -> Result<Path, RasterError> {
    rect.to_skia()
        .and_then(PathBuilder::from_oval)
        .ok_or(RasterError::MalformedPath)
}

/// Stroke `border` along an ellipse inset by half its width inside `rect`.
///
/// The width is clamped to half the shorter side of `rect`, where the ring
/// already reaches the center; the inset ellipse then always has an area.
fn stroke_inset_oval(
    canvas: &mut Canvas,
    rect: Rect,
    border: BorderSpec,
) -> Result<(), RasterError> {
    if !border.is_visible() {
        return Ok(());
    }
    let width = border.width.min(rect.width.min(rect.height) / 2.0);
    canvas.stroke_path(&oval(rect.inset(width / 2.0))?, width, border.color);
    Ok(())
}

/// Rounded rectangle spanning `rect`. The radius is clamped to half the
/// shorter side; a zero radius gives a plain rectangle.
pub(crate) fn rounded_rect(rect: Rect, radius: f32) -> Result<Path, RasterError> {
    let r = radius.max(0.0).min(rect.width / 2.0).min(rect.height / 2.0);
    let (left, top) = (rect.x, rect.y);
    let (right, bottom) = (rect.x + rect.width, rect.y + rect.height);
    let k = r * (1.0 - KAPPA);

    let mut pb = PathBuilder::new();
    pb.move_to(left + r, top);
    pb.line_to(right - r, top);
    pb.cubic_to(right - k, top, right, top + k, right, top + r);
    pb.line_to(right, bottom - r);
    pb.cubic_to(right, bottom - k, right - k, bottom, right - r, bottom);
    pb.line_to(left + r, bottom);
    pb.cubic_to(left + k, bottom, left, bottom - k, left, bottom - r);
    pb.line_to(left, top + r);
    pb.cubic_to(left, top + k, left + k, top, left + r, top);
    pb.close();
    pb.finish().ok_or(RasterError::MalformedPath)
}

/// Clip `raster` to the ellipse inscribed in its bounds.
///
/// A visible `border` is stroked along an ellipse inset by half the border
/// width, so the whole line stays inside the clip. A border wider than half
/// the shorter side fills to the center instead of failing. Pass a square raster for
/// a circle, or use [`mask_circle`].
pub fn mask_ellipse(raster: &Raster, border: BorderSpec) -> Result<Raster, RasterError> {
    mask_ellipse_with(raster, border, &RenderOptions::default())
}

pub fn mask_ellipse_with(
    raster: &Raster,
    border: BorderSpec,
    options: &RenderOptions,
) -> Result<Raster, RasterError> {
    let src = upright(raster)?;
    let size = src.logical_size();
    let out = Canvas::render(size, src.scale(), options, |canvas| {
        let rect = canvas.bounds();
        canvas.clip_path(&oval(rect)?)?;
        canvas.draw_raster(&src, rect)?;
        stroke_inset_oval(canvas, rect, border)
    })
    .inspect_err(|e| log::warn!("ellipse mask failed: {}", e))?;

    log::debug!("ellipse mask {}x{}", out.width(), out.height());
    Ok(out)
}

/// Circular mask over the largest centered square of `raster`.
///
/// The output is square with side equal to the shorter source side; the
/// longer axis is trimmed evenly on both ends.
pub fn mask_circle(raster: &Raster, border: BorderSpec) -> Result<Raster, RasterError> {
    mask_circle_with(raster, border, &RenderOptions::default())
}

pub fn mask_circle_with(
    raster: &Raster,
    border: BorderSpec,
    options: &RenderOptions,
) -> Result<Raster, RasterError> {
    let src = upright(raster)?;
    let size = src.logical_size();
    let side = size.width.min(size.height);

    Canvas::render(Size::new(side, side), src.scale(), options, |canvas| {
        let rect = canvas.bounds();
        canvas.clip_path(&oval(rect)?)?;
        let placement = Rect::new(
            (side - size.width) / 2.0,
            (side - size.height) / 2.0,
            size.width,
            size.height,
        );
        canvas.draw_raster(&src, placement)?;
        stroke_inset_oval(canvas, rect, border)
    })
    .inspect_err(|e| log::warn!("circle mask failed: {}", e))
}

/// Clip `raster` to a rounded rectangle spanning its bounds.
///
/// A visible `border` is stroked along the clip boundary at twice the
/// requested width; the outer half falls outside the clip, leaving a line of
/// the requested width that follows the corner radius.
pub fn mask_rounded_rect(
    raster: &Raster,
    corner_radius: f32,
    border: BorderSpec,
) -> Result<Raster, RasterError> {
    mask_rounded_rect_with(raster, corner_radius, border, &RenderOptions::default())
}

pub fn mask_rounded_rect_with(
    raster: &Raster,
    corner_radius: f32,
    border: BorderSpec,
    options: &RenderOptions,
) -> Result<Raster, RasterError> {
    let src = upright(raster)?;
    Canvas::render(src.logical_size(), src.scale(), options, |canvas| {
        let rect = canvas.bounds();
        let shape = rounded_rect(rect, corner_radius)?;
        canvas.clip_path(&shape)?;
        canvas.draw_raster(&src, rect)?;
        if border.is_visible() {
            canvas.stroke_path(&shape, border.width * 2.0, border.color);
        }
        Ok(())
    })
    .inspect_err(|e| log::warn!("rounded rect mask failed: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Orientation;

    const RED: [u8; 4] = [255, 0, 0, 255];

    fn opaque(width: u32, height: u32) -> Raster {
        Raster::solid(width, height, [40, 160, 220, 255]).unwrap()
    }

    fn alpha(raster: &Raster, x: u32, y: u32) -> u8 {
        raster.pixel(x, y).unwrap()[3]
    }

    fn close(px: [u8; 4], expected: [u8; 4]) -> bool {
        px.iter().zip(expected).all(|(&a, b)| (a as i16 - b as i16).abs() <= 2)
    }

    fn is_red(px: [u8; 4]) -> bool {
        px[0] > 245 && px[1] < 10 && px[2] < 10 && px[3] > 245
    }

    #[test]
    fn test_ellipse_corner_transparent_center_opaque() {
        let out = mask_ellipse(&opaque(100, 60), BorderSpec::none()).unwrap();

        assert_eq!((out.width(), out.height()), (100, 60));
        assert_eq!(alpha(&out, 0, 0), 0);
        assert_eq!(alpha(&out, 99, 59), 0);
        assert_eq!(alpha(&out, 50, 30), 255);
        assert!(close(out.pixel(50, 30).unwrap(), [40, 160, 220, 255]));
    }

    #[test]
    fn test_ellipse_border_inside_clip() {
        let out = mask_ellipse(&opaque(100, 100), BorderSpec::new(10.0, RED)).unwrap();

        // 3px below the top edge is inside the 10px ring
        assert!(is_red(out.pixel(50, 3).unwrap()));
        // Well inside the ring the source shows through
        assert!(close(out.pixel(50, 50).unwrap(), [40, 160, 220, 255]));
        assert_eq!(alpha(&out, 0, 0), 0);
    }

    #[test]
    fn test_ellipse_border_wider_than_raster() {
        let out = mask_ellipse(&opaque(10, 10), BorderSpec::new(12.0, RED)).unwrap();
        assert_eq!((out.width(), out.height()), (10, 10));
        assert!(is_red(out.pixel(5, 5).unwrap()));
        assert_eq!(alpha(&out, 0, 0), 0);

        let out = mask_ellipse(&opaque(30, 10), BorderSpec::new(50.0, RED)).unwrap();
        assert_eq!((out.width(), out.height()), (30, 10));
    }

    #[test]
    fn test_ellipse_border_of_half_side_fills_center() {
        let out = mask_ellipse(&opaque(20, 20), BorderSpec::new(10.0, RED)).unwrap();
        assert!(is_red(out.pixel(10, 10).unwrap()));
    }

    #[test]
    fn test_ellipse_keeps_device_scale() {
        let out = mask_ellipse(&opaque(40, 40).with_scale(2.0), BorderSpec::none()).unwrap();
        assert_eq!((out.width(), out.height()), (40, 40));
        assert_eq!(out.scale(), 2.0);
    }

    #[test]
    fn test_ellipse_normalizes_orientation() {
        let img = opaque(30, 10).with_orientation(Orientation::Rotate90CW);
        let out = mask_ellipse(&img, BorderSpec::none()).unwrap();
        assert_eq!((out.width(), out.height()), (10, 30));
    }

    #[test]
    fn test_circle_is_square() {
        let out = mask_circle(&opaque(120, 80), BorderSpec::none()).unwrap();
        assert_eq!((out.width(), out.height()), (80, 80));
        assert_eq!(alpha(&out, 0, 0), 0);
        assert_eq!(alpha(&out, 40, 40), 255);
        assert_eq!(alpha(&out, 40, 1), 255);
    }

    #[test]
    fn test_circle_takes_center_of_long_axis() {
        // Left third red, rest blue: a centered 10x10 circle sees only blue
        let mut pixels = Vec::new();
        for _y in 0..10 {
            for x in 0..30 {
                if x < 10 {
                    pixels.extend_from_slice(&RED);
                } else {
                    pixels.extend_from_slice(&[0, 0, 255, 255]);
                }
            }
        }
        let img = Raster::new(30, 10, pixels).unwrap();
        let out = mask_circle(&img, BorderSpec::none()).unwrap();
        assert!(close(out.pixel(5, 5).unwrap(), [0, 0, 255, 255]));
    }

    #[test]
    fn test_circle_border_wider_than_side() {
        let out = mask_circle(&opaque(20, 10), BorderSpec::new(12.0, RED)).unwrap();
        assert_eq!((out.width(), out.height()), (10, 10));
        assert!(is_red(out.pixel(5, 5).unwrap()));
    }

    #[test]
    fn test_rounded_rect_corners() {
        let out = mask_rounded_rect(&opaque(100, 60), 20.0, BorderSpec::none()).unwrap();

        assert_eq!(alpha(&out, 0, 0), 0);
        assert_eq!(alpha(&out, 99, 0), 0);
        assert_eq!(alpha(&out, 0, 59), 0);
        assert_eq!(alpha(&out, 99, 59), 0);
        // Straight edges are untouched
        assert_eq!(alpha(&out, 1, 30), 255);
        assert_eq!(alpha(&out, 50, 1), 255);
        assert_eq!(alpha(&out, 50, 30), 255);
    }

    #[test]
    fn test_rounded_rect_zero_radius_is_full_rect() {
        let out = mask_rounded_rect(&opaque(20, 20), 0.0, BorderSpec::none()).unwrap();
        assert!(out.pixels().chunks_exact(4).all(|p| p[3] == 255));
    }

    #[test]
    fn test_rounded_rect_border_visible_width() {
        let out = mask_rounded_rect(&opaque(100, 60), 10.0, BorderSpec::new(4.0, RED)).unwrap();

        // Border covers the first 4px inside the edge
        assert!(is_red(out.pixel(1, 30).unwrap()));
        assert!(is_red(out.pixel(50, 2).unwrap()));
        // And stops there
        assert!(close(out.pixel(8, 30).unwrap(), [40, 160, 220, 255]));
    }

    #[test]
    fn test_rounded_rect_border_wider_than_raster() {
        let out = mask_rounded_rect(&opaque(20, 20), 4.0, BorderSpec::new(40.0, RED)).unwrap();
        assert_eq!((out.width(), out.height()), (20, 20));
        assert!(is_red(out.pixel(10, 10).unwrap()));
        assert_eq!(alpha(&out, 0, 0), 0);
    }

    #[test]
    fn test_rounded_rect_radius_clamped() {
        let path = rounded_rect(Rect::new(0.0, 0.0, 20.0, 10.0), 100.0).unwrap();
        let b = path.bounds();
        assert!((b.width() - 20.0).abs() < 1e-3);
        assert!((b.height() - 10.0).abs() < 1e-3);
    }
}
