//! Luminance helpers using ITU-R BT.709 coefficients.
//!
//! Stencil masks read an RGBA image as gray; these functions define that
//! reduction.

/// ITU-R BT.709 coefficient for red channel in luminance calculation.
pub const LUMINANCE_R: f32 = 0.2126;

/// ITU-R BT.709 coefficient for green channel in luminance calculation.
pub const LUMINANCE_G: f32 = 0.7152;

/// ITU-R BT.709 coefficient for blue channel in luminance calculation.
pub const LUMINANCE_B: f32 = 0.0722;

/// Calculate luminance from u8 RGB values (0 to 255).
#[inline]
pub fn calculate_luminance_u8(r: u8, g: u8, b: u8) -> u8 {
    let lum = LUMINANCE_R * r as f32 + LUMINANCE_G * g as f32 + LUMINANCE_B * b as f32;
    lum.clamp(0.0, 255.0).round() as u8
}

/// Gray value of a straight RGBA pixel composited over white.
///
/// Fully transparent pixels read as white (255).
#[inline]
pub fn gray_over_white(r: u8, g: u8, b: u8, a: u8) -> u8 {
    let lum = calculate_luminance_u8(r, g, b) as u32;
    let a = a as u32;
    ((lum * a + 255 * (255 - a) + 127) / 255) as u8
}
