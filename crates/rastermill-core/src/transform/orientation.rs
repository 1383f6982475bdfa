//! Orientation tags and upright normalization.
//!
//! Stored pixels may need one of eight transforms (identity, three
//! rotations and their mirrored counterparts) to be presented upright.
//! Normalization bakes that transform into a new buffer and resets the tag.

use std::borrow::Cow;
use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::imageops;
use serde::{Deserialize, Serialize};

use crate::raster::Raster;
use crate::types::RasterError;

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orientation {
    /// Normal (no transformation needed).
    #[default]
    Normal = 1,
    /// Horizontal flip.
    FlipHorizontal = 2,
    /// Rotate 180 degrees.
    Rotate180 = 3,
    /// Vertical flip.
    FlipVertical = 4,
    /// Transpose (flip horizontal + rotate 270 CW).
    Transpose = 5,
    /// Rotate 90 degrees clockwise.
    Rotate90CW = 6,
    /// Transverse (flip horizontal + rotate 90 CW).
    Transverse = 7,
    /// Rotate 270 degrees clockwise (90 CCW).
    Rotate270CW = 8,
}

impl Orientation {
    /// Returns true if this orientation swaps width and height dimensions.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Orientation::Transpose
                | Orientation::Rotate90CW
                | Orientation::Transverse
                | Orientation::Rotate270CW
        )
    }

    /// Whether the pixels are already upright.
    #[inline]
    pub fn is_upright(self) -> bool {
        self == Orientation::Normal
    }

    /// Output dimensions after normalizing a `width` x `height` buffer.
    pub fn oriented_dimensions(self, width: u32, height: u32) -> (u32, u32) {
        if self.swaps_dimensions() {
            (height, width)
        } else {
            (width, height)
        }
    }

    /// Read the orientation tag from EXIF data.
    ///
    /// Accepts either a container holding an EXIF block (JPEG, TIFF, PNG,
    /// HEIF, WebP) or a bare TIFF-structured EXIF blob. Returns `Normal`
    /// when no tag can be found.
    pub fn from_exif_bytes(bytes: &[u8]) -> Self {
        let reader = Reader::new();
        let mut cursor = Cursor::new(bytes);

        let exif = match reader.read_from_container(&mut cursor) {
            Ok(exif) => exif,
            Err(_) => match reader.read_raw(bytes.to_vec()) {
                Ok(exif) => exif,
                Err(_) => return Orientation::Normal,
            },
        };

        exif.get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default()
    }
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            1 => Orientation::Normal,
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// Return an upright copy of `raster`.
///
/// Width and height swap for the four quarter-turn variants. The device
/// scale is kept and the tag is reset to `Normal`. An upright raster comes
/// back with identical pixel data.
///
/// # Errors
///
/// `SurfaceAllocation` if the output buffer cannot be built. Callers should
/// treat this as fatal for the rest of the pipeline.
pub fn normalize_orientation(raster: &Raster) -> Result<Raster, RasterError> {
    upright(raster).map(Cow::into_owned)
}

/// Borrow `raster` when already upright, otherwise build the upright copy.
pub(crate) fn upright(raster: &Raster) -> Result<Cow<'_, Raster>, RasterError> {
    let orientation = raster.orientation();
    if orientation.is_upright() {
        return Ok(Cow::Borrowed(raster));
    }

    let src = raster.to_rgba_image();
    // Each tag is a D4 group element; rotate first, then mirror.
    let oriented = match orientation {
        Orientation::Normal => src,
        Orientation::FlipHorizontal => imageops::flip_horizontal(&src),
        Orientation::Rotate180 => imageops::rotate180(&src),
        Orientation::FlipVertical => imageops::flip_vertical(&src),
        Orientation::Transpose => imageops::flip_horizontal(&imageops::rotate90(&src)),
        Orientation::Rotate90CW => imageops::rotate90(&src),
        Orientation::Transverse => imageops::flip_horizontal(&imageops::rotate270(&src)),
        Orientation::Rotate270CW => imageops::rotate270(&src),
    };

    let out = Raster::from_rgba_image(oriented)
        .map_err(|e| RasterError::SurfaceAllocation(e.to_string()))?
        .with_scale(raster.scale());

    log::debug!(
        "normalized orientation {:?}: {}x{} -> {}x{}",
        orientation,
        raster.width(),
        raster.height(),
        out.width(),
        out.height()
    );
    Ok(Cow::Owned(out))
}
