use crate::foundation::error::{PhotofitError, PhotofitResult};
use crate::foundation::math::unpremultiply_rgba8_in_place;

/// A composited frame as RGBA8 pixels.
///
/// Pixels are **premultiplied alpha**, tightly packed, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8 bytes.
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// Premultiplied `[r, g, b, a]` at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.data.get(i..i + 4).map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// Copy of the pixels converted to straight alpha.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut straight = self.data.clone();
        unpremultiply_rgba8_in_place(&mut straight);
        straight
    }

    /// Straight-alpha image ready for encoding.
    pub fn to_rgba_image(&self) -> PhotofitResult<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.to_straight_rgba8()).ok_or_else(
            || {
                PhotofitError::encode(format!(
                    "pixel buffer of {} bytes does not hold {}x{} rgba8",
                    self.data.len(),
                    self.width,
                    self.height
                ))
            },
        )
    }
}
