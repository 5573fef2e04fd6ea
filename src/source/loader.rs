use std::io::Cursor;
use std::sync::Arc;

use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageFormat, ImageReader};

use crate::foundation::core::Canvas;
use crate::foundation::error::{PhotofitError, PhotofitResult};
use crate::foundation::math::premultiply_rgba8_in_place;

/// Upload formats accepted by [`load`].
pub const SUPPORTED_FORMATS: [ImageFormat; 3] =
    [ImageFormat::Jpeg, ImageFormat::Png, ImageFormat::WebP];

/// Decoded upload held for the lifetime of an editing session.
///
/// Pixels are immutable and shared behind an [`Arc`], so cloning is cheap and any number of
/// renders may read the same source concurrently.
#[derive(Clone, Debug)]
pub struct SourceImage {
    natural: Canvas,
    display: Canvas,
    rgba8_premul: Arc<Vec<u8>>,
}

impl SourceImage {
    /// Wrap straight-alpha RGBA8 pixels. Display size starts equal to the natural size.
    pub fn from_rgba8(width: u32, height: u32, mut rgba8: Vec<u8>) -> PhotofitResult<Self> {
        let natural = Canvas::new(width, height)?;
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| PhotofitError::validation("source image size overflow"))?;
        if rgba8.len() != expected {
            return Err(PhotofitError::validation(format!(
                "source pixel buffer has {} bytes, expected {expected}",
                rgba8.len()
            )));
        }
        premultiply_rgba8_in_place(&mut rgba8);
        Ok(Self {
            natural,
            display: natural,
            rgba8_premul: Arc::new(rgba8),
        })
    }

    /// Record the size the image is laid out at on screen.
    ///
    /// Pixel-unit crops are expressed against this size.
    pub fn with_display_size(mut self, width: u32, height: u32) -> PhotofitResult<Self> {
        self.display = Canvas::new(width, height)?;
        Ok(self)
    }

    /// Intrinsic width in pixels.
    pub fn natural_width(&self) -> u32 {
        self.natural.width
    }

    /// Intrinsic height in pixels.
    pub fn natural_height(&self) -> u32 {
        self.natural.height
    }

    /// Laid-out width in pixels.
    pub fn display_width(&self) -> u32 {
        self.display.width
    }

    /// Laid-out height in pixels.
    pub fn display_height(&self) -> u32 {
        self.display.height
    }

    /// Intrinsic width divided by intrinsic height.
    pub fn natural_aspect(&self) -> f64 {
        self.natural.aspect()
    }

    /// Row-major premultiplied RGBA8 pixels at natural size.
    pub fn rgba8_premul(&self) -> &[u8] {
        &self.rgba8_premul
    }
}

/// Decode uploaded bytes into a [`SourceImage`].
///
/// Only JPEG, PNG and WEBP are accepted; anything else, including truncated or corrupt data,
/// is [`PhotofitError::UnsupportedFormat`]. An EXIF orientation tag is applied, so the natural
/// size is the upright size a browser would lay out.
#[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
pub fn load(bytes: &[u8]) -> PhotofitResult<SourceImage> {
    let format = image::guess_format(bytes)
        .map_err(|e| PhotofitError::unsupported_format(format!("unrecognized image data: {e}")))?;
    if !SUPPORTED_FORMATS.contains(&format) {
        return Err(PhotofitError::unsupported_format(format!(
            "{format:?} uploads are not supported"
        )));
    }

    let decode_err = |e: image::ImageError| {
        PhotofitError::unsupported_format(format!("decode {format:?}: {e}"))
    };
    let mut decoder = ImageReader::with_format(Cursor::new(bytes), format)
        .into_decoder()
        .map_err(decode_err)?;
    let orientation = decoder.orientation().unwrap_or_else(|e| {
        tracing::debug!(error = %e, "unreadable orientation metadata, keeping stored layout");
        Orientation::NoTransforms
    });
    let mut dyn_img = DynamicImage::from_decoder(decoder).map_err(decode_err)?;
    dyn_img.apply_orientation(orientation);

    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    tracing::debug!(?format, ?orientation, width, height, "decoded source image");

    SourceImage::from_rgba8(width, height, rgba.into_raw())
}

#[cfg(test)]
#[path = "../../tests/unit/source/loader.rs"]
mod tests;
