use crate::foundation::error::{PhotofitError, PhotofitResult};
use crate::source::loader::SourceImage;

/// Slack allowed when checking crop bounds, in natural pixels.
const BOUNDS_EPSILON: f64 = 1e-6;

/// Unit a [`Crop`] is expressed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropUnit {
    /// Percent of the displayed image, `0..=100` on each axis.
    Percent,
    /// Pixels of the displayed (laid-out) image.
    Pixel,
}

/// Crop rectangle as produced by the UI, in either unit.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Crop {
    /// Unit of all four coordinates.
    pub unit: CropUnit,
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Crop {
    /// Percent-unit crop.
    pub fn percent(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            unit: CropUnit::Percent,
            x,
            y,
            width,
            height,
        }
    }

    /// Display-pixel crop.
    pub fn pixels(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            unit: CropUnit::Pixel,
            x,
            y,
            width,
            height,
        }
    }

    /// True when the rectangle has no usable area.
    pub fn is_degenerate(&self) -> bool {
        !(self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0)
    }

    /// Same rectangle in percent units of a `display_w x display_h` image.
    pub fn to_percent(&self, display_w: u32, display_h: u32) -> Crop {
        match self.unit {
            CropUnit::Percent => *self,
            CropUnit::Pixel => {
                let sx = 100.0 / f64::from(display_w.max(1));
                let sy = 100.0 / f64::from(display_h.max(1));
                Crop::percent(
                    self.x * sx,
                    self.y * sy,
                    self.width * sx,
                    self.height * sy,
                )
            }
        }
    }

    /// Normalize into whole natural pixels of `source`.
    ///
    /// This is the single place crop units are converted; nothing downstream sees percents or
    /// display pixels. Zero-area, non-finite and out-of-bounds rectangles are
    /// [`PhotofitError::InvalidCropState`].
    pub fn resolve(&self, source: &SourceImage) -> PhotofitResult<SourceRect> {
        if self.is_degenerate() {
            return Err(PhotofitError::invalid_crop(format!(
                "crop has no area: {self:?}"
            )));
        }

        let nw = f64::from(source.natural_width());
        let nh = f64::from(source.natural_height());
        let (sx, sy) = match self.unit {
            CropUnit::Percent => (nw / 100.0, nh / 100.0),
            CropUnit::Pixel => (
                nw / f64::from(source.display_width()),
                nh / f64::from(source.display_height()),
            ),
        };

        let left = self.x * sx;
        let top = self.y * sy;
        let right = left + self.width * sx;
        let bottom = top + self.height * sy;
        if left < -BOUNDS_EPSILON
            || top < -BOUNDS_EPSILON
            || right > nw + BOUNDS_EPSILON
            || bottom > nh + BOUNDS_EPSILON
        {
            return Err(PhotofitError::invalid_crop(format!(
                "crop {self:?} exceeds the {nw}x{nh} source"
            )));
        }

        let (x0, x1) = snap_span(left, right, source.natural_width());
        let (y0, y1) = snap_span(top, bottom, source.natural_height());
        Ok(SourceRect {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        })
    }
}

// Round a float span to whole pixels inside `0..len`, keeping at least one pixel.
fn snap_span(start: f64, end: f64, len: u32) -> (u32, u32) {
    let len_f = f64::from(len);
    let s = (start.round().clamp(0.0, len_f - 1.0)) as u32;
    let e = (end.round().clamp(0.0, len_f)) as u32;
    (s, e.max(s + 1))
}

/// Crop snapshot taken when a drag/resize interaction ends.
///
/// Export only ever uses a completed crop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompletedCrop(Crop);

impl CompletedCrop {
    /// Freeze `crop` as the authoritative region.
    pub fn new(crop: Crop) -> Self {
        Self(crop)
    }

    /// The frozen rectangle.
    pub fn crop(&self) -> &Crop {
        &self.0
    }
}

/// Crop rectangle in whole natural pixels of the source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SourceRect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width, always at least 1.
    pub width: u32,
    /// Height, always at least 1.
    pub height: u32,
}

impl SourceRect {
    /// Width divided by height.
    pub fn aspect(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/crop/rect.rs"]
mod tests;
