use crate::foundation::error::{PhotofitError, PhotofitResult};

pub use kurbo::{Affine, Vec2};

/// Logical size of an output frame in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Fallback frame used when no output spec is active.
    pub const FALLBACK: Canvas = Canvas {
        width: 400,
        height: 400,
    };

    /// Build a canvas, rejecting zero-sized dimensions.
    pub fn new(width: u32, height: u32) -> PhotofitResult<Self> {
        if width == 0 || height == 0 {
            return Err(PhotofitError::validation(format!(
                "canvas must be non-empty, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Width divided by height.
    pub fn aspect(self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    /// Physical size after applying a device pixel ratio, never smaller than 1x1.
    pub fn scaled(self, pixel_ratio: f64) -> Canvas {
        let scale = |v: u32| ((f64::from(v) * pixel_ratio).round().max(1.0)) as u32;
        Canvas {
            width: scale(self.width),
            height: scale(self.height),
        }
    }
}
