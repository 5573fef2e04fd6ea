use serde::{Deserialize, Serialize};

use crate::foundation::color::Rgba8;
use crate::foundation::core::Canvas;
use crate::foundation::error::{PhotofitError, PhotofitResult};
use crate::geometry::ratio::{reduce_ratio, reduce_ratio_str};

/// Smallest edge accepted for user-entered custom sizes.
pub const CUSTOM_MIN_EDGE: u32 = 100;
/// Largest edge accepted for user-entered custom sizes.
pub const CUSTOM_MAX_EDGE: u32 = 2000;

/// Named target geometry a photo is fitted into.
///
/// Immutable once built; the aspect ratio string is always in lowest terms.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "OutputSpecRepr", rename_all = "camelCase")]
pub struct OutputSpec {
    name: String,
    width: u32,
    height: u32,
    aspect_ratio: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    background_color: Option<Rgba8>,
    description: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OutputSpecRepr {
    name: String,
    width: u32,
    height: u32,
    #[serde(default)]
    aspect_ratio: Option<String>,
    #[serde(default, alias = "bgColor")]
    background_color: Option<Rgba8>,
    #[serde(default)]
    description: String,
}

impl TryFrom<OutputSpecRepr> for OutputSpec {
    type Error = PhotofitError;

    fn try_from(r: OutputSpecRepr) -> Result<Self, Self::Error> {
        let spec = OutputSpec::new(r.name, r.width, r.height, r.background_color, r.description)?;
        if let Some(declared) = r.aspect_ratio
            && reduce_ratio_str(&declared)? != spec.aspect_ratio
        {
            return Err(PhotofitError::validation(format!(
                "spec \"{}\" declares ratio {declared} but {}x{} is {}",
                spec.name, spec.width, spec.height, spec.aspect_ratio
            )));
        }
        Ok(spec)
    }
}

impl OutputSpec {
    /// Build a spec, deriving its reduced aspect ratio.
    pub fn new(
        name: impl Into<String>,
        width: u32,
        height: u32,
        background_color: Option<Rgba8>,
        description: impl Into<String>,
    ) -> PhotofitResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PhotofitError::validation("spec name must not be empty"));
        }
        let canvas = Canvas::new(width, height)?;
        if canvas.width > u32::from(u16::MAX) || canvas.height > u32::from(u16::MAX) {
            return Err(PhotofitError::validation(format!(
                "spec \"{name}\" is {width}x{height}; edges are limited to {}",
                u16::MAX
            )));
        }
        Ok(Self {
            aspect_ratio: reduce_ratio(width, height)?,
            name,
            width,
            height,
            background_color,
            description: description.into(),
        })
    }

    /// Spec from user-entered pixel dimensions, each within
    /// `CUSTOM_MIN_EDGE..=CUSTOM_MAX_EDGE`.
    pub fn custom(width: u32, height: u32, background_color: Option<Rgba8>) -> PhotofitResult<Self> {
        for (label, v) in [("width", width), ("height", height)] {
            if !(CUSTOM_MIN_EDGE..=CUSTOM_MAX_EDGE).contains(&v) {
                return Err(PhotofitError::validation(format!(
                    "{label} must be between {CUSTOM_MIN_EDGE} and {CUSTOM_MAX_EDGE} px, got {v}"
                )));
            }
        }
        Self::new(
            format!("custom_{width}x{height}"),
            width,
            height,
            background_color,
            format!("{width}×{height}px custom"),
        )
    }

    /// Display name; also the stem of the exported file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Output width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Output height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Reduced `"W:H"` ratio.
    pub fn aspect_ratio(&self) -> &str {
        &self.aspect_ratio
    }

    /// Optional background fill.
    pub fn background_color(&self) -> Option<Rgba8> {
        self.background_color
    }

    /// Free-form description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Output size as a canvas.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Width divided by height.
    pub fn target_aspect(&self) -> f64 {
        self.canvas().aspect()
    }

    /// Suggested file name for an export, `"{name}_edited.png"`.
    ///
    /// Path separators and control characters in the name are replaced with `_`.
    pub fn export_filename(&self) -> String {
        let stem: String = self
            .name
            .chars()
            .map(|c| {
                if matches!(c, '/' | '\\' | ':') || c.is_control() {
                    '_'
                } else {
                    c
                }
            })
            .collect();
        format!("{stem}_edited.png")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/spec/model.rs"]
mod tests;
