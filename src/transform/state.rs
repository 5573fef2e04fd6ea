use crate::foundation::core::Affine;

/// Smallest zoom factor.
pub const MIN_SCALE: f64 = 0.5;
/// Largest zoom factor.
pub const MAX_SCALE: f64 = 3.0;

/// One quarter-turn rotation step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RotationStep {
    /// +90 degrees.
    Clockwise,
    /// -90 degrees.
    CounterClockwise,
}

impl RotationStep {
    /// Signed degrees of this step.
    pub fn degrees(self) -> i32 {
        match self {
            Self::Clockwise => 90,
            Self::CounterClockwise => -90,
        }
    }
}

/// User zoom and rotation applied to the cropped content.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformState {
    scale: f64,
    rotation_degrees: i32,
}

impl Default for TransformState {
    fn default() -> Self {
        Self {
            scale: 1.0,
            rotation_degrees: 0,
        }
    }
}

impl TransformState {
    /// Identity transform.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current zoom factor, always within `[MIN_SCALE, MAX_SCALE]`.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Accumulated rotation; may lie outside `0..360`.
    pub fn rotation_degrees(&self) -> i32 {
        self.rotation_degrees
    }

    /// Rotation folded into `0..360`; only this value is used for rendering.
    pub fn normalized_rotation(&self) -> i32 {
        self.rotation_degrees.rem_euclid(360)
    }

    /// Number of clockwise quarter turns, `0..4`.
    pub fn quarter_turns(&self) -> u32 {
        (self.normalized_rotation() / 90) as u32
    }

    /// Add `delta` to the zoom, silently clamping. Non-finite deltas are ignored.
    pub fn adjust_scale(&mut self, delta: f64) {
        if !delta.is_finite() {
            return;
        }
        self.scale = (self.scale + delta).clamp(MIN_SCALE, MAX_SCALE);
    }

    /// Rotate by one quarter turn. The stored angle keeps accumulating.
    pub fn rotate(&mut self, step: RotationStep) {
        self.rotation_degrees = self.rotation_degrees.saturating_add(step.degrees());
    }

    /// Back to scale 1, rotation 0.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Content transform about the origin: rotate, then scale.
    ///
    /// Callers pre-multiply the translation to the frame center.
    pub fn to_affine(&self) -> Affine {
        let radians = f64::from(self.normalized_rotation()).to_radians();
        Affine::rotate(radians) * Affine::scale(self.scale)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/state.rs"]
mod tests;
