//! Scale-to-fit math.

/// Fraction of the frame that fitted content may occupy; leaves a 2.5% margin per side.
pub const SAFETY_MARGIN: f64 = 0.95;

/// Size at which content is drawn inside a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawSize {
    /// Drawn width in logical pixels.
    pub width: f64,
    /// Drawn height in logical pixels.
    pub height: f64,
}

/// Fit content of `content_aspect` inside a `frame_w x frame_h` frame without cropping, then
/// shrink by [`SAFETY_MARGIN`].
///
/// Content relatively wider than the frame is width-limited, otherwise height-limited.
/// Degenerate aspects (zero, negative, non-finite) fall back to the frame's own aspect.
pub fn fit_contain(content_aspect: f64, frame_aspect: f64, frame_w: f64, frame_h: f64) -> DrawSize {
    let content_aspect = if content_aspect.is_finite() && content_aspect > 0.0 {
        content_aspect
    } else {
        frame_aspect
    };

    let (w, h) = if content_aspect > frame_aspect {
        (frame_w, frame_w / content_aspect)
    } else {
        (frame_h * content_aspect, frame_h)
    };

    DrawSize {
        width: w * SAFETY_MARGIN,
        height: h * SAFETY_MARGIN,
    }
}

/// Like [`fit_contain`], but fits the bounding box of the content after `quarter_turns`
/// clockwise 90° turns, and returns the unrotated draw size.
///
/// For even turns this is exactly [`fit_contain`]; for odd turns the content's axes swap
/// inside the frame, so the fit is computed on the inverted aspect.
pub fn fit_contain_rotated(
    content_aspect: f64,
    frame_w: f64,
    frame_h: f64,
    quarter_turns: u32,
) -> DrawSize {
    let frame_aspect = frame_w / frame_h;
    if quarter_turns % 2 == 0 {
        return fit_contain(content_aspect, frame_aspect, frame_w, frame_h);
    }
    let rotated = fit_contain(1.0 / content_aspect, frame_aspect, frame_w, frame_h);
    DrawSize {
        width: rotated.height,
        height: rotated.width,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/fit.rs"]
mod tests;
