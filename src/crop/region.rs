use crate::crop::rect::Crop;

/// Share of the image (per axis) the default and auto-centered crops cover.
pub const DEFAULT_COVERAGE: f64 = 80.0;

/// Smallest crop edge, in percent.
pub const MIN_EDGE_PERCENT: f64 = 1.0;

/// Aspect-ratio lock of a [`CropRegion`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CropConstraint {
    /// Free-form resizing.
    Unconstrained,
    /// Locked to an output spec's aspect ratio.
    Constrained {
        /// Output width / height.
        target_aspect: f64,
        /// Source natural width / height.
        image_aspect: f64,
    },
}

impl CropConstraint {
    /// Width/height ratio the lock imposes in percent space, if any.
    ///
    /// Percent units are relative to each axis separately, so a pixel ratio `t` on an image of
    /// aspect `i` is a percent ratio `t / i`.
    pub fn percent_aspect(&self) -> Option<f64> {
        match *self {
            Self::Unconstrained => None,
            Self::Constrained {
                target_aspect,
                image_aspect,
            } => Some(target_aspect / image_aspect),
        }
    }
}

/// Resize handle being dragged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Handle {
    /// Top edge.
    North,
    /// Bottom edge.
    South,
    /// Right edge.
    East,
    /// Left edge.
    West,
    /// Top-right corner.
    NorthEast,
    /// Top-left corner.
    NorthWest,
    /// Bottom-right corner.
    SouthEast,
    /// Bottom-left corner.
    SouthWest,
}

impl Handle {
    fn dx(self) -> i8 {
        match self {
            Self::East | Self::NorthEast | Self::SouthEast => 1,
            Self::West | Self::NorthWest | Self::SouthWest => -1,
            Self::North | Self::South => 0,
        }
    }

    fn dy(self) -> i8 {
        match self {
            Self::South | Self::SouthEast | Self::SouthWest => 1,
            Self::North | Self::NorthEast | Self::NorthWest => -1,
            Self::East | Self::West => 0,
        }
    }
}

/// Centered crop for a target aspect on an image of `image_aspect`, in percent units.
///
/// The longer relative axis covers [`DEFAULT_COVERAGE`] percent, the other is derived from the
/// ratio. Degenerate ratios clamp each edge to `[MIN_EDGE_PERCENT, 100]`.
pub fn centered_crop(target_aspect: f64, image_aspect: f64) -> Crop {
    let (w, h) = if image_aspect > target_aspect {
        (DEFAULT_COVERAGE * target_aspect / image_aspect, DEFAULT_COVERAGE)
    } else {
        (DEFAULT_COVERAGE, DEFAULT_COVERAGE * image_aspect / target_aspect)
    };
    let w = clamp_edge(w);
    let h = clamp_edge(h);
    Crop::percent((100.0 - w) / 2.0, (100.0 - h) / 2.0, w, h)
}

fn clamp_edge(v: f64) -> f64 {
    if v.is_finite() {
        v.clamp(MIN_EDGE_PERCENT, 100.0)
    } else {
        MIN_EDGE_PERCENT
    }
}

/// Live crop rectangle in percent of the displayed image.
///
/// Invariant: `x + width <= 100`, `y + height <= 100`, both edges at least
/// [`MIN_EDGE_PERCENT`].
#[derive(Clone, Debug, PartialEq)]
pub struct CropRegion {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    constraint: CropConstraint,
}

impl Default for CropRegion {
    fn default() -> Self {
        let inset = (100.0 - DEFAULT_COVERAGE) / 2.0;
        Self {
            x: inset,
            y: inset,
            width: DEFAULT_COVERAGE,
            height: DEFAULT_COVERAGE,
            constraint: CropConstraint::Unconstrained,
        }
    }
}

impl CropRegion {
    /// Default 80% centered region, unconstrained.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current rectangle as a percent-unit [`Crop`].
    pub fn rect(&self) -> Crop {
        Crop::percent(self.x, self.y, self.width, self.height)
    }

    /// Current aspect lock.
    pub fn constraint(&self) -> CropConstraint {
        self.constraint
    }

    /// Whether an aspect ratio is locked.
    pub fn is_constrained(&self) -> bool {
        matches!(self.constraint, CropConstraint::Constrained { .. })
    }

    /// Lock to `target_aspect` for an image of natural size `natural_w x natural_h`, and
    /// recenter.
    pub fn constrain(&mut self, target_aspect: f64, natural_w: u32, natural_h: u32) {
        let image_aspect = f64::from(natural_w.max(1)) / f64::from(natural_h.max(1));
        self.constraint = CropConstraint::Constrained {
            target_aspect,
            image_aspect,
        };
        self.recenter();
        tracing::debug!(target_aspect, image_aspect, rect = ?self.rect(), "crop constrained");
    }

    /// Drop the aspect lock, keeping the rectangle as it is.
    pub fn release(&mut self) {
        self.constraint = CropConstraint::Unconstrained;
        tracing::debug!(rect = ?self.rect(), "crop released");
    }

    /// Restore the default rectangle under the current lock.
    pub fn reset(&mut self) {
        match self.constraint {
            CropConstraint::Unconstrained => *self = Self::default(),
            CropConstraint::Constrained { .. } => self.recenter(),
        }
    }

    fn recenter(&mut self) {
        if let CropConstraint::Constrained {
            target_aspect,
            image_aspect,
        } = self.constraint
        {
            let c = centered_crop(target_aspect, image_aspect);
            self.assign(c.x, c.y, c.width, c.height);
        }
    }

    /// Move the rectangle, stopping at the image edges.
    pub fn drag_by(&mut self, dx: f64, dy: f64) {
        if !(dx.is_finite() && dy.is_finite()) {
            return;
        }
        self.x = (self.x + dx).clamp(0.0, 100.0 - self.width);
        self.y = (self.y + dy).clamp(0.0, 100.0 - self.height);
    }

    /// Resize by dragging `handle` to `(px, py)` (percent units).
    ///
    /// The opposite edge or corner stays anchored. Under a lock only uniform scaling happens.
    pub fn resize(&mut self, handle: Handle, px: f64, py: f64) {
        if !(px.is_finite() && py.is_finite()) {
            return;
        }
        let px = px.clamp(0.0, 100.0);
        let py = py.clamp(0.0, 100.0);
        match self.constraint.percent_aspect() {
            None => self.resize_free(handle, px, py),
            Some(ratio) if ratio.is_finite() && ratio > 0.0 => {
                self.resize_locked(handle, px, py, ratio)
            }
            Some(_) => self.resize_free(handle, px, py),
        }
    }

    fn resize_free(&mut self, handle: Handle, px: f64, py: f64) {
        let (mut left, mut top) = (self.x, self.y);
        let (mut right, mut bottom) = (self.x + self.width, self.y + self.height);
        match handle.dx() {
            1 => right = px.clamp(left + MIN_EDGE_PERCENT, 100.0),
            -1 => left = px.clamp(0.0, right - MIN_EDGE_PERCENT),
            _ => {}
        }
        match handle.dy() {
            1 => bottom = py.clamp(top + MIN_EDGE_PERCENT, 100.0),
            -1 => top = py.clamp(0.0, bottom - MIN_EDGE_PERCENT),
            _ => {}
        }
        self.assign(left, top, right - left, bottom - top);
    }

    fn resize_locked(&mut self, handle: Handle, px: f64, py: f64, ratio: f64) {
        let (dx, dy) = (handle.dx(), handle.dy());
        let cx = self.x + self.width / 2.0;
        let cy = self.y + self.height / 2.0;

        // Anchor on the dragged axis is the opposite edge; on an undragged axis it is the center.
        let ax = match dx {
            1 => self.x,
            -1 => self.x + self.width,
            _ => cx,
        };
        let ay = match dy {
            1 => self.y,
            -1 => self.y + self.height,
            _ => cy,
        };
        let room = |anchor: f64, dir: i8| match dir {
            1 => 100.0 - anchor,
            -1 => anchor,
            _ => 2.0 * anchor.min(100.0 - anchor),
        };
        let max_w = room(ax, dx);
        let max_h = room(ay, dy);

        let cand_w = (f64::from(dx) * (px - ax)).max(0.0);
        let cand_h = (f64::from(dy) * (py - ay)).max(0.0);
        let mut w = match (dx, dy) {
            (0, _) => cand_h * ratio,
            (_, 0) => cand_w,
            _ => cand_w.max(cand_h * ratio),
        };
        let mut h = w / ratio;

        if w > max_w {
            w = max_w;
            h = w / ratio;
        }
        if h > max_h {
            h = max_h;
            w = h * ratio;
        }
        if w < MIN_EDGE_PERCENT {
            w = MIN_EDGE_PERCENT;
            h = w / ratio;
        }
        if h < MIN_EDGE_PERCENT {
            h = MIN_EDGE_PERCENT;
            w = h * ratio;
        }
        w = w.min(max_w.max(MIN_EDGE_PERCENT));
        h = h.min(max_h.max(MIN_EDGE_PERCENT));

        let x = match dx {
            1 => ax,
            -1 => ax - w,
            _ => ax - w / 2.0,
        };
        let y = match dy {
            1 => ay,
            -1 => ay - h,
            _ => ay - h / 2.0,
        };
        self.assign(x, y, w, h);
    }

    /// Replace the rectangle with one supplied by the UI.
    ///
    /// Pixel crops are converted with the given display size. Under a lock the height is
    /// re-derived from the width. The result is clamped into bounds.
    pub fn set_rect(&mut self, crop: &Crop, display_w: u32, display_h: u32) {
        let c = crop.to_percent(display_w, display_h);
        if c.is_degenerate() {
            return;
        }
        let mut w = c.width;
        let mut h = c.height;
        if let Some(ratio) = self.constraint.percent_aspect()
            && ratio.is_finite()
            && ratio > 0.0
        {
            h = w / ratio;
            if h > 100.0 {
                h = 100.0;
                w = h * ratio;
            }
            if w > 100.0 {
                w = 100.0;
                h = w / ratio;
            }
        }
        self.assign(c.x, c.y, w, h);
    }

    // Store a rectangle, enforcing the region invariant.
    fn assign(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.width = clamp_edge(w);
        self.height = clamp_edge(h);
        self.x = if x.is_finite() { x } else { 0.0 }.clamp(0.0, 100.0 - self.width);
        self.y = if y.is_finite() { y } else { 0.0 }.clamp(0.0, 100.0 - self.height);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/crop/region.rs"]
mod tests;
