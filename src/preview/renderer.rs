use std::time::{Duration, Instant};

use crate::crop::rect::Crop;
use crate::foundation::error::PhotofitResult;
use crate::render::buffer::PixelBuffer;
use crate::render::compositor::{RenderRequest, render, target_canvas};
use crate::source::loader::SourceImage;
use crate::spec::model::OutputSpec;
use crate::transform::state::TransformState;

/// Live preview painter.
///
/// Previews use the live crop (including mid-drag) and are drawn at a reduced pixel ratio so
/// the longer edge never exceeds `max_edge`. The first paint after a new source is held back
/// for a short settle delay.
#[derive(Clone, Debug)]
pub struct PreviewRenderer {
    max_edge: u32,
    settle: Duration,
    ready_at: Option<Instant>,
}

impl PreviewRenderer {
    /// Renderer bounded to `max_edge` physical pixels, waiting `settle` after each load.
    pub fn new(max_edge: u32, settle: Duration) -> Self {
        Self {
            max_edge: max_edge.max(1),
            settle,
            ready_at: None,
        }
    }

    /// Start the settle delay for a freshly loaded source.
    pub fn notify_source_loaded(&mut self, now: Instant) {
        self.ready_at = Some(now + self.settle);
    }

    /// True once the settle delay has elapsed.
    pub fn is_ready(&self, now: Instant) -> bool {
        self.ready_at.is_some_and(|t| now >= t)
    }

    /// Physical pixels per logical pixel for the given target.
    pub fn pixel_ratio(&self, spec: Option<&OutputSpec>) -> f64 {
        let canvas = target_canvas(spec);
        let longer = canvas.width.max(canvas.height);
        (f64::from(self.max_edge) / f64::from(longer)).min(1.0)
    }

    /// Paint a preview, or `Ok(None)` while the settle delay is running.
    #[tracing::instrument(skip_all)]
    pub fn render(
        &self,
        source: &SourceImage,
        crop: &Crop,
        transform: &TransformState,
        spec: Option<&OutputSpec>,
        use_background: bool,
        now: Instant,
    ) -> PhotofitResult<Option<PixelBuffer>> {
        if !self.is_ready(now) {
            tracing::debug!("preview deferred");
            return Ok(None);
        }
        let req = RenderRequest {
            source,
            crop,
            transform,
            spec,
            use_background,
            pixel_ratio: self.pixel_ratio(spec),
        };
        render(&req).map(Some)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/preview/renderer.rs"]
mod tests;
