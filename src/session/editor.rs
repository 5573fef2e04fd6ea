use std::time::Instant;

use crate::crop::rect::{CompletedCrop, Crop};
use crate::crop::region::{CropRegion, Handle};
use crate::export::encoder::{ExportRequest, encode};
use crate::export::sink::{EncodedImage, ImageSink};
use crate::foundation::config::EditorConfig;
use crate::foundation::error::{PhotofitError, PhotofitResult};
use crate::preview::renderer::PreviewRenderer;
use crate::render::buffer::PixelBuffer;
use crate::source::loader::{SourceImage, load};
use crate::spec::catalogue::SpecProvider;
use crate::spec::model::OutputSpec;
use crate::transform::state::{RotationStep, TransformState};

/// One photo being fitted to one output spec.
///
/// Holds the live crop region, the crop recorded at the end of the last interaction, the user
/// transform, the selected spec and the background toggle. Preview renders use the live crop;
/// exports use the recorded one.
///
/// Previews are pulled, not pushed: the session never paints on its own. Hosts call
/// [`EditorSession::preview`] after every call that changes the crop, transform, spec, source
/// or background toggle (including each `drag_by`/`resize` mid-drag) and repaint from the
/// returned buffer.
#[derive(Debug)]
pub struct EditorSession {
    config: EditorConfig,
    source: Option<SourceImage>,
    region: CropRegion,
    completed: Option<CompletedCrop>,
    dragging: bool,
    transform: TransformState,
    spec: Option<OutputSpec>,
    use_background: bool,
    preview: PreviewRenderer,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorSession {
    /// Empty session using `config`.
    pub fn new(config: EditorConfig) -> Self {
        let preview = PreviewRenderer::new(config.preview_max_edge, config.preview_settle);
        Self {
            use_background: config.use_background_default,
            config,
            source: None,
            region: CropRegion::new(),
            completed: None,
            dragging: false,
            transform: TransformState::new(),
            spec: None,
            preview,
        }
    }

    /// Decode `bytes` and make it the session's source. See [`EditorSession::set_source`].
    ///
    /// Undecodable input leaves the session untouched.
    pub fn load_image(&mut self, bytes: &[u8], now: Instant) -> PhotofitResult<()> {
        let source = load(bytes)?;
        self.set_source(source, now);
        Ok(())
    }

    /// Replace the source, reseed the crop for the current spec and reset the transform.
    pub fn set_source(&mut self, source: SourceImage, now: Instant) {
        tracing::debug!(
            width = source.natural_width(),
            height = source.natural_height(),
            "source loaded"
        );
        self.source = Some(source);
        self.transform.reset();
        self.dragging = false;
        self.seed_crop();
        self.preview.notify_source_loaded(now);
    }

    /// Record the on-screen layout size of the source, used by pixel-unit crops.
    pub fn set_display_size(&mut self, width: u32, height: u32) -> PhotofitResult<()> {
        let source = self
            .source
            .as_ref()
            .ok_or_else(|| PhotofitError::validation("no source loaded"))?;
        self.source = Some(source.clone().with_display_size(width, height)?);
        Ok(())
    }

    /// Change the target spec. Selecting a spec locks and recenters the crop; clearing it
    /// releases the lock and keeps the rectangle.
    pub fn select_spec(&mut self, spec: Option<OutputSpec>) {
        tracing::debug!(spec = spec.as_ref().map(OutputSpec::name), "spec selected");
        self.spec = spec;
        if self.spec.is_some() {
            self.seed_crop();
        } else {
            self.region.release();
        }
    }

    /// Pick up whatever spec `provider` currently has selected.
    pub fn sync_spec(&mut self, provider: &dyn SpecProvider) {
        let next = provider.current_spec().cloned();
        if next != self.spec {
            self.select_spec(next);
        }
    }

    /// Start a drag or resize interaction.
    pub fn begin_drag(&mut self) {
        if self.source.is_some() {
            self.dragging = true;
        }
    }

    /// Move the live crop by a percent offset.
    pub fn drag_by(&mut self, dx: f64, dy: f64) {
        if self.source.is_some() {
            self.region.drag_by(dx, dy);
        }
    }

    /// Drag a resize handle to a percent position.
    pub fn resize(&mut self, handle: Handle, px: f64, py: f64) {
        if self.source.is_some() {
            self.region.resize(handle, px, py);
        }
    }

    /// Finish the interaction and record the live crop for export.
    pub fn end_drag(&mut self) {
        if self.source.is_none() {
            return;
        }
        self.dragging = false;
        self.commit_crop();
    }

    /// Whether a drag/resize interaction is in progress.
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Replace the crop outright (a complete interaction, recorded immediately).
    pub fn set_crop(&mut self, crop: &Crop) -> PhotofitResult<()> {
        let source = self
            .source
            .as_ref()
            .ok_or_else(|| PhotofitError::validation("no source loaded"))?;
        if crop.is_degenerate() {
            return Err(PhotofitError::invalid_crop(format!(
                "crop has no area: {crop:?}"
            )));
        }
        self.region
            .set_rect(crop, source.display_width(), source.display_height());
        self.commit_crop();
        Ok(())
    }

    /// Toggle the spec background fill.
    pub fn set_use_background(&mut self, on: bool) {
        self.use_background = on;
    }

    /// Current background toggle.
    pub fn use_background(&self) -> bool {
        self.use_background
    }

    /// Current transform.
    pub fn transform(&self) -> &TransformState {
        &self.transform
    }

    /// Mutable transform for zoom/rotate controls.
    pub fn transform_mut(&mut self) -> &mut TransformState {
        &mut self.transform
    }

    /// Zoom in by the configured step.
    pub fn zoom_in(&mut self) {
        self.transform.adjust_scale(self.config.scale_step);
    }

    /// Zoom out by the configured step.
    pub fn zoom_out(&mut self) {
        self.transform.adjust_scale(-self.config.scale_step);
    }

    /// Rotate by a quarter turn.
    pub fn rotate(&mut self, step: RotationStep) {
        self.transform.rotate(step);
    }

    /// Reset zoom, rotation and crop.
    pub fn reset_all(&mut self) {
        self.transform.reset();
        self.dragging = false;
        if self.source.is_some() {
            self.region.reset();
            self.commit_crop();
        }
        tracing::debug!(rect = ?self.region.rect(), "session reset");
    }

    /// Loaded source, if any.
    pub fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    /// Selected spec, if any.
    pub fn spec(&self) -> Option<&OutputSpec> {
        self.spec.as_ref()
    }

    /// Live crop in percent units.
    pub fn live_crop(&self) -> Crop {
        self.region.rect()
    }

    /// Crop recorded at the end of the last interaction.
    pub fn completed_crop(&self) -> Option<&CompletedCrop> {
        self.completed.as_ref()
    }

    /// Live crop region, including its aspect lock.
    pub fn region(&self) -> &CropRegion {
        &self.region
    }

    /// Paint the preview from the live crop. `Ok(None)` before a source is loaded or while
    /// the post-load settle delay runs.
    pub fn preview(&self, now: Instant) -> PhotofitResult<Option<PixelBuffer>> {
        let Some(source) = self.source.as_ref() else {
            return Ok(None);
        };
        self.preview.render(
            source,
            &self.region.rect(),
            &self.transform,
            self.spec.as_ref(),
            self.use_background,
            now,
        )
    }

    /// Encode the export from the recorded crop.
    pub fn export(&self) -> PhotofitResult<EncodedImage> {
        let source = self.source.as_ref().ok_or(PhotofitError::NoCropSelected)?;
        encode(&ExportRequest {
            source,
            completed_crop: self.completed.as_ref(),
            transform: &self.transform,
            spec: self.spec.as_ref(),
            use_background: self.use_background,
        })
    }

    /// [`EditorSession::export`] into `sink`. Nothing is delivered on failure.
    pub fn export_to(&self, sink: &mut dyn ImageSink) -> PhotofitResult<()> {
        let image = self.export()?;
        sink.deliver(image)
    }

    // Center the region for the current spec (or the default region) and record it.
    fn seed_crop(&mut self) {
        let Some(source) = self.source.as_ref() else {
            return;
        };
        match self.spec.as_ref() {
            Some(spec) => self.region.constrain(
                spec.target_aspect(),
                source.natural_width(),
                source.natural_height(),
            ),
            None => {
                self.region.release();
                self.region.reset();
            }
        }
        self.commit_crop();
    }

    fn commit_crop(&mut self) {
        self.completed = Some(CompletedCrop::new(self.region.rect()));
        tracing::debug!(crop = ?self.region.rect(), "crop committed");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/editor.rs"]
mod tests;
