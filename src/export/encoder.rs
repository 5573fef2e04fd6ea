use std::io::Cursor;

use crate::crop::rect::CompletedCrop;
use crate::foundation::error::{PhotofitError, PhotofitResult};
use crate::render::compositor::{RenderRequest, render};
use crate::source::loader::SourceImage;
use crate::spec::model::OutputSpec;
use crate::transform::state::TransformState;

use super::sink::{EncodedImage, ImageSink};

/// File name used when no spec is selected.
pub const FALLBACK_FILENAME: &str = "photo_edited.png";

/// Inputs for one export.
#[derive(Clone, Copy, Debug)]
pub struct ExportRequest<'a> {
    /// Decoded upload.
    pub source: &'a SourceImage,
    /// Crop recorded at the end of the last interaction.
    pub completed_crop: Option<&'a CompletedCrop>,
    /// User zoom/rotation.
    pub transform: &'a TransformState,
    /// Target spec; `None` exports the fallback canvas.
    pub spec: Option<&'a OutputSpec>,
    /// Fill the spec's background color first.
    pub use_background: bool,
}

/// Render at full target size and encode as PNG.
///
/// Uses the same compositor as the preview at a pixel ratio of 1, so the file shows exactly
/// what the preview shows.
#[tracing::instrument(skip_all, fields(spec = req.spec.map(OutputSpec::name)))]
pub fn encode(req: &ExportRequest<'_>) -> PhotofitResult<EncodedImage> {
    let crop = req.completed_crop.ok_or(PhotofitError::NoCropSelected)?;
    let frame = render(&RenderRequest {
        source: req.source,
        crop: crop.crop(),
        transform: req.transform,
        spec: req.spec,
        use_background: req.use_background,
        pixel_ratio: 1.0,
    })?;
    if frame.width == 0 || frame.height == 0 || frame.data.is_empty() {
        return Err(PhotofitError::encode("composited frame is empty"));
    }

    let img = frame.to_rgba_image()?;
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .map_err(|e| PhotofitError::encode(format!("png: {e}")))?;
    if bytes.is_empty() {
        return Err(PhotofitError::encode("png encoder produced no data"));
    }

    let filename = req
        .spec
        .map(OutputSpec::export_filename)
        .unwrap_or_else(|| FALLBACK_FILENAME.to_owned());
    tracing::debug!(%filename, width = frame.width, height = frame.height, bytes = bytes.len(), "export encoded");
    Ok(EncodedImage {
        filename,
        bytes,
        width: frame.width,
        height: frame.height,
    })
}

/// [`encode`], then hand the result to `sink`. Nothing is delivered on failure.
pub fn export_to(req: &ExportRequest<'_>, sink: &mut dyn ImageSink) -> PhotofitResult<()> {
    let image = encode(req)?;
    sink.deliver(image)
}

#[cfg(test)]
#[path = "../../tests/unit/export/encoder.rs"]
mod tests;
