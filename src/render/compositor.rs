//! Crop + transform + fit compositing on the CPU.
//!
//! [`render`] is a pure function of its request: it owns no state, so any number of calls may
//! run concurrently against the same [`SourceImage`].

use std::sync::Arc;

use crate::crop::rect::{Crop, SourceRect};
use crate::foundation::core::{Affine, Canvas, Vec2};
use crate::foundation::error::{PhotofitError, PhotofitResult};
use crate::geometry::fit::{DrawSize, fit_contain_rotated};
use crate::render::buffer::PixelBuffer;
use crate::source::loader::SourceImage;
use crate::spec::model::OutputSpec;
use crate::transform::state::TransformState;

/// Everything one composite depends on.
#[derive(Clone, Copy, Debug)]
pub struct RenderRequest<'a> {
    /// Decoded upload.
    pub source: &'a SourceImage,
    /// Live or completed crop, in any unit.
    pub crop: &'a Crop,
    /// User zoom/rotation.
    pub transform: &'a TransformState,
    /// Target spec; `None` renders into [`Canvas::FALLBACK`].
    pub spec: Option<&'a OutputSpec>,
    /// Fill the spec's background color first.
    pub use_background: bool,
    /// Physical pixels per logical pixel (1.0 for export).
    pub pixel_ratio: f64,
}

/// Logical output frame for an optional spec.
pub fn target_canvas(spec: Option<&OutputSpec>) -> Canvas {
    spec.map(OutputSpec::canvas).unwrap_or(Canvas::FALLBACK)
}

/// Composite the cropped, transformed source into a fresh buffer.
///
/// The buffer is `target x pixel_ratio` physical pixels. The crop is isolated before any
/// transform so rotation and zoom never pull in pixels from outside it.
#[tracing::instrument(skip_all, fields(spec = req.spec.map(OutputSpec::name), ratio = req.pixel_ratio))]
pub fn render(req: &RenderRequest<'_>) -> PhotofitResult<PixelBuffer> {
    let rect = req.crop.resolve(req.source)?;

    let logical = target_canvas(req.spec);
    let pixel_ratio = if req.pixel_ratio.is_finite() && req.pixel_ratio > 0.0 {
        req.pixel_ratio
    } else {
        1.0
    };
    let physical = logical.scaled(pixel_ratio);
    let width: u16 = physical
        .width
        .try_into()
        .map_err(|_| PhotofitError::validation("output width exceeds u16"))?;
    let height: u16 = physical
        .height
        .try_into()
        .map_err(|_| PhotofitError::validation("output height exceeds u16"))?;

    let content = extract_crop(req.source, rect)?;
    let draw = fit_contain_rotated(
        rect.aspect(),
        f64::from(logical.width),
        f64::from(logical.height),
        req.transform.quarter_turns(),
    );
    let xf = content_transform(logical, pixel_ratio, req.transform, draw, rect);

    let mut ctx = vello_cpu::RenderContext::new(width, height);
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

    let background = req
        .spec
        .and_then(OutputSpec::background_color)
        .filter(|_| req.use_background);
    if let Some(bg) = background {
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(bg.r, bg.g, bg.b, bg.a));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(width),
            f64::from(height),
        ));
    }

    ctx.set_transform(affine_to_cpu(xf));
    ctx.set_paint(content);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(rect.width),
        f64::from(rect.height),
    ));
    ctx.flush();

    let mut pixmap = vello_cpu::Pixmap::new(width, height);
    ctx.render_to_pixmap(&mut pixmap);
    tracing::debug!(?rect, ?draw, width, height, "composited frame");

    Ok(PixelBuffer {
        width: u32::from(width),
        height: u32::from(height),
        data: pixmap.data_as_u8_slice().to_vec(),
    })
}

/// Maps crop-local pixel space onto the physical output.
///
/// Order (outermost first): device scale, translate to frame center, rotate, zoom, then center
/// the `draw` box on the origin and stretch the crop to fill it.
fn content_transform(
    logical: Canvas,
    pixel_ratio: f64,
    transform: &TransformState,
    draw: DrawSize,
    rect: SourceRect,
) -> Affine {
    let center = Vec2::new(f64::from(logical.width) / 2.0, f64::from(logical.height) / 2.0);
    Affine::scale(pixel_ratio)
        * Affine::translate(center)
        * transform.to_affine()
        * Affine::translate(Vec2::new(-draw.width / 2.0, -draw.height / 2.0))
        * Affine::scale_non_uniform(
            draw.width / f64::from(rect.width),
            draw.height / f64::from(rect.height),
        )
}

/// Copy exactly `rect` out of the source into its own image paint.
fn extract_crop(source: &SourceImage, rect: SourceRect) -> PhotofitResult<vello_cpu::Image> {
    let w: u16 = rect
        .width
        .try_into()
        .map_err(|_| PhotofitError::invalid_crop("crop width exceeds u16"))?;
    let h: u16 = rect
        .height
        .try_into()
        .map_err(|_| PhotofitError::invalid_crop("crop height exceeds u16"))?;

    let stride = source.natural_width() as usize * 4;
    let src = source.rgba8_premul();
    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(rect.width as usize * rect.height as usize);
    for row in rect.y..rect.y + rect.height {
        let start = row as usize * stride + rect.x as usize * 4;
        let end = start + rect.width as usize * 4;
        let line = src
            .get(start..end)
            .ok_or_else(|| PhotofitError::invalid_crop(format!("crop row {row} outside source")))?;
        for px in line.chunks_exact(4) {
            may_have_opacities |= px[3] != 255;
            pixels.push(vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            });
        }
    }

    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, may_have_opacities);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
