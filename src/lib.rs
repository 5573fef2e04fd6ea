//! Photofit fits an uploaded photo into a fixed-size output such as an ID badge or a company
//! profile photo.
//!
//! The pipeline is:
//!
//! - Decode an upload into a [`SourceImage`]
//! - Pick an [`OutputSpec`] (built-in preset, quick size, or custom) from a [`SpecProvider`]
//! - Adjust a [`CropRegion`] and a [`TransformState`], usually through an [`EditorSession`]
//! - [`render`] a preview, or [`encode`] a PNG export into an [`ImageSink`]
//!
//! Preview and export share one compositor, so an export shows exactly what was previewed.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod crop;
pub(crate) mod export;
pub(crate) mod geometry;
pub(crate) mod preview;
pub(crate) mod render;
pub(crate) mod session;
pub(crate) mod source;
pub(crate) mod spec;
pub(crate) mod transform;

pub use crate::foundation::color::Rgba8;
pub use crate::foundation::config::EditorConfig;
pub use crate::foundation::core::{Affine, Canvas, Vec2};
pub use crate::foundation::error::{PhotofitError, PhotofitResult};

pub use crate::crop::rect::{CompletedCrop, Crop, CropUnit, SourceRect};
pub use crate::crop::region::{
    CropConstraint, CropRegion, DEFAULT_COVERAGE, Handle, MIN_EDGE_PERCENT, centered_crop,
};
pub use crate::export::encoder::{ExportRequest, FALLBACK_FILENAME, encode, export_to};
pub use crate::export::sink::{DirectorySink, EncodedImage, ImageSink, InMemorySink};
pub use crate::geometry::fit::{DrawSize, SAFETY_MARGIN, fit_contain, fit_contain_rotated};
pub use crate::geometry::ratio::{gcd, parse_ratio, reduce_ratio, reduce_ratio_str};
pub use crate::preview::renderer::PreviewRenderer;
pub use crate::render::buffer::PixelBuffer;
pub use crate::render::compositor::{RenderRequest, render, target_canvas};
pub use crate::session::editor::EditorSession;
pub use crate::source::loader::{SUPPORTED_FORMATS, SourceImage, load};
pub use crate::spec::catalogue::{
    PresetCatalogue, SpecListener, SpecProvider, builtin_presets, quick_sizes,
};
pub use crate::spec::model::{CUSTOM_MAX_EDGE, CUSTOM_MIN_EDGE, OutputSpec};
pub use crate::transform::state::{MAX_SCALE, MIN_SCALE, RotationStep, TransformState};
