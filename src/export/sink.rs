use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::PhotofitResult;

/// Finished export: PNG bytes plus a suggested file name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedImage {
    /// Suggested file name, `"{spec}_edited.png"`.
    pub filename: String,
    /// PNG-encoded bytes.
    pub bytes: Vec<u8>,
    /// Encoded width in pixels.
    pub width: u32,
    /// Encoded height in pixels.
    pub height: u32,
}

/// Receiver for finished exports.
///
/// A sink is only called with a fully encoded image; failed exports never reach it.
pub trait ImageSink {
    /// Take ownership of one finished export.
    fn deliver(&mut self, image: EncodedImage) -> PhotofitResult<()>;
}

/// In-memory sink for tests and embedding.
#[derive(Debug, Default)]
pub struct InMemorySink {
    images: Vec<EncodedImage>,
}

impl InMemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the delivered images in order.
    pub fn images(&self) -> &[EncodedImage] {
        &self.images
    }
}

impl ImageSink for InMemorySink {
    fn deliver(&mut self, image: EncodedImage) -> PhotofitResult<()> {
        self.images.push(image);
        Ok(())
    }
}

/// Writes each export as `<dir>/<filename>`, creating `dir` on first use.
#[derive(Debug)]
pub struct DirectorySink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DirectorySink {
    /// Sink rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths written so far.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl ImageSink for DirectorySink {
    #[tracing::instrument(skip_all, fields(filename = %image.filename))]
    fn deliver(&mut self, image: EncodedImage) -> PhotofitResult<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create output dir {}", self.dir.display()))?;
        let path = self.dir.join(&image.filename);
        std::fs::write(&path, &image.bytes)
            .with_context(|| format!("write {}", path.display()))?;
        tracing::debug!(path = %path.display(), bytes = image.bytes.len(), "export written");
        self.written.push(path);
        Ok(())
    }
}
