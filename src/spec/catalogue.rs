//! Preset catalogue and the [`SpecProvider`] contract.

use std::io::Read;

use anyhow::Context;

use crate::foundation::color::Rgba8;
use crate::foundation::error::{PhotofitError, PhotofitResult};
use crate::spec::model::OutputSpec;

/// Callback fired whenever the current spec changes (`None` = deselected).
pub type SpecListener = Box<dyn FnMut(Option<&OutputSpec>)>;

/// Source of the output spec the editor targets.
///
/// Hosts inject an implementation so the pipeline never reaches into ambient storage.
pub trait SpecProvider {
    /// Spec currently selected, if any.
    fn current_spec(&self) -> Option<&OutputSpec>;

    /// Register a listener for selection changes.
    fn subscribe(&mut self, listener: SpecListener);
}

const LIGHT_BLUE: Rgba8 = Rgba8::rgb(0xf0, 0xf8, 0xff);
const LIGHT_YELLOW: Rgba8 = Rgba8::rgb(0xff, 0xf9, 0xe6);

// name, width, height, background, description
const PRESET_TABLE: [(&str, u32, u32, Rgba8, &str); 7] = [
    ("Samsung Electronics", 300, 400, Rgba8::WHITE, "3:4, white background"),
    ("LG Electronics", 350, 450, Rgba8::WHITE, "7:9, white background"),
    ("SK hynix", 300, 400, LIGHT_BLUE, "3:4, light blue background"),
    ("NAVER", 320, 400, Rgba8::WHITE, "4:5, white background"),
    ("Kakao", 300, 400, LIGHT_YELLOW, "3:4, light yellow background"),
    ("Hyundai Motor", 350, 450, Rgba8::WHITE, "7:9, white background"),
    ("Standard ID badge", 300, 400, Rgba8::WHITE, "Common 3:4, white background"),
];

const QUICK_SIZE_TABLE: [(&str, u32, u32); 5] = [
    ("Square", 400, 400),
    ("Passport", 350, 450),
    ("ID photo", 300, 400),
    ("Business card", 250, 300),
    ("Half business card", 200, 250),
];

/// Company ID-photo presets shipped with the editor.
///
/// An entry that fails validation is skipped with a warning.
pub fn builtin_presets() -> Vec<OutputSpec> {
    PRESET_TABLE
        .into_iter()
        .filter_map(|(name, w, h, bg, desc)| {
            keep_valid(name, OutputSpec::new(name, w, h, Some(bg), desc))
        })
        .collect()
}

/// One-click size shortcuts, all on a white background.
pub fn quick_sizes() -> Vec<OutputSpec> {
    QUICK_SIZE_TABLE
        .into_iter()
        .filter_map(|(name, w, h)| {
            let spec = OutputSpec::new(
                name,
                w,
                h,
                Some(Rgba8::WHITE),
                format!("{w}×{h}px quick size"),
            );
            keep_valid(name, spec)
        })
        .collect()
}

fn keep_valid(name: &str, spec: PhotofitResult<OutputSpec>) -> Option<OutputSpec> {
    spec.inspect_err(|e| tracing::warn!(name, error = %e, "dropping built-in spec"))
        .ok()
}

/// In-memory [`SpecProvider`] over a list of named specs.
#[derive(Default)]
pub struct PresetCatalogue {
    specs: Vec<OutputSpec>,
    current: Option<OutputSpec>,
    listeners: Vec<SpecListener>,
}

impl std::fmt::Debug for PresetCatalogue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresetCatalogue")
            .field("specs", &self.specs.len())
            .field("current", &self.current.as_ref().map(OutputSpec::name))
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl PresetCatalogue {
    /// Catalogue over `specs`. Names must be unique (case-insensitive).
    pub fn new(specs: Vec<OutputSpec>) -> PhotofitResult<Self> {
        let mut catalogue = Self::default();
        for spec in specs {
            catalogue.add(spec)?;
        }
        Ok(catalogue)
    }

    /// Built-in company presets followed by the quick sizes.
    pub fn builtin() -> Self {
        let mut catalogue = Self::default();
        for spec in builtin_presets().into_iter().chain(quick_sizes()) {
            let name = spec.name().to_owned();
            if let Err(e) = catalogue.add(spec) {
                tracing::warn!(name = %name, error = %e, "dropping built-in spec");
            }
        }
        catalogue
    }

    /// Load a JSON array of spec records.
    pub fn from_json_reader(reader: impl Read) -> PhotofitResult<Self> {
        let specs: Vec<OutputSpec> =
            serde_json::from_reader(reader).context("parse spec catalogue JSON")?;
        Self::new(specs)
    }

    /// All specs in insertion order.
    pub fn specs(&self) -> &[OutputSpec] {
        &self.specs
    }

    /// Look a spec up by name, ignoring case.
    pub fn find(&self, name: &str) -> Option<&OutputSpec> {
        self.specs
            .iter()
            .find(|s| s.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Append a spec, e.g. a user's custom preset.
    pub fn add(&mut self, spec: OutputSpec) -> PhotofitResult<()> {
        if self.find(spec.name()).is_some() {
            return Err(PhotofitError::validation(format!(
                "a spec named \"{}\" already exists",
                spec.name()
            )));
        }
        self.specs.push(spec);
        Ok(())
    }

    /// Select a catalogue entry by name.
    pub fn select(&mut self, name: &str) -> PhotofitResult<&OutputSpec> {
        let spec = self
            .find(name)
            .cloned()
            .ok_or_else(|| PhotofitError::validation(format!("unknown spec \"{name}\"")))?;
        self.set_current(Some(spec));
        self.current
            .as_ref()
            .ok_or_else(|| PhotofitError::validation("selection was not recorded"))
    }

    /// Select a spec that need not be in the catalogue (custom size, quick size).
    pub fn select_spec(&mut self, spec: OutputSpec) {
        self.set_current(Some(spec));
    }

    /// Deselect.
    pub fn clear(&mut self) {
        self.set_current(None);
    }

    fn set_current(&mut self, spec: Option<OutputSpec>) {
        if self.current == spec {
            return;
        }
        tracing::debug!(spec = ?spec.as_ref().map(OutputSpec::name), "spec selection changed");
        self.current = spec;
        let current = self.current.as_ref();
        for listener in &mut self.listeners {
            listener(current);
        }
    }
}

impl SpecProvider for PresetCatalogue {
    fn current_spec(&self) -> Option<&OutputSpec> {
        self.current.as_ref()
    }

    fn subscribe(&mut self, listener: SpecListener) {
        self.listeners.push(listener);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/spec/catalogue.rs"]
mod tests;
