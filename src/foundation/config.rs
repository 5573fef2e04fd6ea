use std::time::Duration;

/// Tunables for an editing session.
///
/// Defaults match the stock editor; [`EditorConfig::from_env`] lets deployments override them
/// with `PHOTOFIT_*` environment variables.
#[derive(Clone, Debug, PartialEq)]
pub struct EditorConfig {
    /// Initial state of the background-fill toggle.
    pub use_background_default: bool,
    /// Longest edge of the preview raster, in physical pixels.
    pub preview_max_edge: u32,
    /// Delay after a source load before the first preview paint.
    pub preview_settle: Duration,
    /// Zoom increment used by the zoom in/out controls.
    pub scale_step: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            use_background_default: false,
            preview_max_edge: 200,
            preview_settle: Duration::from_millis(100),
            scale_step: 0.1,
        }
    }
}

impl EditorConfig {
    /// Defaults overridden by any valid `PHOTOFIT_*` variables present in the environment.
    ///
    /// Invalid values are ignored rather than rejected.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();
        if let Some(v) = lookup("PHOTOFIT_USE_BACKGROUND").and_then(|v| parse_bool(&v)) {
            cfg.use_background_default = v;
        }
        if let Some(v) = lookup("PHOTOFIT_PREVIEW_MAX_EDGE")
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|&n| n > 0)
        {
            cfg.preview_max_edge = v;
        }
        if let Some(v) = lookup("PHOTOFIT_PREVIEW_SETTLE_MS").and_then(|v| v.trim().parse::<u64>().ok())
        {
            cfg.preview_settle = Duration::from_millis(v);
        }
        if let Some(v) = lookup("PHOTOFIT_SCALE_STEP")
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|&s| s.is_finite() && s > 0.0)
        {
            cfg.scale_step = v;
        }
        tracing::debug!(?cfg, "editor config resolved");
        cfg
    }
}

fn parse_bool(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
