use std::fs;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use fractus_core::FractalVariant;
use fractus_render::DEFAULT_COLOR_PARAM;

use crate::controller::ExplorerOptions;

/// User-editable settings, stored as JSON next to the executable.
///
/// Every field has a serde default, so older or partial files still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplorerPreferences {
    #[serde(default = "default_window_width")]
    pub window_width: f32,
    #[serde(default = "default_window_height")]
    pub window_height: f32,
    /// Fractal shown at startup.
    #[serde(default)]
    pub variant: FractalVariant,
    /// Palette offset, in palette entries.
    #[serde(default = "default_palette_offset")]
    pub palette_offset: u32,
    /// Quiet period before full resolution returns.
    #[serde(default = "default_settle_timeout_ms")]
    pub settle_timeout_ms: u64,
    /// Delay between a confirmed reset and the reset itself.
    #[serde(default = "default_reset_delay_ms")]
    pub reset_delay_ms: u64,
}

fn default_window_width() -> f32 {
    1280.0
}
fn default_window_height() -> f32 {
    720.0
}
fn default_palette_offset() -> u32 {
    DEFAULT_COLOR_PARAM
}
fn default_settle_timeout_ms() -> u64 {
    500
}
fn default_reset_delay_ms() -> u64 {
    250
}

impl Default for ExplorerPreferences {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            variant: FractalVariant::default(),
            palette_offset: default_palette_offset(),
            settle_timeout_ms: default_settle_timeout_ms(),
            reset_delay_ms: default_reset_delay_ms(),
        }
    }
}

impl ExplorerPreferences {
    /// Load preferences from next to the executable, falling back to defaults.
    pub fn load() -> Self {
        let path = crate::app_dir::preferences_path();
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(json) => match Self::from_json(&json) {
                    Ok(prefs) => {
                        info!("Loaded preferences from {}", path.display());
                        return prefs;
                    }
                    Err(e) => {
                        error!("Failed to parse preferences: {e}");
                    }
                },
                Err(e) => {
                    error!("Failed to read preferences file: {e}");
                }
            }
        } else {
            debug!("No preferences file at {}", path.display());
        }
        Self::default()
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Persist preferences to disk.
    pub fn save(&self) {
        let path = crate::app_dir::preferences_path();
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(&path, &json) {
                    error!("Failed to write preferences: {e}");
                } else {
                    debug!("Saved preferences");
                }
            }
            Err(e) => error!("Failed to serialize preferences: {e}"),
        }
    }

    pub fn to_options(&self) -> ExplorerOptions {
        ExplorerOptions {
            variant: self.variant,
            color_param: self.palette_offset,
            settle_timeout: Duration::from_millis(self.settle_timeout_ms),
            reset_delay: Duration::from_millis(self.reset_delay_ms),
        }
    }
}
