//! Locations next to the running executable, used for preferences and as
//! the fallback home of the saved view.

use std::path::PathBuf;

/// Directory containing the running executable. Falls back to the current
/// directory if unavailable.
pub fn exe_directory() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(PathBuf::from))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

pub fn preferences_path() -> PathBuf {
    exe_directory().join("preferences.json")
}
