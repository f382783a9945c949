//! Where the current view fragment lives between sessions.
//!
//! The store holds a single slot: every write replaces the previous value,
//! so restoring always yields the most recent view.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, error, warn};

const FRAGMENT_FILE: &str = "view.fragment";

pub trait FragmentStore {
    /// The saved fragment, if one exists.
    fn load(&mut self) -> Option<String>;
    /// Replace the saved fragment.
    fn replace(&mut self, fragment: &str);
}

/// Fragment kept in a small text file.
#[derive(Debug, Clone)]
pub struct FileFragmentStore {
    path: PathBuf,
}

impl FileFragmentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The per-user data directory, or the executable's directory when the
    /// platform has none.
    pub fn default_location() -> Self {
        let dir = directories::ProjectDirs::from("", "", "Fractus")
            .map(|d| d.data_dir().to_path_buf())
            .unwrap_or_else(crate::app_dir::exe_directory);
        Self::new(dir.join(FRAGMENT_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FragmentStore for FileFragmentStore {
    fn load(&mut self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(text) => {
                debug!("Loaded view fragment from {}", self.path.display());
                Some(text.trim().to_owned())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No saved view at {}", self.path.display());
                None
            }
            Err(e) => {
                warn!("Failed to read saved view: {e}");
                None
            }
        }
    }

    fn replace(&mut self, fragment: &str) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create data directory: {e}");
                return;
            }
        }
        if let Err(e) = fs::write(&self.path, fragment) {
            error!("Failed to save view: {e}");
        }
    }
}

/// In-memory store that also records every write, for hosts without a
/// filesystem and for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryFragmentStore {
    current: Option<String>,
    writes: Vec<String>,
}

impl MemoryFragmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `fragment`.
    pub fn with_fragment(fragment: impl Into<String>) -> Self {
        Self {
            current: Some(fragment.into()),
            writes: Vec::new(),
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Every value written so far, oldest first.
    pub fn writes(&self) -> &[String] {
        &self.writes
    }
}

impl FragmentStore for MemoryFragmentStore {
    fn load(&mut self) -> Option<String> {
        self.current.clone()
    }

    fn replace(&mut self, fragment: &str) {
        self.current = Some(fragment.to_owned());
        self.writes.push(fragment.to_owned());
    }
}
