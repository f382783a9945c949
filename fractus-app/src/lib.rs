//! Interactive viewport controller: turns pointer, wheel, resize and key
//! events into viewport changes and frames, dropping to a coarse
//! resolution while the user interacts.

pub mod app_dir;
pub mod controller;
pub mod error;
pub mod input;
pub mod persistence;
pub mod preferences;
pub mod scheduler;
pub mod surface;

pub use controller::{Explorer, ExplorerOptions, RESET_DELAY};
pub use error::ExplorerError;
pub use input::{DragState, InputEvent, Key, Outcome, PointerButton};
pub use persistence::{FileFragmentStore, FragmentStore, MemoryFragmentStore};
pub use preferences::ExplorerPreferences;
pub use scheduler::{Begin, Phase, ResolutionScheduler, SETTLE_TIMEOUT};
pub use surface::{FrameSurface, Surface};

/// Convenience result type for the app crate.
pub type Result<T> = std::result::Result<T, ExplorerError>;
