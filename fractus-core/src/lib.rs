pub mod complex;
pub mod error;
pub mod fragment;
pub mod mapper;
pub mod metrics;
pub mod variant;
pub mod viewport;

// Re-export primary types for convenience.
pub use complex::Complex;
pub use error::CoreError;
pub use fragment::Fragment;
pub use mapper::{wheel_zoom_ratio, WHEEL_ZOOM_BASE};
pub use metrics::{FrameMetrics, SurfaceSize};
pub use variant::{FractalVariant, IterationResult};
pub use viewport::ViewportState;

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
