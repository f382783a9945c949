pub mod buffer;
pub mod error;
pub mod kernel;
pub mod palette;

pub use buffer::RenderBuffer;
pub use error::RenderError;
pub use kernel::{CpuKernel, RenderKernel, RenderRequest, DEFAULT_COLOR_PARAM};
pub use palette::Palette;

/// Convenience result type for the render crate.
pub type Result<T> = std::result::Result<T, RenderError>;
