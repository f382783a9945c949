use thiserror::Error;

/// Errors originating from a render kernel.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid image dimensions: {width}×{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("kernel returned {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("render kernel failed: {0}")]
    Kernel(String),
}
