use thiserror::Error;

/// Errors originating from viewport geometry.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("invalid surface size: {width}×{height} (must be positive and finite)")]
    InvalidSurface { width: f64, height: f64 },

    #[error("invalid pixel density: {0} (must be positive and finite)")]
    InvalidPixelDensity(f64),
}
