use tracing::trace;

use crate::complex::Complex;
use crate::metrics::{FrameMetrics, SurfaceSize};

/// Radius of the disk the viewport center is confined to.
pub const RADIUS: f64 = 2.0;

pub const INITIAL_CENTER: Complex = Complex::ZERO;
pub const INITIAL_MAGNIFICATION: f64 = 1.0;
pub const MIN_MAGNIFICATION: f64 = 0.25;

/// Fraction of native device pixels rendered once the view has settled.
pub const MAX_RESOLUTION_FACTOR: f64 = 2.0;
pub const RESOLUTION_DIVISOR: f64 = 16.0 * MAX_RESOLUTION_FACTOR;
/// Fraction of native device pixels rendered while an interaction is live.
pub const MIN_RESOLUTION_FACTOR: f64 = MAX_RESOLUTION_FACTOR / RESOLUTION_DIVISOR;

/// Defines which part of the complex plane is shown, and how finely.
///
/// The invariants are enforced on every mutation rather than checked:
/// the center never leaves the disk of radius [`RADIUS`] (points outside
/// are projected back onto the circle along their angle), the
/// magnification never drops below [`MIN_MAGNIFICATION`], and the
/// resolution factor stays within
/// `[MIN_RESOLUTION_FACTOR, MAX_RESOLUTION_FACTOR]`.
///
/// Everything a render needs beyond these three values is derived by
/// [`metrics`](Self::metrics).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    pub(crate) center: Complex,
    pub(crate) magnification: f64,
    pub(crate) resolution_factor: f64,
}

impl ViewportState {
    /// Create a viewport at full resolution, clamping both invariants.
    ///
    /// Non-finite inputs fall back to the initial center or magnification.
    pub fn new(center: Complex, magnification: f64) -> Self {
        let mut state = Self {
            center: if center.is_finite() {
                center
            } else {
                INITIAL_CENTER
            },
            magnification: if magnification.is_finite() {
                magnification.max(MIN_MAGNIFICATION)
            } else {
                INITIAL_MAGNIFICATION
            },
            resolution_factor: MAX_RESOLUTION_FACTOR,
        };
        state.clamp_center();
        state
    }

    #[inline]
    pub fn center(&self) -> Complex {
        self.center
    }

    #[inline]
    pub fn magnification(&self) -> f64 {
        self.magnification
    }

    #[inline]
    pub fn resolution_factor(&self) -> f64 {
        self.resolution_factor
    }

    pub fn set_resolution_factor(&mut self, factor: f64) {
        self.resolution_factor = if factor.is_nan() {
            MAX_RESOLUTION_FACTOR
        } else {
            factor.clamp(MIN_RESOLUTION_FACTOR, MAX_RESOLUTION_FACTOR)
        };
    }

    /// Overwrite the center, projecting it onto the disk if needed.
    ///
    /// Used to restore an exact, previously observed center.
    pub fn set_center(&mut self, center: Complex) {
        if center.is_finite() {
            self.center = center;
            self.clamp_center();
        }
    }

    /// Return to the initial center and magnification.
    ///
    /// The resolution factor is left alone: a reset during a low-resolution
    /// phase stays low-resolution until the phase settles.
    pub fn reset(&mut self) {
        self.center = INITIAL_CENTER;
        self.magnification = INITIAL_MAGNIFICATION;
    }

    /// Derive the per-frame metrics for `surface` from the current state.
    pub fn metrics(&self, surface: SurfaceSize) -> FrameMetrics {
        FrameMetrics::compute(self, surface)
    }

    pub(crate) fn clamp_center(&mut self) {
        if self.center.norm() <= RADIUS {
            return;
        }
        let mut clamped = Complex::from_polar(RADIUS, self.center.arg());
        // cos/sin rounding can land an ulp outside the circle.
        while clamped.norm() > RADIUS {
            clamped = clamped * (1.0 - f64::EPSILON);
        }
        trace!(
            from_re = self.center.re,
            from_im = self.center.im,
            to_re = clamped.re,
            to_im = clamped.im,
            "Center clamped onto boundary"
        );
        self.center = clamped;
    }
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::new(INITIAL_CENTER, INITIAL_MAGNIFICATION)
    }
}
