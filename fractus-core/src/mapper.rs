//! Pointer-space to plane-space mapping.
//!
//! Pointer positions and deltas are logical pixels measured from the
//! surface's top-left corner, with y growing downwards. The imaginary axis
//! grows upwards, hence the sign flip on vertical motion.

use crate::metrics::FrameMetrics;
use crate::viewport::{ViewportState, MIN_MAGNIFICATION};

/// Base of the exponential wheel zoom.
pub const WHEEL_ZOOM_BASE: f64 = 0.999;

/// Magnification ratio for a wheel delta (positive `delta_y` zooms out).
pub fn wheel_zoom_ratio(delta_y: f64) -> f64 {
    WHEEL_ZOOM_BASE.powf(delta_y)
}

impl ViewportState {
    /// Drag the view by a pointer delta.
    ///
    /// `metrics` must describe the current state; the returned metrics
    /// describe the state after the move. Non-finite deltas leave the view
    /// unchanged.
    pub fn pan(&mut self, metrics: FrameMetrics, dx: f64, dy: f64) -> FrameMetrics {
        if dx.is_finite() && dy.is_finite() {
            let k = metrics.plane_units_per_logical_pixel();
            self.center.re -= dx * k;
            self.center.im += dy * k;
            self.clamp_center();
        }
        self.metrics(metrics.surface())
    }

    /// Multiply the magnification by `ratio`, keeping the plane point under
    /// `(px, py)` fixed.
    ///
    /// The anchoring offset is measured on the incoming grid and applied as
    /// a pan at the new scale. Non-finite or non-positive ratios leave the
    /// view unchanged.
    pub fn zoom_at(&mut self, metrics: FrameMetrics, px: f64, py: f64, ratio: f64) -> FrameMetrics {
        if !ratio.is_finite() || ratio <= 0.0 {
            return self.metrics(metrics.surface());
        }
        let (cx, cy) = metrics.grid_center();
        let offset_x = (cx - px) * (ratio - 1.0);
        let offset_y = (cy - py) * (ratio - 1.0);

        self.magnification = (self.magnification * ratio).max(MIN_MAGNIFICATION);

        let rescaled = self.metrics(metrics.surface());
        self.pan(rescaled, offset_x, offset_y)
    }
}
