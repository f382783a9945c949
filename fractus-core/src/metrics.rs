use crate::complex::Complex;
use crate::error::CoreError;
use crate::viewport::{ViewportState, MAX_RESOLUTION_FACTOR, RADIUS, RESOLUTION_DIVISOR};

/// Size of the host surface in logical pixels, plus the number of device
/// pixels per logical pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSize {
    width: f64,
    height: f64,
    pixel_density: f64,
}

impl SurfaceSize {
    pub fn new(width: f64, height: f64, pixel_density: f64) -> crate::Result<Self> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(width) || !valid(height) {
            return Err(CoreError::InvalidSurface { width, height });
        }
        if !valid(pixel_density) {
            return Err(CoreError::InvalidPixelDensity(pixel_density));
        }
        Ok(Self {
            width,
            height,
            pixel_density,
        })
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[inline]
    pub fn pixel_density(&self) -> f64 {
        self.pixel_density
    }
}

/// Everything a render call needs, derived from a [`ViewportState`] and a
/// [`SurfaceSize`].
///
/// Metrics can only be obtained from [`ViewportState::metrics`], and the
/// mapping operations ([`ViewportState::pan`], [`ViewportState::zoom_at`])
/// take them by value and hand back freshly derived ones. A frame is
/// therefore always rendered from metrics that match the state it shows.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameMetrics {
    surface: SurfaceSize,
    resolution_factor: f64,
    width: u32,
    height: u32,
    scale_factor: f64,
    max_iterations: u32,
    plane_offset: Complex,
    low_res_move_compensation: f64,
}

impl FrameMetrics {
    pub(crate) fn compute(state: &ViewportState, surface: SurfaceSize) -> Self {
        let density = surface.pixel_density;
        let rf = state.resolution_factor;
        let width = effective_pixels(surface.width, rf, density);
        let height = effective_pixels(surface.height, rf, density);
        let (w, h) = (width as f64, height as f64);

        let scale_factor = (2.0 * RADIUS) / w.min(h) / state.magnification;

        // The shorter axis spans the full disk diameter; the longer one is
        // stretched by the aspect ratio so pixels stay square.
        let mut ratio_x = 1.0 / state.magnification;
        let mut ratio_y = ratio_x;
        if width > height {
            ratio_x *= w / h;
        } else {
            ratio_y *= h / w;
        }

        Self {
            surface,
            resolution_factor: rf,
            width,
            height,
            scale_factor,
            max_iterations: max_iterations_for(state.magnification),
            plane_offset: Complex::new(
                RADIUS * ratio_x - state.center.re,
                RADIUS * ratio_y - state.center.im,
            ),
            low_res_move_compensation: low_res_move_compensation(density),
        }
    }

    #[inline]
    pub fn surface(&self) -> SurfaceSize {
        self.surface
    }

    #[inline]
    pub fn resolution_factor(&self) -> f64 {
        self.resolution_factor
    }

    /// Rendered width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Rendered height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Complex-plane units per rendered pixel.
    #[inline]
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    #[inline]
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Translation from rendered-pixel space to the complex plane.
    #[inline]
    pub fn plane_offset(&self) -> Complex {
        self.plane_offset
    }

    #[inline]
    pub fn low_res_move_compensation(&self) -> f64 {
        self.low_res_move_compensation
    }

    /// Complex-plane units covered by one logical pixel of pointer travel.
    #[inline]
    pub fn plane_units_per_logical_pixel(&self) -> f64 {
        self.scale_factor * self.resolution_factor * self.surface.pixel_density
    }

    /// Center of the rendered grid, expressed in logical pixels.
    ///
    /// Differs from half the surface size by the rounding of the rendered
    /// dimensions.
    pub fn grid_center(&self) -> (f64, f64) {
        let to_logical = self.resolution_factor * self.surface.pixel_density;
        (
            self.width as f64 / 2.0 / to_logical,
            self.height as f64 / 2.0 / to_logical,
        )
    }
}

fn effective_pixels(logical: f64, resolution_factor: f64, pixel_density: f64) -> u32 {
    (logical * resolution_factor * pixel_density).round().max(1.0) as u32
}

/// Iteration budget heuristic: grows with the square root of the distance
/// of `5 × magnification` from 1.
pub fn max_iterations_for(magnification: f64) -> u32 {
    ((2.0 * (1.0 - 5.0 * magnification).abs().sqrt()).sqrt() * 64.0).round() as u32
}

/// Device-pixel misalignment between the minimum- and maximum-resolution
/// sampling grids, in logical pixels.
///
/// Panning by its negation when resolution drops (and by it again when
/// resolution is restored) keeps the image from jumping.
pub fn low_res_move_compensation(pixel_density: f64) -> f64 {
    RESOLUTION_DIVISOR / (2.0 * MAX_RESOLUTION_FACTOR * pixel_density)
        - 1.0 / (2.0 * MAX_RESOLUTION_FACTOR)
}
