use serde::{Deserialize, Serialize};

use crate::complex::Complex;

/// Squared modulus past which an orbit counts as escaped.
pub const BAILOUT_NORM_SQ: f64 = 256.0;

/// The result of iterating a single point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IterationResult {
    /// The orbit left the bailout disk after `iterations` steps.
    /// `norm_sq` is `|z|²` at that moment.
    Escaped { iterations: u32, norm_sq: f64 },

    /// The orbit stayed bounded for the whole iteration budget.
    Interior,
}

/// The escape-time fractals the kernel knows how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FractalVariant {
    /// `z ← z² + c`
    #[default]
    Mandelbrot,
    /// `z ← (|re z| + i|im z|)² + c`
    BurningShip,
}

impl FractalVariant {
    pub fn label(self) -> &'static str {
        match self {
            Self::Mandelbrot => "Mandelbrot",
            Self::BurningShip => "Burning Ship",
        }
    }

    /// Numeric id used on the render-kernel boundary.
    pub fn kernel_id(self) -> u32 {
        match self {
            Self::Mandelbrot => 0,
            Self::BurningShip => 1,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Mandelbrot => Self::BurningShip,
            Self::BurningShip => Self::Mandelbrot,
        }
    }

    /// One step of the orbit.
    #[inline]
    pub fn step(self, z: Complex, c: Complex) -> Complex {
        let re = z.re * z.re - z.im * z.im + c.re;
        let cross = 2.0 * z.re * z.im;
        match self {
            Self::Mandelbrot => Complex::new(re, cross + c.im),
            Self::BurningShip => Complex::new(re, -cross.abs() + c.im),
        }
    }

    /// Iterate `c` from `z₀ = 0` for at most `max_iterations` steps.
    pub fn iterate(self, c: Complex, max_iterations: u32) -> IterationResult {
        let mut z = Complex::ZERO;
        let mut iterations = 0;
        while z.norm_sq() <= BAILOUT_NORM_SQ && iterations < max_iterations {
            z = self.step(z, c);
            iterations += 1;
        }
        if iterations < max_iterations {
            IterationResult::Escaped {
                iterations,
                norm_sq: z.norm_sq(),
            }
        } else {
            IterationResult::Interior
        }
    }
}
