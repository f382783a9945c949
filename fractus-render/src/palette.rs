use fractus_core::variant::BAILOUT_NORM_SQ;
use fractus_core::IterationResult;

const LUT_SIZE: usize = 256;

/// A color palette backed by a gradient lookup table.
///
/// A continuous iteration count indexes the table directly (one entry per
/// iteration, wrapping around), and the final color is linearly
/// interpolated between the two neighbouring entries.
#[derive(Debug, Clone)]
pub struct Palette {
    pub name: &'static str,
    colors: Vec<[u8; 4]>,
}

impl Palette {
    pub fn new(name: &'static str, colors: Vec<[u8; 4]>) -> Self {
        assert!(!colors.is_empty());
        Self { name, colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color for an iteration result, shifted `offset` entries along the
    /// table. Interior points sit at position zero before the shift.
    pub fn shade(&self, result: IterationResult, offset: u32) -> [u8; 4] {
        let t = match result {
            IterationResult::Escaped {
                iterations,
                norm_sq,
            } => smooth_iteration(iterations, norm_sq),
            IterationResult::Interior => 0.0,
        };
        self.sample(t + offset as f64)
    }

    fn sample(&self, t: f64) -> [u8; 4] {
        let len = self.colors.len() as f64;
        let idx = t.rem_euclid(len);
        let lo = idx.floor() as usize % self.colors.len();
        let hi = (lo + 1) % self.colors.len();
        let frac = idx - idx.floor();
        lerp_color(self.colors[lo], self.colors[hi], frac)
    }
}

impl Default for Palette {
    fn default() -> Self {
        classic()
    }
}

/// Continuous iteration count: `n + 1 − ln|z|² / ln(bailout)`.
fn smooth_iteration(iterations: u32, norm_sq: f64) -> f64 {
    if norm_sq <= 1.0 || !norm_sq.is_finite() {
        return iterations as f64;
    }
    iterations as f64 + 1.0 - norm_sq.ln() / BAILOUT_NORM_SQ.ln()
}

fn lerp_color(a: [u8; 4], b: [u8; 4], t: f64) -> [u8; 4] {
    let inv = 1.0 - t;
    [
        (a[0] as f64 * inv + b[0] as f64 * t) as u8,
        (a[1] as f64 * inv + b[1] as f64 * t) as u8,
        (a[2] as f64 * inv + b[2] as f64 * t) as u8,
        255,
    ]
}

/// Build a gradient LUT by interpolating between color stops.
fn gradient_lut(stops: &[(f64, [u8; 3])]) -> Vec<[u8; 4]> {
    (0..LUT_SIZE)
        .map(|i| {
            let t = i as f64 / LUT_SIZE as f64;
            let mut lo = 0;
            for (j, &(pos, _)) in stops.iter().enumerate() {
                if pos <= t {
                    lo = j;
                }
            }
            let hi = (lo + 1).min(stops.len() - 1);
            let (lo_t, lo_c) = stops[lo];
            let (hi_t, hi_c) = stops[hi];
            let frac = if (hi_t - lo_t).abs() < 1e-10 {
                0.0
            } else {
                ((t - lo_t) / (hi_t - lo_t)).clamp(0.0, 1.0)
            };
            let inv = 1.0 - frac;
            [
                (lo_c[0] as f64 * inv + hi_c[0] as f64 * frac) as u8,
                (lo_c[1] as f64 * inv + hi_c[1] as f64 * frac) as u8,
                (lo_c[2] as f64 * inv + hi_c[2] as f64 * frac) as u8,
                255,
            ]
        })
        .collect()
}

fn classic() -> Palette {
    let stops = &[
        (0.0, [0, 7, 100]),
        (0.16, [32, 107, 203]),
        (0.42, [237, 255, 255]),
        (0.6425, [255, 170, 0]),
        (0.8575, [0, 2, 0]),
        (1.0, [0, 7, 100]),
    ];
    Palette::new("Classic", gradient_lut(stops))
}
