//! The `x,y,magnification` text fragment used to share and restore a view.
//!
//! Decoding never fails: each field is parsed on its own, and a field that
//! is missing, empty, unparseable or non-finite takes its default. A
//! magnification below the minimum is clamped up rather than rejected.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::complex::Complex;
use crate::viewport::{ViewportState, INITIAL_CENTER, INITIAL_MAGNIFICATION, MIN_MAGNIFICATION};

/// A decoded view fragment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment {
    pub x: f64,
    pub y: f64,
    pub magnification: f64,
}

impl Fragment {
    pub fn from_state(state: &ViewportState) -> Self {
        let center = state.center();
        Self {
            x: center.re,
            y: center.im,
            magnification: state.magnification(),
        }
    }

    /// Build a full-resolution viewport, projecting the center onto the
    /// allowed disk if the fragment places it outside.
    pub fn into_state(self) -> ViewportState {
        ViewportState::new(Complex::new(self.x, self.y), self.magnification)
    }
}

impl Default for Fragment {
    fn default() -> Self {
        Self {
            x: INITIAL_CENTER.re,
            y: INITIAL_CENTER.im,
            magnification: INITIAL_MAGNIFICATION,
        }
    }
}

/// Shortest round-trip decimal form of each value (`4.0`, `-0.25`, `1e-7`).
impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?},{:?},{:?}", self.x, self.y, self.magnification)
    }
}

impl FromStr for Fragment {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(decode(s))
    }
}

pub fn encode(state: &ViewportState) -> String {
    Fragment::from_state(state).to_string()
}

/// Decode a fragment, with or without its leading `#`.
pub fn decode(fragment: &str) -> Fragment {
    let body = fragment.strip_prefix('#').unwrap_or(fragment);
    let mut fields = body.split(',');
    let defaults = Fragment::default();

    let x = parse_field(fields.next()).unwrap_or(defaults.x);
    let y = parse_field(fields.next()).unwrap_or(defaults.y);
    let magnification = parse_field(fields.next())
        .map(|m| m.max(MIN_MAGNIFICATION))
        .unwrap_or(defaults.magnification);

    Fragment { x, y, magnification }
}

fn parse_field(field: Option<&str>) -> Option<f64> {
    let field = field?.trim();
    if field.is_empty() {
        return None;
    }
    field.parse::<f64>().ok().filter(|v| v.is_finite())
}
