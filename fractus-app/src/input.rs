//! Host-facing input vocabulary.
//!
//! Coordinates are logical pixels relative to the surface's top-left
//! corner. Wheel deltas follow the browser convention: positive `delta_y`
//! scrolls down, which zooms out.

use fractus_core::SurfaceSize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Backspace,
    Character(char),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { button: PointerButton, x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp { button: PointerButton, x: f64, y: f64 },
    Wheel { x: f64, y: f64, delta_y: f64 },
    Resize(SurfaceSize),
    Key(Key),
}

/// What the controller did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Handled,
    Ignored,
    /// The user asked for a reset; the host should confirm it and call
    /// `Explorer::confirm_reset`.
    ResetRequested,
}

/// Whether a drag is in progress, and where the pointer last was.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging { last_x: f64, last_y: f64 },
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }

    pub fn start(&mut self, x: f64, y: f64) {
        *self = Self::Dragging {
            last_x: x,
            last_y: y,
        };
    }

    /// Move the tracked pointer to `(x, y)` and return the delta from its
    /// previous position, or `None` when not dragging.
    pub fn advance(&mut self, x: f64, y: f64) -> Option<(f64, f64)> {
        match *self {
            Self::Dragging { last_x, last_y } => {
                *self = Self::Dragging {
                    last_x: x,
                    last_y: y,
                };
                Some((x - last_x, y - last_y))
            }
            Self::Idle => None,
        }
    }

    /// Stop tracking. Returns whether a drag was in progress.
    pub fn stop(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        *self = Self::Idle;
        was_dragging
    }
}
