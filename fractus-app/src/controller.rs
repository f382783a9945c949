use std::time::{Duration, Instant};

use tracing::{debug, info, trace};

use fractus_core::fragment;
use fractus_core::viewport::{MAX_RESOLUTION_FACTOR, MIN_RESOLUTION_FACTOR};
use fractus_core::{
    wheel_zoom_ratio, Complex, FractalVariant, FrameMetrics, SurfaceSize, ViewportState,
};
use fractus_render::{RenderKernel, RenderRequest, DEFAULT_COLOR_PARAM};

use crate::input::{DragState, InputEvent, Key, Outcome, PointerButton};
use crate::persistence::FragmentStore;
use crate::scheduler::{Begin, ResolutionScheduler, SETTLE_TIMEOUT};
use crate::surface::Surface;

/// Delay between a confirmed reset and the reset itself.
pub const RESET_DELAY: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplorerOptions {
    pub variant: FractalVariant,
    pub color_param: u32,
    pub settle_timeout: Duration,
    pub reset_delay: Duration,
}

impl Default for ExplorerOptions {
    fn default() -> Self {
        Self {
            variant: FractalVariant::default(),
            color_param: DEFAULT_COLOR_PARAM,
            settle_timeout: SETTLE_TIMEOUT,
            reset_delay: RESET_DELAY,
        }
    }
}

/// The compensation pan applied when resolution dropped.
#[derive(Debug, Clone, Copy)]
struct Compensation {
    before: Complex,
    after: Complex,
    plane_units_per_pixel: f64,
}

/// Interactive viewport controller.
///
/// Owns the viewport and its collaborators and is driven entirely by the
/// host: [`handle`](Self::handle) for input, [`tick`](Self::tick) for the
/// settle and reset deadlines. Every interaction drops to minimum
/// resolution; full resolution returns once input has been quiet for the
/// settle timeout.
pub struct Explorer<K, S, P> {
    state: ViewportState,
    surface_size: SurfaceSize,
    scheduler: ResolutionScheduler,
    drag: DragState,
    compensation: Option<Compensation>,
    pending_reset: Option<Instant>,
    variant: FractalVariant,
    color_param: u32,
    reset_delay: Duration,
    kernel: K,
    surface: S,
    store: P,
}

impl<K: RenderKernel, S: Surface, P: FragmentStore> Explorer<K, S, P> {
    pub fn new(
        kernel: K,
        surface: S,
        store: P,
        surface_size: SurfaceSize,
        options: ExplorerOptions,
    ) -> Self {
        Self {
            state: ViewportState::default(),
            surface_size,
            scheduler: ResolutionScheduler::new(options.settle_timeout),
            drag: DragState::Idle,
            compensation: None,
            pending_reset: None,
            variant: options.variant,
            color_param: options.color_param,
            reset_delay: options.reset_delay,
            kernel,
            surface,
            store,
        }
    }

    /// Restore the saved view and draw the first full-resolution frame.
    ///
    /// The stored fragment is rewritten in canonical form, so a malformed
    /// one is repaired on the first run.
    pub fn start(&mut self) -> crate::Result<()> {
        let restored = self
            .store
            .load()
            .map(|text| fragment::decode(&text))
            .unwrap_or_default();
        self.state = restored.into_state();
        info!(view = %fragment::encode(&self.state), "Restored view");
        self.persist();

        self.begin_low_res();
        self.scheduler.settle_now();
        self.end_low_res()
    }

    /// Feed one input event. `now` is the time it arrived.
    pub fn handle(&mut self, event: InputEvent, now: Instant) -> crate::Result<Outcome> {
        match event {
            InputEvent::PointerDown {
                button: PointerButton::Primary,
                x,
                y,
            } => {
                let (begin, metrics) = self.begin_low_res();
                let metrics = self.precompensate(metrics);
                self.drag.start(x, y);
                if begin == Begin::Lowered {
                    self.draw(&metrics)?;
                }
                Ok(Outcome::Handled)
            }
            InputEvent::PointerDown { .. } => Ok(Outcome::Ignored),
            InputEvent::PointerMove { x, y } => match self.drag.advance(x, y) {
                Some((dx, dy)) => {
                    let metrics = self.state.metrics(self.surface_size);
                    let metrics = self.state.pan(metrics, dx, dy);
                    self.draw(&metrics)?;
                    Ok(Outcome::Handled)
                }
                None => Ok(Outcome::Ignored),
            },
            InputEvent::PointerUp { .. } => {
                if self.drag.stop() {
                    self.scheduler.defer_settle(now);
                    Ok(Outcome::Handled)
                } else {
                    Ok(Outcome::Ignored)
                }
            }
            InputEvent::Wheel { x, y, delta_y } => {
                let (_, metrics) = self.begin_low_res();
                let metrics = self.state.zoom_at(metrics, x, y, wheel_zoom_ratio(delta_y));
                let metrics = self.precompensate(metrics);
                // A drag in progress re-arms the settle on pointer-up.
                if !self.drag.is_dragging() {
                    self.scheduler.defer_settle(now);
                }
                self.draw(&metrics)?;
                Ok(Outcome::Handled)
            }
            InputEvent::Resize(size) => {
                self.begin_low_res();
                self.surface_size = size;
                let metrics = self.precompensate(self.state.metrics(size));
                if !self.drag.is_dragging() {
                    self.scheduler.defer_settle(now);
                }
                self.draw(&metrics)?;
                Ok(Outcome::Handled)
            }
            InputEvent::Key(Key::Backspace) => Ok(Outcome::ResetRequested),
            InputEvent::Key(Key::Character('f' | 'F')) => {
                self.variant = self.variant.toggled();
                debug!(variant = self.variant.label(), "Variant toggled");
                let metrics = self.state.metrics(self.surface_size);
                self.draw(&metrics)?;
                Ok(Outcome::Handled)
            }
            InputEvent::Key(_) => Ok(Outcome::Ignored),
        }
    }

    /// The user confirmed a reset; it happens on the first tick after the
    /// reset delay.
    pub fn confirm_reset(&mut self, now: Instant) {
        debug!("Reset confirmed");
        self.pending_reset = Some(now + self.reset_delay);
    }

    /// Run whatever deadline has passed. Returns whether a frame was drawn.
    pub fn tick(&mut self, now: Instant) -> crate::Result<bool> {
        let mut drew = false;
        if self.pending_reset.is_some_and(|at| now >= at) {
            self.pending_reset = None;
            self.apply_reset()?;
            drew = true;
        }
        if self.scheduler.poll(now) {
            self.end_low_res()?;
            drew = true;
        }
        Ok(drew)
    }

    /// Earliest pending settle or reset, for scheduling a wake-up.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.scheduler.deadline(), self.pending_reset) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    #[inline]
    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    pub fn metrics(&self) -> FrameMetrics {
        self.state.metrics(self.surface_size)
    }

    #[inline]
    pub fn surface_size(&self) -> SurfaceSize {
        self.surface_size
    }

    #[inline]
    pub fn scheduler(&self) -> &ResolutionScheduler {
        &self.scheduler
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    #[inline]
    pub fn variant(&self) -> FractalVariant {
        self.variant
    }

    /// The current view in fragment form.
    pub fn fragment(&self) -> String {
        fragment::encode(&self.state)
    }

    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    /// Enter (or stay in) the low-resolution phase.
    ///
    /// Returns metrics for the uncompensated view: callers mutate it and
    /// then [`precompensate`](Self::precompensate) before drawing.
    fn begin_low_res(&mut self) -> (Begin, FrameMetrics) {
        let begin = self.scheduler.begin();
        if begin == Begin::Lowered {
            self.state.set_resolution_factor(MIN_RESOLUTION_FACTOR);
            self.compensation = None;
            return (begin, self.state.metrics(self.surface_size));
        }
        trace!("Interaction coalesced into current low-resolution phase");
        (begin, self.lift_compensation())
    }

    /// Shift the low-resolution grid so it lines up with the full-resolution
    /// one, remembering enough to undo it exactly.
    fn precompensate(&mut self, metrics: FrameMetrics) -> FrameMetrics {
        let comp = metrics.low_res_move_compensation();
        let before = self.state.center();
        let metrics = self.state.pan(metrics, -comp, -comp);
        self.compensation = Some(Compensation {
            before,
            after: self.state.center(),
            plane_units_per_pixel: metrics.plane_units_per_logical_pixel(),
        });
        metrics
    }

    /// Undo [`precompensate`](Self::precompensate). The saved center comes
    /// back bit for bit unless the view was dragged or rescaled since.
    fn lift_compensation(&mut self) -> FrameMetrics {
        let metrics = self.state.metrics(self.surface_size);
        let Some(c) = self.compensation.take() else {
            return metrics;
        };
        if c.after == self.state.center()
            && c.plane_units_per_pixel == metrics.plane_units_per_logical_pixel()
        {
            self.state.set_center(c.before);
            self.state.metrics(self.surface_size)
        } else {
            let comp = metrics.low_res_move_compensation();
            self.state.pan(metrics, comp, comp)
        }
    }

    fn end_low_res(&mut self) -> crate::Result<()> {
        self.lift_compensation();
        self.persist();
        self.state.set_resolution_factor(MAX_RESOLUTION_FACTOR);
        debug!(view = %fragment::encode(&self.state), "Settled at full resolution");
        let metrics = self.state.metrics(self.surface_size);
        self.draw(&metrics)
    }

    fn apply_reset(&mut self) -> crate::Result<()> {
        self.state.reset();
        self.compensation = None;
        self.persist();
        let mut metrics = self.state.metrics(self.surface_size);
        if !self.scheduler.is_idle() {
            metrics = self.precompensate(metrics);
        }
        debug!("View reset");
        self.draw(&metrics)
    }

    fn persist(&mut self) {
        let text = fragment::encode(&self.state);
        self.store.replace(&text);
    }

    fn draw(&mut self, metrics: &FrameMetrics) -> crate::Result<()> {
        let request = RenderRequest::from_metrics(metrics, self.color_param, self.variant);
        let start = Instant::now();
        let frame = self.kernel.render(&request)?;
        request.check_output(&frame)?;
        self.surface.present(&frame);
        debug!(
            elapsed_ms = start.elapsed().as_millis(),
            width = request.width,
            height = request.height,
            "Draw"
        );
        Ok(())
    }
}
