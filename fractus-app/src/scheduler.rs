use std::time::{Duration, Instant};

use tracing::{debug, trace};

/// Quiet period after the last interaction before full resolution returns.
pub const SETTLE_TIMEOUT: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Full resolution, nothing pending.
    Idle,
    /// Low resolution. `deadline` is the armed settle, `None` while an
    /// interaction (a drag) holds the phase open.
    Settling { deadline: Option<Instant> },
}

/// What the caller must do after [`ResolutionScheduler::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Begin {
    /// Entered the low-resolution phase: drop resolution and compensate.
    Lowered,
    /// Already low; any pending settle was cancelled.
    Coalesced,
}

/// Two-phase debounce deciding when to pay for a full-resolution frame.
///
/// Holds at most one deadline. Every interaction start cancels it, every
/// interaction end re-arms it, and [`poll`](Self::poll) reports the settle
/// once the deadline has passed. The scheduler does not own a timer: the
/// host polls it, using [`deadline`](Self::deadline) to know when.
#[derive(Debug, Clone)]
pub struct ResolutionScheduler {
    phase: Phase,
    timeout: Duration,
}

impl ResolutionScheduler {
    pub fn new(timeout: Duration) -> Self {
        Self {
            phase: Phase::Idle,
            timeout,
        }
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    #[inline]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The armed settle deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        match self.phase {
            Phase::Settling { deadline } => deadline,
            Phase::Idle => None,
        }
    }

    /// An interaction started.
    pub fn begin(&mut self) -> Begin {
        match self.phase {
            Phase::Idle => {
                debug!("Entering low-resolution phase");
                self.phase = Phase::Settling { deadline: None };
                Begin::Lowered
            }
            Phase::Settling { deadline } => {
                if deadline.is_some() {
                    trace!("Pending settle cancelled");
                }
                self.phase = Phase::Settling { deadline: None };
                Begin::Coalesced
            }
        }
    }

    /// An interaction ended: arm the settle `timeout` from `now`,
    /// replacing any earlier deadline. Returns `false` when idle.
    pub fn defer_settle(&mut self, now: Instant) -> bool {
        match self.phase {
            Phase::Settling { .. } => {
                self.phase = Phase::Settling {
                    deadline: Some(now + self.timeout),
                };
                true
            }
            Phase::Idle => false,
        }
    }

    /// Returns `true` exactly once when the armed deadline has passed, and
    /// goes back to idle.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.phase {
            Phase::Settling {
                deadline: Some(deadline),
            } if now >= deadline => {
                self.phase = Phase::Idle;
                true
            }
            _ => false,
        }
    }

    /// Settle immediately, regardless of any deadline. Returns `false` when
    /// already idle.
    pub fn settle_now(&mut self) -> bool {
        match self.phase {
            Phase::Settling { .. } => {
                self.phase = Phase::Idle;
                true
            }
            Phase::Idle => false,
        }
    }
}

impl Default for ResolutionScheduler {
    fn default() -> Self {
        Self::new(SETTLE_TIMEOUT)
    }
}
