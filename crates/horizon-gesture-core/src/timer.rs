//! Clocks and deadline alarms for Horizon Gesture.
//!
//! Recognizers never own native timers. A time-boxed recognizer records an
//! [`Alarm`] deadline against a monotonic [`Clock`]; the orchestrator checks
//! deadlines on every dispatched event and on explicit ticks.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// A monotonic time source.
///
/// Times are offsets from an arbitrary, fixed origin.
pub trait Clock: Send + Sync {
    /// The current time.
    fn now(&self) -> Duration;
}

/// A clock shared between the host and the engine.
pub type SharedClock = Arc<dyn Clock>;

/// Monotonic clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Create a clock whose origin is the current instant.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same time, so a test can keep one handle and give
/// another to the engine.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<Mutex<Duration>>,
}

impl ManualClock {
    /// Create a clock at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }

    /// Set the absolute time. Moving backwards is ignored.
    pub fn set(&self, to: Duration) {
        let mut now = self.now.lock();
        if to > *now {
            *now = to;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        *self.now.lock()
    }
}

/// A single pending deadline.
///
/// Arming replaces any pending deadline; disarming is always safe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Alarm {
    deadline: Option<Duration>,
}

impl Alarm {
    /// Create a disarmed alarm.
    pub const fn new() -> Self {
        Self { deadline: None }
    }

    /// Arm the alarm to fire `after` from `now`, replacing any pending deadline.
    pub fn arm(&mut self, now: Duration, after: Duration) {
        self.deadline = Some(now + after);
    }

    /// Disarm the alarm. No-op when nothing is pending.
    pub fn disarm(&mut self) {
        self.deadline = None;
    }

    /// Whether a deadline is pending.
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// The pending deadline, if any.
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Whether the pending deadline has been reached.
    pub fn is_due(&self, now: Duration) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Disarm and return true if the deadline has been reached.
    ///
    /// An alarm fires at most once per arming.
    pub fn take_if_due(&mut self, now: Duration) -> bool {
        if self.is_due(now) {
            self.deadline = None;
            true
        } else {
            false
        }
    }
}

static_assertions::assert_impl_all!(ManualClock: Send, Sync);
static_assertions::assert_impl_all!(SystemClock: Send, Sync);
