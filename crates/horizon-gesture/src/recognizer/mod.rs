//! Gesture recognizers.
//!
//! Each recognizer owns its configuration and per-cycle progress and turns
//! pointer events into [`Transition`]s. The handler applies the transitions
//! through its guarded state machine, so a recognizer may request a
//! transition the current state doesn't allow; it is simply dropped.
//!
//! Time-boxed recognizers hold an [`Alarm`](horizon_gesture_core::Alarm)
//! deadline. The orchestrator polls deadlines through
//! [`Recognizer::on_deadline`].

mod fling;
mod long_press;
mod manual;
mod pan;
mod pinch;
mod rotation;
mod tap;

use std::time::Duration;

use horizon_gesture_core::{HandlerTag, Point, Result};
use serde_json::Value;

use crate::config::GestureSettings;
use crate::event::PointerEvent;
use crate::state::{GestureState, Transitions};

pub use fling::{FlingRecognizer, FlingSettings};
pub use long_press::{LongPressRecognizer, LongPressSettings};
pub use manual::ManualRecognizer;
pub use pan::{PanRecognizer, PanSettings};
pub use pinch::PinchRecognizer;
pub use rotation::RotationRecognizer;
pub use tap::{TapRecognizer, TapSettings};

/// What a recognizer sees for one event.
#[derive(Debug, Clone, Copy)]
pub struct RecognizerInput<'a> {
    /// The event, restricted to the handler's pointers, in view coordinates.
    pub event: &'a PointerEvent,
    /// Handler state before the event.
    pub state: GestureState,
    /// Current time.
    pub now: Duration,
}

/// Recognizer-specific data reported with every handler event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureData {
    Pan {
        translation: Point,
        /// Pixels per second.
        velocity: Point,
    },
    Pinch {
        scale: f64,
        focal: Point,
        /// Scale change per second.
        velocity: f64,
    },
    Rotation {
        /// Radians, positive clockwise.
        rotation: f64,
        anchor: Point,
        /// Radians per second.
        velocity: f64,
    },
    Tap,
    LongPress {
        /// Time since the press began.
        duration: Duration,
    },
    Fling,
    Manual,
}

/// Kind of recognizer, named the way hosts name handler factories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecognizerKind {
    Pan,
    Tap,
    LongPress,
    Pinch,
    Rotation,
    Fling,
    Manual,
}

impl RecognizerKind {
    pub const ALL: [RecognizerKind; 7] = [
        RecognizerKind::Pan,
        RecognizerKind::Tap,
        RecognizerKind::LongPress,
        RecognizerKind::Pinch,
        RecognizerKind::Rotation,
        RecognizerKind::Fling,
        RecognizerKind::Manual,
    ];

    /// Factory name, e.g. `"PanGestureHandler"`.
    pub fn handler_name(self) -> &'static str {
        match self {
            Self::Pan => "PanGestureHandler",
            Self::Tap => "TapGestureHandler",
            Self::LongPress => "LongPressGestureHandler",
            Self::Pinch => "PinchGestureHandler",
            Self::Rotation => "RotationGestureHandler",
            Self::Fling => "FlingGestureHandler",
            Self::Manual => "ManualGestureHandler",
        }
    }

    pub fn from_handler_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.handler_name() == name)
    }
}

/// Behaviour shared by every recognizer.
pub(crate) trait Recognize {
    /// Apply configuration. Keys that are absent take their defaults.
    fn configure(&mut self, handler: HandlerTag, config: &Value, settings: &GestureSettings) -> Result<()>;

    /// Evaluate one event.
    fn evaluate(&mut self, input: &RecognizerInput<'_>) -> Transitions;

    /// Transitions caused by a deadline passing.
    fn on_deadline(&mut self, _now: Duration, _state: GestureState) -> Transitions {
        Transitions::new()
    }

    /// Restart progress measurement, e.g. on activation.
    fn reset_progress(&mut self) {}

    fn on_cancel(&mut self) {}

    fn on_reset(&mut self) {}

    fn on_state_change(&mut self, _new: GestureState, _old: GestureState) {}

    fn data(&self, now: Duration) -> GestureData;

    /// The pending alarm deadline, if any.
    fn pending_deadline(&self) -> Option<Duration> {
        None
    }
}

/// A gesture recognizer.
#[derive(Debug, Clone)]
pub enum Recognizer {
    Pan(PanRecognizer),
    Tap(TapRecognizer),
    LongPress(LongPressRecognizer),
    Pinch(PinchRecognizer),
    Rotation(RotationRecognizer),
    Fling(FlingRecognizer),
    Manual(ManualRecognizer),
}

macro_rules! dispatch {
    ($self:expr, $recognizer:ident => $body:expr) => {
        match $self {
            Recognizer::Pan($recognizer) => $body,
            Recognizer::Tap($recognizer) => $body,
            Recognizer::LongPress($recognizer) => $body,
            Recognizer::Pinch($recognizer) => $body,
            Recognizer::Rotation($recognizer) => $body,
            Recognizer::Fling($recognizer) => $body,
            Recognizer::Manual($recognizer) => $body,
        }
    };
}

impl Recognizer {
    /// A recognizer of `kind` with default configuration.
    pub fn new(kind: RecognizerKind, settings: &GestureSettings) -> Self {
        match kind {
            RecognizerKind::Pan => Self::Pan(PanRecognizer::new(settings)),
            RecognizerKind::Tap => Self::Tap(TapRecognizer::default()),
            RecognizerKind::LongPress => Self::LongPress(LongPressRecognizer::new(settings)),
            RecognizerKind::Pinch => Self::Pinch(PinchRecognizer::new(settings)),
            RecognizerKind::Rotation => Self::Rotation(RotationRecognizer::default()),
            RecognizerKind::Fling => Self::Fling(FlingRecognizer::default()),
            RecognizerKind::Manual => Self::Manual(ManualRecognizer),
        }
    }

    pub fn kind(&self) -> RecognizerKind {
        match self {
            Self::Pan(_) => RecognizerKind::Pan,
            Self::Tap(_) => RecognizerKind::Tap,
            Self::LongPress(_) => RecognizerKind::LongPress,
            Self::Pinch(_) => RecognizerKind::Pinch,
            Self::Rotation(_) => RecognizerKind::Rotation,
            Self::Fling(_) => RecognizerKind::Fling,
            Self::Manual(_) => RecognizerKind::Manual,
        }
    }

    pub(crate) fn configure(
        &mut self,
        handler: HandlerTag,
        config: &Value,
        settings: &GestureSettings,
    ) -> Result<()> {
        dispatch!(self, r => r.configure(handler, config, settings))
    }

    pub(crate) fn evaluate(&mut self, input: &RecognizerInput<'_>) -> Transitions {
        dispatch!(self, r => r.evaluate(input))
    }

    pub(crate) fn on_deadline(&mut self, now: Duration, state: GestureState) -> Transitions {
        dispatch!(self, r => r.on_deadline(now, state))
    }

    pub(crate) fn reset_progress(&mut self) {
        dispatch!(self, r => r.reset_progress())
    }

    pub(crate) fn on_cancel(&mut self) {
        dispatch!(self, r => r.on_cancel())
    }

    pub(crate) fn on_reset(&mut self) {
        dispatch!(self, r => r.on_reset())
    }

    pub(crate) fn on_state_change(&mut self, new: GestureState, old: GestureState) {
        dispatch!(self, r => r.on_state_change(new, old))
    }

    /// Recognizer-specific data at `now`.
    pub fn data(&self, now: Duration) -> GestureData {
        dispatch!(self, r => r.data(now))
    }

    /// The pending alarm deadline, if any.
    pub fn pending_deadline(&self) -> Option<Duration> {
        dispatch!(self, r => r.pending_deadline())
    }
}

/// Wrap an angle difference into `(-PI, PI]`.
pub(crate) fn normalize_angle(delta: f64) -> f64 {
    use std::f64::consts::{PI, TAU};
    if delta > PI {
        delta - TAU
    } else if delta <= -PI {
        delta + TAU
    } else {
        delta
    }
}
