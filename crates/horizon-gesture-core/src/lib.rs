//! Core systems for Horizon Gesture.
//!
//! This crate provides the foundational pieces shared by the gesture engine:
//!
//! - **Errors**: the [`GestureError`] type and [`Result`] alias
//! - **Geometry**: [`Point`] and [`Size`] in logical pixels
//! - **Clocks**: the [`Clock`] trait with system and manual implementations
//! - **Alarms**: single-shot deadlines for time-boxed recognizers
//! - **Logging**: tracing targets and span names
//!
//! # Alarm Example
//!
//! ```
//! use std::time::Duration;
//! use horizon_gesture_core::{Alarm, Clock, ManualClock};
//!
//! let clock = ManualClock::new();
//! let mut alarm = Alarm::new();
//!
//! alarm.arm(clock.now(), Duration::from_millis(800));
//! assert!(!alarm.is_due(clock.now()));
//!
//! clock.advance(Duration::from_millis(800));
//! assert!(alarm.take_if_due(clock.now()));
//! assert!(!alarm.is_armed());
//! ```

mod error;
mod geometry;
pub mod logging;
mod timer;

pub use error::{GestureError, Result};
pub use geometry::{Point, Size};
pub use timer::{Alarm, Clock, ManualClock, SharedClock, SystemClock};

/// Identifier the host assigns to a gesture handler.
pub type HandlerTag = i32;

/// Identifier the host assigns to a view (a gesture target).
pub type ViewTag = i32;
