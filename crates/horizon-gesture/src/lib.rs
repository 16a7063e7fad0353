//! Horizon Gesture - a gesture recognition engine.
//!
//! The engine turns raw pointer events into recognized gestures. Each
//! [`GestureHandler`] runs a small state machine around a recognizer (pan,
//! tap, long press, pinch, rotation, fling or manual). A
//! [`GestureOrchestrator`] per root view decides which handlers see which
//! pointers, in what order, and which of them win when several recognize
//! at once. The [`GestureHandlerModule`] facade ties it together for a host.
//!
//! The host stays in charge of its views, time and event delivery:
//!
//! - views are described through the [`ViewHierarchy`] trait ([`ViewTree`]
//!   is an in-memory implementation);
//! - time comes from a [`Clock`], so recognizer deadlines are checked on
//!   each event and on [`GestureHandlerModule::tick`];
//! - results arrive through a [`GestureEventListener`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use horizon_gesture::{
//!     GestureHandlerModule, GestureState, ManualClock, Point, PointerAction, PointerEvent,
//!     Size, ViewNode, ViewTree,
//! };
//! use serde_json::json;
//!
//! let clock = ManualClock::new();
//! let mut module = GestureHandlerModule::with_clock(Arc::new(clock.clone()));
//!
//! let mut tree = ViewTree::new(1, Size::new(400.0, 400.0));
//! tree.insert(1, ViewNode::new(2, Point::new(100.0, 100.0), Size::new(100.0, 100.0)));
//!
//! module.register_root(1)?;
//! module.create_gesture_handler("PanGestureHandler", 7, &json!({ "minDist": 10 }))?;
//! module.attach_gesture_handler(7, 2)?;
//!
//! module.handle_touch_event(1, &tree, &PointerEvent::single(PointerAction::Down, Point::new(150.0, 150.0)))?;
//! clock.advance(Duration::from_millis(16));
//! module.handle_touch_event(1, &tree, &PointerEvent::single(PointerAction::Move, Point::new(150.0, 170.0)))?;
//!
//! assert_eq!(module.handler(7).map(|h| h.state()), Some(GestureState::Active));
//! # Ok::<(), horizon_gesture::GestureError>(())
//! ```

pub mod config;
pub mod event;
pub mod handler;
pub mod hit_slop;
pub mod interaction;
pub mod listener;
pub mod module;
pub mod orchestrator;
pub mod recognizer;
pub mod registry;
pub mod state;
pub mod touch;
pub mod velocity;
pub mod view;

pub use config::{BaseConfig, GestureSettings};
pub use event::{Pointer, PointerAction, PointerEvent};
pub use handler::GestureHandler;
pub use hit_slop::{Bounds, HitSlop, HitSlopConfig};
pub use interaction::{InteractionConfig, InteractionController, InteractionManager};
pub use listener::{GestureEventData, GestureEventListener, TracingListener};
pub use module::GestureHandlerModule;
pub use orchestrator::GestureOrchestrator;
pub use recognizer::{GestureData, Recognizer, RecognizerKind};
pub use registry::{HandlerId, HandlerRegistry};
pub use state::{Direction, GestureState, StateChange, Transition};
pub use touch::{MAX_POINTERS_COUNT, PointerData, TouchEventKind, TouchEventPayload, TrackedPointers};
pub use velocity::VelocityTracker;
pub use view::{LayoutDirection, PointerEventsConfig, TargetInfo, ViewHierarchy, ViewNode, ViewTree};

pub use horizon_gesture_core::{
    Alarm, Clock, GestureError, HandlerTag, ManualClock, Point, Result, SharedClock, Size,
    SystemClock, ViewTag, logging,
};
