//! Outbound events.
//!
//! Everything the engine reports to its host goes through a
//! [`GestureEventListener`]. Every method has an empty default, so a host
//! implements only what it needs.

use std::cell::RefCell;
use std::rc::Rc;

use horizon_gesture_core::logging::targets;
use horizon_gesture_core::{HandlerTag, Point, ViewTag};
use tracing::{debug, trace};

use crate::recognizer::{GestureData, RecognizerKind};
use crate::state::GestureState;
use crate::touch::TouchEventPayload;

/// Snapshot of a handler at the time of an event.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureEventData {
    pub handler_tag: HandlerTag,
    /// The view the handler is attached to.
    pub view: Option<ViewTag>,
    pub kind: RecognizerKind,
    pub state: GestureState,
    /// First pointer, in view coordinates.
    pub position: Point,
    /// Average pointer position in screen coordinates.
    pub absolute_position: Point,
    pub number_of_pointers: usize,
    pub data: GestureData,
}

/// Receives handler events.
pub trait GestureEventListener {
    /// A handler changed state.
    fn on_state_change(
        &mut self,
        _event: &GestureEventData,
        _new_state: GestureState,
        _old_state: GestureState,
    ) {
    }

    /// An active handler processed an event.
    fn on_handler_update(&mut self, _event: &GestureEventData) {}

    /// Raw touch data for handlers configured with `needsPointerData`.
    fn on_touch_event(&mut self, _handler: HandlerTag, _payload: &TouchEventPayload) {}
}

/// Lets a host keep a handle to a listener it gave away.
impl<L: GestureEventListener> GestureEventListener for Rc<RefCell<L>> {
    fn on_state_change(
        &mut self,
        event: &GestureEventData,
        new_state: GestureState,
        old_state: GestureState,
    ) {
        self.borrow_mut().on_state_change(event, new_state, old_state);
    }

    fn on_handler_update(&mut self, event: &GestureEventData) {
        self.borrow_mut().on_handler_update(event);
    }

    fn on_touch_event(&mut self, handler: HandlerTag, payload: &TouchEventPayload) {
        self.borrow_mut().on_touch_event(handler, payload);
    }
}

/// Logs every callback through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingListener;

impl GestureEventListener for TracingListener {
    fn on_state_change(
        &mut self,
        event: &GestureEventData,
        new_state: GestureState,
        old_state: GestureState,
    ) {
        debug!(
            target: targets::EVENTS,
            handler = event.handler_tag,
            kind = event.kind.handler_name(),
            state = %new_state,
            previous = %old_state,
            "state change"
        );
    }

    fn on_handler_update(&mut self, event: &GestureEventData) {
        trace!(
            target: targets::EVENTS,
            handler = event.handler_tag,
            x = event.position.x,
            y = event.position.y,
            data = ?event.data,
            "handler update"
        );
    }

    fn on_touch_event(&mut self, handler: HandlerTag, payload: &TouchEventPayload) {
        trace!(
            target: targets::EVENTS,
            handler,
            kind = ?payload.kind,
            changed = payload.changed.len(),
            "touch event"
        );
    }
}
