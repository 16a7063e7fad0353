//! Handler storage and outbound event dispatch.
//!
//! The registry owns every handler. Orchestrators refer to handlers by
//! [`HandlerId`] and reach them through the registry, so no handler is ever
//! owned twice.

use std::collections::HashMap;
use std::time::Duration;

use horizon_gesture_core::logging::targets;
use horizon_gesture_core::{GestureError, HandlerTag, Result, ViewTag};
use slotmap::{SlotMap, new_key_type};
use tracing::debug;

use crate::handler::GestureHandler;
use crate::listener::GestureEventListener;
use crate::state::GestureState;

new_key_type! {
    /// Key of a handler inside a [`HandlerRegistry`].
    pub struct HandlerId;
}

/// Owns handlers and the listener they report to.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: SlotMap<HandlerId, GestureHandler>,
    by_tag: HashMap<HandlerTag, HandlerId>,
    by_view: HashMap<ViewTag, Vec<HandlerId>>,
    listener: Option<Box<dyn GestureEventListener>>,
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.handlers.len())
            .field("views", &self.by_view.len())
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_listener(&mut self, listener: Option<Box<dyn GestureEventListener>>) {
        self.listener = listener;
    }

    /// Take ownership of a handler.
    pub fn register(&mut self, handler: GestureHandler) -> Result<HandlerId> {
        let tag = handler.tag();
        if self.by_tag.contains_key(&tag) {
            return Err(GestureError::DuplicateHandlerTag(tag));
        }
        let id = self.handlers.insert(handler);
        self.by_tag.insert(tag, id);
        Ok(id)
    }

    pub fn id_for_tag(&self, tag: HandlerTag) -> Option<HandlerId> {
        self.by_tag.get(&tag).copied()
    }

    pub fn get(&self, id: HandlerId) -> Option<&GestureHandler> {
        self.handlers.get(id)
    }

    pub fn get_mut(&mut self, id: HandlerId) -> Option<&mut GestureHandler> {
        self.handlers.get_mut(id)
    }

    pub fn get_by_tag(&self, tag: HandlerTag) -> Option<&GestureHandler> {
        self.id_for_tag(tag).and_then(|id| self.handlers.get(id))
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Attach a handler to a view, detaching it from any previous view.
    pub fn attach_handler_to_view(&mut self, tag: HandlerTag, view: ViewTag) -> Result<()> {
        let id = self.id_for_tag(tag).ok_or(GestureError::HandlerNotFound(tag))?;
        self.detach(id);

        self.by_view.entry(view).or_default().push(id);
        if let Some(handler) = self.handlers.get_mut(id) {
            handler.set_attached_view(Some(view));
        }
        debug!(target: targets::MODULE, handler = tag, view, "attached handler");
        Ok(())
    }

    fn detach(&mut self, id: HandlerId) {
        let Some(view) = self.handlers.get(id).and_then(GestureHandler::attached_view) else {
            return;
        };
        if let Some(ids) = self.by_view.get_mut(&view) {
            ids.retain(|other| *other != id);
            if ids.is_empty() {
                self.by_view.remove(&view);
            }
        }
        if let Some(handler) = self.handlers.get_mut(id) {
            handler.set_attached_view(None);
        }
    }

    /// Remove a handler entirely.
    pub fn remove(&mut self, tag: HandlerTag) -> Option<GestureHandler> {
        let id = self.by_tag.remove(&tag)?;
        self.detach(id);
        self.handlers.remove(id)
    }

    /// Handlers attached to `view`, in attachment order.
    pub fn handlers_for_view(&self, view: ViewTag) -> Vec<HandlerId> {
        self.by_view.get(&view).cloned().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (HandlerId, &GestureHandler)> {
        self.handlers.iter()
    }

    // =========================================================================
    // Dispatch
    //
    // Negative tags belong to root containers and are never reported.
    // =========================================================================

    pub(crate) fn dispatch_state_change(
        &mut self,
        id: HandlerId,
        new: GestureState,
        old: GestureState,
        now: Duration,
    ) {
        let Self {
            handlers, listener, ..
        } = self;
        if let (Some(handler), Some(listener)) = (handlers.get(id), listener.as_mut())
            && handler.tag() >= 0
        {
            let mut event = handler.event_data(now);
            event.state = new;
            listener.on_state_change(&event, new, old);
        }
    }

    pub(crate) fn dispatch_handler_update(&mut self, id: HandlerId, now: Duration) {
        let Self {
            handlers, listener, ..
        } = self;
        if let (Some(handler), Some(listener)) = (handlers.get(id), listener.as_mut())
            && handler.tag() >= 0
        {
            listener.on_handler_update(&handler.event_data(now));
        }
    }

    /// Deliver touch payloads the handler has queued.
    pub(crate) fn dispatch_touch_events(&mut self, id: HandlerId) {
        let Self {
            handlers, listener, ..
        } = self;
        let Some(handler) = handlers.get_mut(id) else {
            return;
        };
        let payloads = handler.take_touch_events();
        if let Some(listener) = listener.as_mut()
            && handler.tag() >= 0
        {
            for payload in &payloads {
                listener.on_touch_event(handler.tag(), payload);
            }
        }
    }
}
