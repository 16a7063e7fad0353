//! Per-root dispatch of pointer events to gesture handlers.
//!
//! A [`GestureOrchestrator`] owns the *arena* of one root view: the handlers
//! recorded by hit testing for the pointers currently down. For every event
//! it fires due deadlines, records new handlers on pointer down, delivers the
//! event to the arena in priority order and resolves the consequences of
//! every state change (activation, waiting for failure, cancellation).
//!
//! Handlers live in the [`HandlerRegistry`]; the orchestrator only keeps
//! their ids, so every operation takes the registry explicitly.
//!
//! # Delivery order
//!
//! Active handlers come first, by ascending activation index, then awaiting
//! handlers by ascending index, then the rest in the order they were
//! recorded. Hit testing records the deepest views first, so the most direct
//! handler sees each event before its ancestors.

use std::cmp::Ordering;
use std::time::Duration;

use horizon_gesture_core::logging::{span_names, targets};
use horizon_gesture_core::{Point, Result, ViewTag};
use tracing::{debug, trace, trace_span};

use crate::event::{PointerAction, PointerEvent};
use crate::handler::GestureHandler;
use crate::registry::{HandlerId, HandlerRegistry};
use crate::state::{GestureState, Transition};
use crate::view::{PointerEventsConfig, TargetInfo, ViewHierarchy};

/// Drives the handlers of one root view.
#[derive(Debug, Clone)]
pub struct GestureOrchestrator {
    root: ViewTag,
    gesture_handlers: Vec<HandlerId>,
    awaiting_handlers: Vec<HandlerId>,
    is_handling_touch: bool,
    handling_change_semaphore: u32,
    finished_handlers_cleanup_scheduled: bool,
    activation_index: u32,
    minimum_alpha_for_traversal: f32,
}

impl GestureOrchestrator {
    /// Create an orchestrator for the view tree under `root`.
    pub fn new(root: ViewTag, minimum_alpha_for_traversal: f32) -> Self {
        Self {
            root,
            gesture_handlers: Vec::new(),
            awaiting_handlers: Vec::new(),
            is_handling_touch: false,
            handling_change_semaphore: 0,
            finished_handlers_cleanup_scheduled: false,
            activation_index: 0,
            minimum_alpha_for_traversal,
        }
    }

    pub fn root(&self) -> ViewTag {
        self.root
    }

    /// Handlers currently recorded, in record order.
    pub fn handlers(&self) -> &[HandlerId] {
        &self.gesture_handlers
    }

    /// Handlers waiting for another handler to fail.
    pub fn awaiting_handlers(&self) -> &[HandlerId] {
        &self.awaiting_handlers
    }

    pub fn contains(&self, id: HandlerId) -> bool {
        self.gesture_handlers.contains(&id)
    }

    pub fn is_any_handler_active(&self, registry: &HandlerRegistry) -> bool {
        self.gesture_handlers
            .iter()
            .filter_map(|id| registry.get(*id))
            .any(|handler| handler.state() == GestureState::Active)
    }

    // =========================================================================
    // Entry points
    // =========================================================================

    /// Dispatch one pointer event in root coordinates.
    ///
    /// Fails only if hit testing tries to prepare a handler that another
    /// orchestrator still holds.
    pub fn on_touch_event(
        &mut self,
        registry: &mut HandlerRegistry,
        tree: &dyn ViewHierarchy,
        event: &PointerEvent,
        now: Duration,
    ) -> Result<()> {
        let _span = trace_span!(
            span_names::DISPATCH,
            root = self.root,
            action = ?event.action,
            pointers = event.pointer_count()
        )
        .entered();

        self.is_handling_touch = true;
        let result = self.dispatch(registry, tree, event, now);
        self.is_handling_touch = false;

        if self.finished_handlers_cleanup_scheduled && self.handling_change_semaphore == 0 {
            self.cleanup_finished_handlers(registry);
        }
        result
    }

    fn dispatch(
        &mut self,
        registry: &mut HandlerRegistry,
        tree: &dyn ViewHierarchy,
        event: &PointerEvent,
        now: Duration,
    ) -> Result<()> {
        self.fire_deadlines(registry, now);

        match event.action {
            PointerAction::Down | PointerAction::PointerDown => {
                self.extract_gesture_handlers(registry, tree, event)?;
            }
            PointerAction::Cancel => self.cancel_all(registry, now),
            _ => {}
        }

        self.deliver_event_to_gesture_handlers(registry, tree, event, now);
        Ok(())
    }

    /// Fire recognizer deadlines that are due at `now`.
    pub fn tick(&mut self, registry: &mut HandlerRegistry, now: Duration) {
        let _span = trace_span!(span_names::TICK, root = self.root).entered();

        self.is_handling_touch = true;
        self.fire_deadlines(registry, now);
        self.is_handling_touch = false;

        if self.finished_handlers_cleanup_scheduled && self.handling_change_semaphore == 0 {
            self.cleanup_finished_handlers(registry);
        }
    }

    fn fire_deadlines(&mut self, registry: &mut HandlerRegistry, now: Duration) {
        for id in self.gesture_handlers.clone() {
            let Some(handler) = registry.get_mut(id) else {
                continue;
            };
            let transitions = handler.poll_deadline(now);
            if !transitions.is_empty() {
                trace!(target: targets::ORCHESTRATOR, handler = handler.tag(), "deadline fired");
            }
            for transition in transitions {
                self.transition(registry, id, transition, now);
            }
        }
    }

    /// Apply a transition requested from outside the event stream.
    ///
    /// Consequences for other handlers are resolved exactly as if the
    /// recognizer had requested it.
    pub fn apply_transition(
        &mut self,
        registry: &mut HandlerRegistry,
        id: HandlerId,
        transition: Transition,
        now: Duration,
    ) {
        self.transition(registry, id, transition, now);
    }

    /// Cancel a handler, resolving the consequences for the arena.
    pub fn cancel_handler(&mut self, registry: &mut HandlerRegistry, id: HandlerId, now: Duration) {
        self.transition(registry, id, Transition::Cancel, now);
    }

    /// Cancel every handler in the arena.
    pub fn cancel_all(&mut self, registry: &mut HandlerRegistry, now: Duration) {
        for id in self.awaiting_handlers.clone().into_iter().rev() {
            self.cancel_handler(registry, id, now);
        }
        for id in self.gesture_handlers.clone().into_iter().rev() {
            self.cancel_handler(registry, id, now);
        }
    }

    /// Forget a handler without touching its state.
    pub fn remove_handler(&mut self, id: HandlerId) {
        self.gesture_handlers.retain(|other| *other != id);
        self.awaiting_handlers.retain(|other| *other != id);
    }

    // =========================================================================
    // State changes
    // =========================================================================

    fn transition(
        &mut self,
        registry: &mut HandlerRegistry,
        id: HandlerId,
        transition: Transition,
        now: Duration,
    ) {
        let Some(handler) = registry.get_mut(id) else {
            return;
        };
        let tag = handler.tag();
        let Some(change) = handler.apply(transition) else {
            return;
        };

        registry.dispatch_touch_events(id);
        debug!(
            target: targets::ORCHESTRATOR,
            handler = tag,
            state = %change.new,
            previous = %change.old,
            "state change"
        );
        self.on_handler_state_change(registry, id, change.new, change.old, now);
    }

    fn on_handler_state_change(
        &mut self,
        registry: &mut HandlerRegistry,
        id: HandlerId,
        new: GestureState,
        old: GestureState,
        now: Duration,
    ) {
        self.handling_change_semaphore += 1;

        if new.is_finished() {
            for other in self.awaiting_handlers.clone() {
                if !self.should_handler_wait_for_other(registry, other, id) {
                    continue;
                }
                if new == GestureState::End {
                    // The handler it waited for succeeded.
                    self.cancel_handler(registry, other, now);
                    if state_of(registry, other) == Some(GestureState::End) {
                        // Discrete handlers end right after activating, so
                        // the cancel above was a no-op.
                        registry.dispatch_state_change(
                            other,
                            GestureState::Cancelled,
                            GestureState::Began,
                            now,
                        );
                    }
                    if let Some(handler) = registry.get_mut(other) {
                        handler.is_awaiting = false;
                    }
                } else {
                    self.try_activate(registry, other, now);
                }
            }
            self.cleanup_awaiting_handlers(registry);
        }

        if new == GestureState::Active {
            self.try_activate(registry, id, now);
        } else if matches!(old, GestureState::Active | GestureState::End) {
            if registry.get(id).is_some_and(GestureHandler::is_active) {
                registry.dispatch_state_change(id, new, old, now);
            } else if old == GestureState::Active
                && matches!(new, GestureState::Cancelled | GestureState::Failed)
            {
                // An awaiting handler gave up before it was made active.
                registry.dispatch_state_change(id, new, GestureState::Began, now);
            }
        } else if old != GestureState::Undetermined || new != GestureState::Cancelled {
            registry.dispatch_state_change(id, new, old, now);
        }

        self.handling_change_semaphore -= 1;
        self.schedule_finished_handlers_cleanup(registry);
    }

    fn try_activate(&mut self, registry: &mut HandlerRegistry, id: HandlerId, now: Duration) {
        if self.has_other_handler_to_wait_for(registry, id) {
            self.add_awaiting_handler(registry, id);
        } else if let Some(holder) = self.blocking_active_handler(registry, id) {
            self.refuse_activation(registry, id, holder, now);
        } else {
            self.make_active(registry, id, now);
            if let Some(handler) = registry.get_mut(id) {
                handler.is_awaiting = false;
            }
        }
    }

    fn has_other_handler_to_wait_for(&self, registry: &HandlerRegistry, id: HandlerId) -> bool {
        self.gesture_handlers.iter().any(|&other| {
            state_of(registry, other).is_some_and(|state| !state.is_finished())
                && self.should_handler_wait_for_other(registry, id, other)
        })
    }

    /// An active handler sharing pointers with `id` that can't run
    /// alongside it and doesn't yield to it.
    fn blocking_active_handler(&self, registry: &HandlerRegistry, id: HandlerId) -> Option<HandlerId> {
        let handler = registry.get(id)?;
        self.gesture_handlers.iter().copied().find(|&other| {
            other != id
                && registry.get(other).is_some_and(|other| {
                    other.is_active
                        && other.recognized_state() == GestureState::Active
                        && other.has_common_pointers(handler)
                        && !can_run_simultaneously(other, handler)
                        && !other.should_be_cancelled_by(handler)
                })
        })
    }

    fn refuse_activation(
        &mut self,
        registry: &mut HandlerRegistry,
        id: HandlerId,
        holder: HandlerId,
        now: Duration,
    ) {
        let Some(handler) = registry.get_mut(id) else {
            return;
        };
        handler.is_awaiting = false;
        let tag = handler.tag();
        self.cleanup_awaiting_handlers(registry);
        debug!(
            target: targets::ORCHESTRATOR,
            handler = tag,
            holder = registry.get(holder).map(GestureHandler::tag),
            "activation refused"
        );

        self.cancel_handler(registry, id, now);
        if state_of(registry, id) == Some(GestureState::End) {
            // Ended while awaiting, so the cancel above was a no-op.
            registry.dispatch_state_change(id, GestureState::Cancelled, GestureState::Began, now);
        }
    }

    fn add_awaiting_handler(&mut self, registry: &mut HandlerRegistry, id: HandlerId) {
        if self.awaiting_handlers.contains(&id) {
            return;
        }
        let index = self.next_activation_index();
        let Some(handler) = registry.get_mut(id) else {
            return;
        };
        self.awaiting_handlers.push(id);
        handler.is_awaiting = true;
        handler.activation_index = index;
        debug!(target: targets::ORCHESTRATOR, handler = handler.tag(), index, "awaiting");
    }

    fn make_active(&mut self, registry: &mut HandlerRegistry, id: HandlerId, now: Duration) {
        let index = self.next_activation_index();
        let Some(handler) = registry.get_mut(id) else {
            return;
        };
        let current = handler.recognized_state();
        handler.is_awaiting = false;
        handler.is_active = true;
        handler.should_reset_progress = true;
        handler.activation_index = index;
        debug!(target: targets::ORCHESTRATOR, handler = handler.tag(), index, "activated");

        for other in self.gesture_handlers.clone().into_iter().rev() {
            if self.should_handler_be_cancelled_by(registry, other, id) {
                self.cancel_handler(registry, other, now);
            }
        }

        for other in self.awaiting_handlers.clone().into_iter().rev() {
            if self.should_handler_be_cancelled_by(registry, other, id) {
                self.cancel_handler(registry, other, now);
                if let Some(handler) = registry.get_mut(other) {
                    handler.is_awaiting = false;
                }
            }
        }
        self.cleanup_awaiting_handlers(registry);

        // Report what the host missed while the handler was awaiting.
        registry.dispatch_state_change(id, GestureState::Active, GestureState::Began, now);
        if current != GestureState::Active {
            registry.dispatch_state_change(id, GestureState::End, GestureState::Active, now);
            if current != GestureState::End {
                registry.dispatch_state_change(
                    id,
                    GestureState::Undetermined,
                    GestureState::End,
                    now,
                );
            }
        }
    }

    fn next_activation_index(&mut self) -> u32 {
        let index = self.activation_index;
        self.activation_index = self.activation_index.wrapping_add(1);
        index
    }

    fn cleanup_awaiting_handlers(&mut self, registry: &HandlerRegistry) {
        self.awaiting_handlers
            .retain(|id| registry.get(*id).is_some_and(GestureHandler::is_awaiting));
    }

    fn schedule_finished_handlers_cleanup(&mut self, registry: &mut HandlerRegistry) {
        if self.is_handling_touch || self.handling_change_semaphore != 0 {
            self.finished_handlers_cleanup_scheduled = true;
        } else {
            self.cleanup_finished_handlers(registry);
        }
    }

    fn cleanup_finished_handlers(&mut self, registry: &mut HandlerRegistry) {
        self.gesture_handlers.retain(|&id| match registry.get_mut(id) {
            Some(handler) if handler.recognized_state().is_finished() && !handler.is_awaiting => {
                handler.reset();
                handler.is_active = false;
                handler.is_awaiting = false;
                handler.activation_index = u32::MAX;
                false
            }
            Some(_) => true,
            None => false,
        });
        self.finished_handlers_cleanup_scheduled = false;
    }

    // =========================================================================
    // Delivery
    // =========================================================================

    fn deliver_event_to_gesture_handlers(
        &mut self,
        registry: &mut HandlerRegistry,
        tree: &dyn ViewHierarchy,
        event: &PointerEvent,
        now: Duration,
    ) {
        // The arena can change while events are delivered.
        let mut prepared = self.gesture_handlers.clone();
        prepared.sort_by(|a, b| match (registry.get(*a), registry.get(*b)) {
            (Some(a), Some(b)) => compare_handlers(a, b),
            _ => Ordering::Equal,
        });

        for id in prepared {
            self.deliver_event_to_gesture_handler(registry, tree, id, event, now);
        }
    }

    fn deliver_event_to_gesture_handler(
        &mut self,
        registry: &mut HandlerRegistry,
        tree: &dyn ViewHierarchy,
        id: HandlerId,
        event: &PointerEvent,
        now: Duration,
    ) {
        let Some(handler) = registry.get(id) else {
            return;
        };
        let view = handler
            .view()
            .filter(|view| tree.is_attached_under(*view, self.root));
        let Some(view) = view else {
            debug!(
                target: targets::ORCHESTRATOR,
                handler = handler.tag(),
                "view detached, cancelling"
            );
            self.cancel_handler(registry, id, now);
            return;
        };
        if !handler.want_events() {
            return;
        }
        let Some(offset) = tree.to_local(view, self.root, Point::ZERO) else {
            return;
        };
        let local = event.translated(offset);
        let action = event.action;

        let Some(handler) = registry.get_mut(id) else {
            return;
        };
        if let Some(target) = tree.target(view) {
            handler.set_target(target);
        }

        // Touches are reported before the handler sees the event, except the
        // first one, which waits until the handler has begun.
        let needs_pointer_data = handler.needs_pointer_data();
        if needs_pointer_data && handler.state() != GestureState::Undetermined {
            handler.update_pointer_data(&local);
            registry.dispatch_touch_events(id);
        }

        let Some(handler) = registry.get_mut(id) else {
            return;
        };
        if handler.is_awaiting && action == PointerAction::Move {
            return;
        }

        let is_first_event = handler.state() == GestureState::Undetermined;
        let transitions = handler.handle(&local, now);
        for transition in transitions {
            self.transition(registry, id, transition, now);
        }

        let Some(handler) = registry.get_mut(id) else {
            return;
        };
        if handler.is_active && handler.state() == GestureState::Active {
            // Progress made while awaiting would show up as a jump.
            if handler.should_reset_progress {
                handler.should_reset_progress = false;
                handler.reset_progress();
            }
            registry.dispatch_handler_update(id, now);
        }

        let Some(handler) = registry.get_mut(id) else {
            return;
        };
        if needs_pointer_data && is_first_event {
            handler.update_pointer_data(&local);
            registry.dispatch_touch_events(id);
        }

        if matches!(action, PointerAction::Up | PointerAction::PointerUp)
            && let Some(pointer) = event.action_pointer()
            && let Some(handler) = registry.get_mut(id)
        {
            handler.stop_tracking_pointer(pointer.id);
        }
    }

    // =========================================================================
    // Hit testing
    // =========================================================================

    fn extract_gesture_handlers(
        &mut self,
        registry: &mut HandlerRegistry,
        tree: &dyn ViewHierarchy,
        event: &PointerEvent,
    ) -> Result<()> {
        let Some(pointer) = event.action_pointer() else {
            return Ok(());
        };
        let _span = trace_span!(span_names::HIT_TEST, pointer = pointer.id).entered();

        let found = self.traverse_with_pointer_events(
            registry,
            tree,
            self.root,
            pointer.position,
            pointer.id,
        )?;
        trace!(
            target: targets::ORCHESTRATOR,
            found,
            recorded = self.gesture_handlers.len(),
            "hit test"
        );
        Ok(())
    }

    fn traverse_with_pointer_events(
        &mut self,
        registry: &mut HandlerRegistry,
        tree: &dyn ViewHierarchy,
        view: ViewTag,
        point: Point,
        pointer_id: u32,
    ) -> Result<bool> {
        Ok(match tree.pointer_events(view) {
            PointerEventsConfig::None => false,
            PointerEventsConfig::BoxOnly => {
                self.record_view_handlers_for_pointer(registry, tree, view, point, pointer_id)?
                    || is_handlerless_touch_target(tree, view, point)
            }
            PointerEventsConfig::BoxNone => {
                let found = self.extract_from_children(registry, tree, view, point, pointer_id)?;
                if found {
                    // A child handles the touch, the view's own handlers see it too.
                    self.record_view_handlers_for_pointer(registry, tree, view, point, pointer_id)?;
                }
                found
            }
            PointerEventsConfig::Auto => {
                let found = self.extract_from_children(registry, tree, view, point, pointer_id)?;
                let recorded =
                    self.record_view_handlers_for_pointer(registry, tree, view, point, pointer_id)?;
                recorded || found || is_handlerless_touch_target(tree, view, point)
            }
        })
    }

    fn extract_from_children(
        &mut self,
        registry: &mut HandlerRegistry,
        tree: &dyn ViewHierarchy,
        parent: ViewTag,
        point: Point,
        pointer_id: u32,
    ) -> Result<bool> {
        // Topmost child first.
        for child in tree.children(parent).into_iter().rev() {
            if !tree.can_receive_events(child, self.minimum_alpha_for_traversal) {
                continue;
            }
            let child_point = tree.child_point(parent, child, point);
            if (!tree.clips_children(child) || is_point_in_view(tree, child, child_point))
                && self.traverse_with_pointer_events(registry, tree, child, child_point, pointer_id)?
            {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn record_view_handlers_for_pointer(
        &mut self,
        registry: &mut HandlerRegistry,
        tree: &dyn ViewHierarchy,
        view: ViewTag,
        point: Point,
        pointer_id: u32,
    ) -> Result<bool> {
        let Some(target) = tree.target(view) else {
            return Ok(false);
        };
        let mut found =
            self.record_handlers_within(registry, view, target, view, target, point, pointer_id)?;

        // Handlers of the parent may have been skipped if this view overflows it.
        if target.size.contains(point)
            && is_view_overflowing_parent(tree, view, target)
            && self.extract_ancestor_handlers(registry, tree, view, target, point, pointer_id)?
        {
            found = true;
        }
        Ok(found)
    }

    fn extract_ancestor_handlers(
        &mut self,
        registry: &mut HandlerRegistry,
        tree: &dyn ViewHierarchy,
        view: ViewTag,
        target: TargetInfo,
        point: Point,
        pointer_id: u32,
    ) -> Result<bool> {
        let mut found = false;
        let mut parent = tree.parent(view);
        while let Some(ancestor) = parent {
            if let Some(ancestor_target) = tree.target(ancestor)
                && self.record_handlers_within(
                    registry,
                    ancestor,
                    ancestor_target,
                    view,
                    target,
                    point,
                    pointer_id,
                )?
            {
                found = true;
            }
            if ancestor == self.root {
                break;
            }
            parent = tree.parent(ancestor);
        }
        Ok(found)
    }

    /// Record the enabled handlers of `owner` whose bounds, measured on
    /// `bounds_view`, contain `point`.
    #[allow(clippy::too_many_arguments)]
    fn record_handlers_within(
        &mut self,
        registry: &mut HandlerRegistry,
        owner: ViewTag,
        owner_target: TargetInfo,
        bounds_view: ViewTag,
        bounds: TargetInfo,
        point: Point,
        pointer_id: u32,
    ) -> Result<bool> {
        let mut found = false;
        for id in registry.handlers_for_view(owner) {
            let Some(handler) = registry.get(id) else {
                continue;
            };
            if !handler.is_enabled() || !handler.is_point_within_bounds(&bounds, point) {
                continue;
            }
            trace!(
                target: targets::ORCHESTRATOR,
                handler = handler.tag(),
                view = owner,
                hit = bounds_view,
                pointer_id,
                "recorded"
            );
            self.record_handler_if_not_present(registry, id, owner, owner_target)?;
            if let Some(handler) = registry.get_mut(id) {
                handler.start_tracking_pointer(pointer_id);
            }
            found = true;
        }
        Ok(found)
    }

    fn record_handler_if_not_present(
        &mut self,
        registry: &mut HandlerRegistry,
        id: HandlerId,
        view: ViewTag,
        target: TargetInfo,
    ) -> Result<()> {
        if self.gesture_handlers.contains(&id) {
            return Ok(());
        }
        let Some(handler) = registry.get_mut(id) else {
            return Ok(());
        };
        handler.prepare(view, self.root, target)?;
        handler.is_active = false;
        handler.is_awaiting = false;
        handler.activation_index = u32::MAX;
        self.gesture_handlers.push(id);
        Ok(())
    }

    // =========================================================================
    // Relations
    // =========================================================================

    fn should_handler_wait_for_other(
        &self,
        registry: &HandlerRegistry,
        handler: HandlerId,
        other: HandlerId,
    ) -> bool {
        if handler == other {
            return false;
        }
        let (Some(handler), Some(other)) = (registry.get(handler), registry.get(other)) else {
            return false;
        };
        handler.should_wait_for_handler_failure(other)
            || other.should_require_to_wait_for_failure(handler)
    }

    fn should_handler_be_cancelled_by(
        &self,
        registry: &HandlerRegistry,
        handler: HandlerId,
        other: HandlerId,
    ) -> bool {
        let same = handler == other;
        let (Some(handler), Some(other)) = (registry.get(handler), registry.get(other)) else {
            return false;
        };
        if !handler.has_common_pointers(other) {
            return false;
        }
        if can_run_simultaneously(handler, other) {
            return false;
        }
        if !same && (handler.is_awaiting || handler.recognized_state() == GestureState::Active) {
            handler.should_be_cancelled_by(other)
        } else {
            true
        }
    }
}

fn state_of(registry: &HandlerRegistry, id: HandlerId) -> Option<GestureState> {
    registry.get(id).map(GestureHandler::recognized_state)
}

fn can_run_simultaneously(a: &GestureHandler, b: &GestureHandler) -> bool {
    a.tag() == b.tag() || a.should_recognize_simultaneously(b) || b.should_recognize_simultaneously(a)
}

fn compare_handlers(a: &GestureHandler, b: &GestureHandler) -> Ordering {
    if (a.is_active && b.is_active) || (a.is_awaiting && b.is_awaiting) {
        a.activation_index.cmp(&b.activation_index)
    } else if a.is_active {
        Ordering::Less
    } else if b.is_active {
        Ordering::Greater
    } else if a.is_awaiting {
        Ordering::Less
    } else if b.is_awaiting {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

fn is_point_in_view(tree: &dyn ViewHierarchy, view: ViewTag, point: Point) -> bool {
    tree.target(view).is_some_and(|target| target.size.contains(point))
}

/// A leaf without handlers still swallows touches inside it, so siblings
/// below it are not hit.
fn is_handlerless_touch_target(tree: &dyn ViewHierarchy, view: ViewTag, point: Point) -> bool {
    tree.children(view).is_empty() && is_point_in_view(tree, view, point)
}

fn is_view_overflowing_parent(tree: &dyn ViewHierarchy, view: ViewTag, target: TargetInfo) -> bool {
    let Some(parent) = tree.parent(view).and_then(|parent| tree.target(parent)) else {
        return false;
    };
    let origin = tree.origin(view);
    origin.x < 0.0
        || origin.y < 0.0
        || origin.x + target.size.width > parent.size.width
        || origin.y + target.size.height > parent.size.height
}
