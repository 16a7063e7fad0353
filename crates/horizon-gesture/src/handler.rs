//! The gesture handler state machine.
//!
//! A [`GestureHandler`] wraps a [`Recognizer`] with the parts every gesture
//! shares: guarded state transitions, configuration, pointer tracking and
//! bounds checks. Transitions requested from an ineligible state are silent
//! no-ops, so recognizers can request them freely.
//!
//! # Lifecycle
//!
//! A handler is *prepared* by its orchestrator when a touch lands on its
//! view, receives events until it reaches a terminal state, and is then
//! *reset* for the next touch sequence.

use std::sync::{Arc, Weak};
use std::time::Duration;

use horizon_gesture_core::logging::targets;
use horizon_gesture_core::{GestureError, HandlerTag, Point, Result, ViewTag};
use serde_json::Value;
use tracing::trace;

use crate::config::{BaseConfig, GestureSettings, decode};
use crate::event::PointerEvent;
use crate::hit_slop::{self, HitSlop, HitSlopConfig};
use crate::interaction::InteractionController;
use crate::listener::GestureEventData;
use crate::recognizer::{Recognizer, RecognizerInput, RecognizerKind};
use crate::state::{GestureState, StateChange, Transition, Transitions};
use crate::touch::{PointerDataTracker, TouchEventPayload, TrackedPointers};
use crate::view::TargetInfo;

/// A gesture recognizer instance.
#[derive(Debug)]
pub struct GestureHandler {
    tag: HandlerTag,
    state: GestureState,
    recognizer: Recognizer,

    // Configuration
    enabled: bool,
    should_cancel_when_outside: bool,
    manual_activation: bool,
    needs_pointer_data: bool,
    hit_slop: Option<HitSlop>,
    interaction_controller: Option<Weak<dyn InteractionController>>,

    // Attachment
    attached_view: Option<ViewTag>,
    view: Option<ViewTag>,
    orchestrator: Option<ViewTag>,
    target: Option<TargetInfo>,

    // Pointers
    tracked: TrackedPointers,
    pointer_data: PointerDataTracker,
    pending_touch_events: Vec<TouchEventPayload>,
    position: Point,
    last_position: Point,
    last_absolute_position: Point,
    number_of_pointers: usize,
    within_bounds: bool,

    // Orchestrator bookkeeping
    pub(crate) activation_index: u32,
    pub(crate) is_active: bool,
    pub(crate) is_awaiting: bool,
    pub(crate) should_reset_progress: bool,
}

impl GestureHandler {
    /// Create a handler with default configuration.
    pub fn new(tag: HandlerTag, recognizer: Recognizer) -> Self {
        Self {
            tag,
            state: GestureState::Undetermined,
            recognizer,
            enabled: true,
            should_cancel_when_outside: false,
            manual_activation: false,
            needs_pointer_data: false,
            hit_slop: None,
            interaction_controller: None,
            attached_view: None,
            view: None,
            orchestrator: None,
            target: None,
            tracked: TrackedPointers::default(),
            pointer_data: PointerDataTracker::default(),
            pending_touch_events: Vec::new(),
            position: Point::ZERO,
            last_position: Point::ZERO,
            last_absolute_position: Point::ZERO,
            number_of_pointers: 0,
            within_bounds: false,
            activation_index: u32::MAX,
            is_active: false,
            is_awaiting: false,
            should_reset_progress: false,
        }
    }

    pub fn tag(&self) -> HandlerTag {
        self.tag
    }

    /// State as hosts see it. A handler awaiting another's failure stays
    /// `Began` until the orchestrator makes it active.
    pub fn state(&self) -> GestureState {
        if self.is_awaiting && matches!(self.state, GestureState::Active | GestureState::End) {
            GestureState::Began
        } else {
            self.state
        }
    }

    /// State as the recognizer last left it, including a pending activation.
    pub(crate) fn recognized_state(&self) -> GestureState {
        self.state
    }

    pub fn kind(&self) -> RecognizerKind {
        self.recognizer.kind()
    }

    pub fn recognizer(&self) -> &Recognizer {
        &self.recognizer
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn should_cancel_when_outside(&self) -> bool {
        self.should_cancel_when_outside
    }

    pub fn manual_activation(&self) -> bool {
        self.manual_activation
    }

    pub fn needs_pointer_data(&self) -> bool {
        self.needs_pointer_data
    }

    pub fn hit_slop(&self) -> Option<&HitSlop> {
        self.hit_slop.as_ref()
    }

    /// The view the host attached this handler to.
    pub fn attached_view(&self) -> Option<ViewTag> {
        self.attached_view
    }

    /// The view this handler is prepared on, if a touch sequence is running.
    pub fn view(&self) -> Option<ViewTag> {
        self.view
    }

    /// Root view of the orchestrator driving this handler.
    pub fn orchestrator(&self) -> Option<ViewTag> {
        self.orchestrator
    }

    pub fn is_prepared(&self) -> bool {
        self.view.is_some() || self.orchestrator.is_some()
    }

    /// Position of the first tracked pointer, in view coordinates.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Average position of the pointers that stay down.
    pub fn last_position(&self) -> Point {
        self.last_position
    }

    /// Same as [`last_position`](Self::last_position), in screen coordinates.
    pub fn last_absolute_position(&self) -> Point {
        self.last_absolute_position
    }

    pub fn number_of_pointers(&self) -> usize {
        self.number_of_pointers
    }

    /// Whether the last event landed inside the (slop-adjusted) bounds.
    pub fn is_within_bounds(&self) -> bool {
        self.within_bounds
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn is_awaiting(&self) -> bool {
        self.is_awaiting
    }

    pub fn activation_index(&self) -> u32 {
        self.activation_index
    }

    pub fn tracked_pointer_count(&self) -> usize {
        self.tracked.count()
    }

    /// Pending alarm deadline of the recognizer, if any.
    pub fn pending_deadline(&self) -> Option<Duration> {
        self.recognizer.pending_deadline()
    }

    /// Whether the handler should receive the next event.
    pub fn want_events(&self) -> bool {
        self.enabled && !self.state.is_finished() && self.tracked.count() > 0
    }

    /// Whether `point` (view coordinates) is inside the slop-adjusted bounds
    /// of `target`.
    pub fn is_point_within_bounds(&self, target: &TargetInfo, point: Point) -> bool {
        hit_slop::is_within_bounds(self.hit_slop.as_ref(), target, point)
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Reset the configuration to defaults and apply `config`.
    ///
    /// Nothing changes if any value is rejected.
    pub(crate) fn configure(&mut self, config: &Value, settings: &GestureSettings) -> Result<()> {
        let base: BaseConfig = decode(self.tag, config)?;
        let hit_slop = base.hit_slop.map(HitSlopConfig::resolve).transpose()?;
        self.recognizer.configure(self.tag, config, settings)?;

        self.enabled = base.enabled.unwrap_or(true);
        self.should_cancel_when_outside = base.should_cancel_when_outside.unwrap_or(false);
        self.manual_activation = base.manual_activation.unwrap_or(false);
        self.needs_pointer_data = base.needs_pointer_data.unwrap_or(false);
        self.hit_slop = hit_slop;
        Ok(())
    }

    /// Set hit slop directly, validating it first.
    pub fn set_hit_slop(&mut self, hit_slop: Option<HitSlop>) -> Result<()> {
        if let Some(hit_slop) = &hit_slop {
            hit_slop.validate()?;
        }
        self.hit_slop = hit_slop;
        Ok(())
    }

    pub fn set_interaction_controller(&mut self, controller: Option<Weak<dyn InteractionController>>) {
        self.interaction_controller = controller;
    }

    pub(crate) fn set_attached_view(&mut self, view: Option<ViewTag>) {
        self.attached_view = view;
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Attach to `view` under the orchestrator of `root` for one touch
    /// sequence.
    pub(crate) fn prepare(&mut self, view: ViewTag, root: ViewTag, target: TargetInfo) -> Result<()> {
        if self.is_prepared() {
            return Err(GestureError::AlreadyPrepared { handler: self.tag });
        }
        self.view = Some(view);
        self.orchestrator = Some(root);
        self.target = Some(target);
        self.state = GestureState::Undetermined;
        self.tracked.clear();
        self.pointer_data.clear();
        self.pending_touch_events.clear();
        trace!(target: targets::HANDLER, handler = self.tag, view, "prepared");
        Ok(())
    }

    /// Detach and return to `Undetermined` without reporting.
    pub(crate) fn reset(&mut self) {
        self.view = None;
        self.orchestrator = None;
        self.target = None;
        self.tracked.clear();
        self.pointer_data.clear();
        self.pending_touch_events.clear();
        self.number_of_pointers = 0;
        self.within_bounds = false;
        self.state = GestureState::Undetermined;
        self.recognizer.on_reset();
        trace!(target: targets::HANDLER, handler = self.tag, "reset");
    }

    pub(crate) fn set_target(&mut self, target: TargetInfo) {
        self.target = Some(target);
    }

    pub(crate) fn start_tracking_pointer(&mut self, pointer_id: u32) {
        self.tracked.start_tracking(self.tag, pointer_id);
    }

    pub(crate) fn stop_tracking_pointer(&mut self, pointer_id: u32) {
        self.tracked.stop_tracking(pointer_id);
    }

    pub fn has_common_pointers(&self, other: &GestureHandler) -> bool {
        self.tracked.has_common(&other.tracked)
    }

    // =========================================================================
    // Event processing
    // =========================================================================

    /// Process one event in view coordinates and return the transitions the
    /// recognizer requests.
    pub(crate) fn handle(&mut self, event: &PointerEvent, now: Duration) -> Transitions {
        if !self.want_events() {
            return Transitions::new();
        }

        let event = self.tracked.adapt(event);
        self.number_of_pointers = event.pointer_count();
        self.position = event.first_position();
        self.last_position = event.last_pointer_position(true, false);
        self.last_absolute_position = event.last_pointer_position(true, true);
        self.within_bounds = self
            .target
            .is_some_and(|target| self.is_point_within_bounds(&target, self.position));

        if self.should_cancel_when_outside && !self.within_bounds {
            return match self.state {
                GestureState::Active => vec![Transition::Cancel],
                GestureState::Began => vec![Transition::Fail],
                _ => Transitions::new(),
            };
        }

        self.recognizer.evaluate(&RecognizerInput {
            event: &event,
            state: self.state,
            now,
        })
    }

    /// Transitions caused by a recognizer deadline passing.
    pub(crate) fn poll_deadline(&mut self, now: Duration) -> Transitions {
        if self.state.is_finished() || !self.is_prepared() {
            return Transitions::new();
        }
        self.recognizer.on_deadline(now, self.state)
    }

    pub(crate) fn reset_progress(&mut self) {
        self.recognizer.reset_progress();
    }

    /// Apply a transition. Returns the change if the state actually changed.
    pub(crate) fn apply(&mut self, transition: Transition) -> Option<StateChange> {
        if !transition.is_allowed_from(self.state) {
            return None;
        }
        match transition {
            Transition::Activate { force } => {
                if self.manual_activation && !force {
                    return None;
                }
                if self.state != GestureState::Active {
                    self.recognizer.reset_progress();
                }
            }
            Transition::Cancel => self.recognizer.on_cancel(),
            _ => {}
        }
        Some(self.move_to_state(transition.target()))
    }

    fn move_to_state(&mut self, new: GestureState) -> StateChange {
        let old = self.state;
        self.state = new;

        if new.is_finished()
            && self.needs_pointer_data
            && let Some(payload) = self.pointer_data.cancel()
        {
            self.pending_touch_events.push(payload);
        }

        self.recognizer.on_state_change(new, old);
        trace!(
            target: targets::HANDLER,
            handler = self.tag,
            state = %new,
            previous = %old,
            "state transition"
        );
        StateChange { new, old }
    }

    /// Record raw pointer data for `event` (view coordinates).
    pub(crate) fn update_pointer_data(&mut self, event: &PointerEvent) {
        if self.tracked.count() == 0 {
            return;
        }
        let event = self.tracked.adapt(event);
        let payloads = self.pointer_data.update(&event);
        self.pending_touch_events.extend(payloads);
    }

    pub(crate) fn take_touch_events(&mut self) -> Vec<TouchEventPayload> {
        std::mem::take(&mut self.pending_touch_events)
    }

    /// Snapshot for listeners.
    pub fn event_data(&self, now: Duration) -> GestureEventData {
        GestureEventData {
            handler_tag: self.tag,
            view: self.attached_view,
            kind: self.kind(),
            state: self.state,
            position: self.position,
            absolute_position: self.last_absolute_position,
            number_of_pointers: self.number_of_pointers,
            data: self.recognizer.data(now),
        }
    }

    // =========================================================================
    // Interactions
    // =========================================================================

    fn controller(&self) -> Option<Arc<dyn InteractionController>> {
        self.interaction_controller.as_ref()?.upgrade()
    }

    fn is_same(&self, other: &GestureHandler) -> bool {
        self.tag == other.tag
    }

    pub fn should_wait_for_handler_failure(&self, other: &GestureHandler) -> bool {
        !self.is_same(other)
            && self
                .controller()
                .is_some_and(|controller| controller.should_wait_for_handler_failure(self, other))
    }

    pub fn should_require_to_wait_for_failure(&self, other: &GestureHandler) -> bool {
        !self.is_same(other)
            && self.controller().is_some_and(|controller| {
                controller.should_require_handler_to_wait_for_failure(self, other)
            })
    }

    pub fn should_recognize_simultaneously(&self, other: &GestureHandler) -> bool {
        self.is_same(other)
            || self
                .controller()
                .is_some_and(|controller| controller.should_recognize_simultaneously(self, other))
    }

    pub fn should_be_cancelled_by(&self, other: &GestureHandler) -> bool {
        !self.is_same(other)
            && self
                .controller()
                .is_some_and(|controller| controller.should_handler_be_cancelled_by(self, other))
    }
}
