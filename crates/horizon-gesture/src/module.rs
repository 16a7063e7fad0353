//! The host-facing facade.
//!
//! [`GestureHandlerModule`] is what a host toolkit talks to: it creates,
//! configures, attaches and drops handlers by tag, owns one orchestrator per
//! root view and forwards pointer events to the right one.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use horizon_gesture_core::logging::targets;
use horizon_gesture_core::{GestureError, HandlerTag, Result, SharedClock, SystemClock, ViewTag};
use serde_json::{Map, Value, json};
use tracing::{debug, info};

use crate::config::{GestureSettings, decode};
use crate::event::PointerEvent;
use crate::handler::GestureHandler;
use crate::interaction::{InteractionConfig, InteractionController, InteractionManager};
use crate::listener::GestureEventListener;
use crate::orchestrator::GestureOrchestrator;
use crate::recognizer::{Recognizer, RecognizerKind};
use crate::registry::{HandlerId, HandlerRegistry};
use crate::state::{Direction, GestureState, Transition};
use crate::view::ViewHierarchy;

/// Creates handlers and routes events to them.
pub struct GestureHandlerModule {
    settings: GestureSettings,
    clock: SharedClock,
    registry: HandlerRegistry,
    interactions: Arc<InteractionManager>,
    roots: HashMap<ViewTag, GestureOrchestrator>,
}

impl std::fmt::Debug for GestureHandlerModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureHandlerModule")
            .field("settings", &self.settings)
            .field("registry", &self.registry)
            .field("roots", &self.roots.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for GestureHandlerModule {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureHandlerModule {
    /// Create a module with default settings, driven by the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock::new()))
    }

    /// Create a module with default settings and the given clock.
    pub fn with_clock(clock: SharedClock) -> Self {
        Self::with_settings(GestureSettings::default(), clock)
    }

    pub fn with_settings(settings: GestureSettings, clock: SharedClock) -> Self {
        Self {
            settings,
            clock,
            registry: HandlerRegistry::new(),
            interactions: Arc::new(InteractionManager::new()),
            roots: HashMap::new(),
        }
    }

    pub fn settings(&self) -> &GestureSettings {
        &self.settings
    }

    /// Set the listener receiving every handler event.
    pub fn set_listener(&mut self, listener: Option<Box<dyn GestureEventListener>>) {
        self.registry.set_listener(listener);
    }

    pub fn handler(&self, tag: HandlerTag) -> Option<&GestureHandler> {
        self.registry.get_by_tag(tag)
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub fn orchestrator(&self, root: ViewTag) -> Option<&GestureOrchestrator> {
        self.roots.get(&root)
    }

    pub fn interactions(&self) -> &Arc<InteractionManager> {
        &self.interactions
    }

    // =========================================================================
    // Handlers
    // =========================================================================

    /// Create a handler from its factory name, e.g. `"PanGestureHandler"`.
    pub fn create_gesture_handler(
        &mut self,
        name: &str,
        tag: HandlerTag,
        config: &Value,
    ) -> Result<()> {
        let kind = RecognizerKind::from_handler_name(name)
            .ok_or_else(|| GestureError::UnknownHandlerName(name.to_owned()))?;
        if self.registry.id_for_tag(tag).is_some() {
            return Err(GestureError::DuplicateHandlerTag(tag));
        }

        let interactions: InteractionConfig = decode(tag, config)?;
        let mut handler = GestureHandler::new(tag, Recognizer::new(kind, &self.settings));
        handler.configure(config, &self.settings)?;
        handler.set_interaction_controller(Some(self.controller()));

        self.registry.register(handler)?;
        self.interactions.configure_interactions(tag, &interactions);
        info!(target: targets::MODULE, handler = tag, name, "created handler");
        Ok(())
    }

    fn controller(&self) -> Weak<dyn InteractionController> {
        let controller: Arc<dyn InteractionController> = self.interactions.clone();
        Arc::downgrade(&controller)
    }

    /// Attach a handler to the view it recognizes gestures on.
    pub fn attach_gesture_handler(&mut self, tag: HandlerTag, view: ViewTag) -> Result<()> {
        self.registry.attach_handler_to_view(tag, view)
    }

    /// Reset a handler's configuration and apply `config`.
    ///
    /// Toggling `enabled` on a handler in a running touch sequence cancels
    /// it.
    pub fn update_gesture_handler(&mut self, tag: HandlerTag, config: &Value) -> Result<()> {
        let id = self
            .registry
            .id_for_tag(tag)
            .ok_or(GestureError::HandlerNotFound(tag))?;
        let interactions: InteractionConfig = decode(tag, config)?;

        let settings = &self.settings;
        let Some(handler) = self.registry.get_mut(id) else {
            return Err(GestureError::HandlerNotFound(tag));
        };
        let was_enabled = handler.is_enabled();
        handler.configure(config, settings)?;
        let is_enabled = handler.is_enabled();
        let prepared = handler.is_prepared();

        self.interactions.configure_interactions(tag, &interactions);

        if prepared && was_enabled != is_enabled {
            debug!(target: targets::MODULE, handler = tag, enabled = is_enabled, "enabled changed");
            self.cancel(id);
        }
        Ok(())
    }

    /// Cancel a handler if it is running and forget it.
    pub fn drop_gesture_handler(&mut self, tag: HandlerTag) -> Result<()> {
        let id = self
            .registry
            .id_for_tag(tag)
            .ok_or(GestureError::HandlerNotFound(tag))?;

        self.cancel(id);
        for orchestrator in self.roots.values_mut() {
            orchestrator.remove_handler(id);
        }
        self.interactions.drop_relations_for_handler_with_tag(tag);
        self.registry.remove(tag);
        info!(target: targets::MODULE, handler = tag, "dropped handler");
        Ok(())
    }

    /// Drive a handler from the host.
    ///
    /// `Active` forces activation even with `manualActivation`;
    /// `Undetermined` is ignored, as is any request for a handler that isn't
    /// in a touch sequence.
    pub fn set_gesture_handler_state(&mut self, tag: HandlerTag, state: GestureState) -> Result<()> {
        let id = self
            .registry
            .id_for_tag(tag)
            .ok_or(GestureError::HandlerNotFound(tag))?;
        let transition = match state {
            GestureState::Began => Transition::Begin,
            GestureState::Active => Transition::Activate { force: true },
            GestureState::End => Transition::End,
            GestureState::Failed => Transition::Fail,
            GestureState::Cancelled => Transition::Cancel,
            GestureState::Undetermined => return Ok(()),
        };
        self.transition(id, transition);
        Ok(())
    }

    fn cancel(&mut self, id: HandlerId) {
        self.transition(id, Transition::Cancel);
    }

    /// Apply a transition through the handler's orchestrator. Handlers
    /// outside a touch sequence ignore it.
    fn transition(&mut self, id: HandlerId, transition: Transition) {
        let now = self.clock.now();
        let root = self.registry.get(id).and_then(GestureHandler::orchestrator);
        match root.and_then(|root| self.roots.get_mut(&root)) {
            Some(orchestrator) => {
                orchestrator.apply_transition(&mut self.registry, id, transition, now);
            }
            None => debug!(
                target: targets::MODULE,
                ?transition,
                "ignored transition of idle handler"
            ),
        }
    }

    // =========================================================================
    // Roots
    // =========================================================================

    /// Create the orchestrator for a root view.
    pub fn register_root(&mut self, root: ViewTag) -> Result<()> {
        if self.roots.contains_key(&root) {
            return Err(GestureError::RootAlreadyRegistered(root));
        }
        self.roots.insert(
            root,
            GestureOrchestrator::new(root, self.settings.minimum_alpha_for_traversal),
        );
        debug!(target: targets::MODULE, root, "registered root");
        Ok(())
    }

    /// Cancel everything running under a root and drop its orchestrator.
    pub fn unregister_root(&mut self, root: ViewTag) -> Result<()> {
        let mut orchestrator = self
            .roots
            .remove(&root)
            .ok_or(GestureError::RootNotFound(root))?;
        orchestrator.cancel_all(&mut self.registry, self.clock.now());
        debug!(target: targets::MODULE, root, "unregistered root");
        Ok(())
    }

    /// Dispatch a pointer event, in `root` coordinates, to the handlers of
    /// `root`.
    pub fn handle_touch_event(
        &mut self,
        root: ViewTag,
        tree: &dyn ViewHierarchy,
        event: &PointerEvent,
    ) -> Result<()> {
        let now = self.clock.now();
        let orchestrator = self
            .roots
            .get_mut(&root)
            .ok_or(GestureError::RootNotFound(root))?;
        orchestrator.on_touch_event(&mut self.registry, tree, event, now)
    }

    /// Fire deadlines that are due in every root.
    pub fn tick(&mut self) {
        let now = self.clock.now();
        for orchestrator in self.roots.values_mut() {
            orchestrator.tick(&mut self.registry, now);
        }
    }

    /// Earliest pending deadline of any handler, so a host can schedule the
    /// next [`tick`](Self::tick).
    pub fn next_deadline(&self) -> Option<std::time::Duration> {
        self.registry
            .iter()
            .filter_map(|(_, handler)| handler.pending_deadline())
            .min()
    }

    /// State and direction constants, keyed the way hosts expect them.
    pub fn constants() -> Value {
        let states: Map<String, Value> = GestureState::ALL
            .iter()
            .map(|state| (state.as_str().to_owned(), json!(state.code())))
            .collect();
        json!({
            "State": states,
            "Direction": {
                "RIGHT": Direction::RIGHT.bits(),
                "LEFT": Direction::LEFT.bits(),
                "UP": Direction::UP.bits(),
                "DOWN": Direction::DOWN.bits(),
            },
        })
    }
}
