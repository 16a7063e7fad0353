//! Relations between handlers.
//!
//! An [`InteractionController`] answers questions about pairs of handlers:
//! whether one waits for the other to fail, whether both may be active at
//! once, and whether one cancels the other. Handlers only hold a weak
//! reference to their controller.

use std::collections::{HashMap, HashSet};

use horizon_gesture_core::HandlerTag;
use parking_lot::RwLock;
use serde::Deserialize;
use tracing::debug;

use crate::handler::GestureHandler;

/// Pairwise relations between handlers.
///
/// Every predicate is asked about `handler` with respect to `other`. The
/// reflexive case never reaches a controller.
pub trait InteractionController: Send + Sync {
    /// `handler` must not activate until `other` has failed.
    fn should_wait_for_handler_failure(&self, handler: &GestureHandler, other: &GestureHandler) -> bool;

    /// `other` must not activate until `handler` has failed.
    fn should_require_handler_to_wait_for_failure(
        &self,
        handler: &GestureHandler,
        other: &GestureHandler,
    ) -> bool;

    /// Both may be active at the same time.
    fn should_recognize_simultaneously(&self, handler: &GestureHandler, other: &GestureHandler) -> bool;

    /// `handler` should be cancelled when `other` activates.
    fn should_handler_be_cancelled_by(&self, handler: &GestureHandler, other: &GestureHandler) -> bool;
}

/// Interaction keys of a handler configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InteractionConfig {
    pub wait_for: Vec<HandlerTag>,
    pub simultaneous_handlers: Vec<HandlerTag>,
    pub blocks_handlers: Vec<HandlerTag>,
    pub disallow_interruption: bool,
}

/// The stock controller, configured per handler tag.
#[derive(Debug, Default)]
pub struct InteractionManager {
    wait_for: RwLock<HashMap<HandlerTag, Vec<HandlerTag>>>,
    simultaneous: RwLock<HashMap<HandlerTag, Vec<HandlerTag>>>,
    blocking: RwLock<HashMap<HandlerTag, Vec<HandlerTag>>>,
    disallow_interruption: RwLock<HashSet<HandlerTag>>,
}

impl InteractionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the relations of `handler`.
    pub fn configure_interactions(&self, handler: HandlerTag, config: &InteractionConfig) {
        self.drop_relations_for_handler_with_tag(handler);

        debug!(
            target: horizon_gesture_core::logging::targets::INTERACTION,
            handler,
            wait_for = ?config.wait_for,
            simultaneous = ?config.simultaneous_handlers,
            blocks = ?config.blocks_handlers,
            disallow_interruption = config.disallow_interruption,
            "configured interactions"
        );

        if !config.wait_for.is_empty() {
            self.wait_for.write().insert(handler, config.wait_for.clone());
        }
        if !config.simultaneous_handlers.is_empty() {
            self.simultaneous
                .write()
                .insert(handler, config.simultaneous_handlers.clone());
        }
        if !config.blocks_handlers.is_empty() {
            self.blocking
                .write()
                .insert(handler, config.blocks_handlers.clone());
        }
        if config.disallow_interruption {
            self.disallow_interruption.write().insert(handler);
        }
    }

    /// Forget every relation declared by `handler`.
    pub fn drop_relations_for_handler_with_tag(&self, handler: HandlerTag) {
        self.wait_for.write().remove(&handler);
        self.simultaneous.write().remove(&handler);
        self.blocking.write().remove(&handler);
        self.disallow_interruption.write().remove(&handler);
    }

    /// Forget everything.
    pub fn reset(&self) {
        self.wait_for.write().clear();
        self.simultaneous.write().clear();
        self.blocking.write().clear();
        self.disallow_interruption.write().clear();
    }

    fn relates(map: &RwLock<HashMap<HandlerTag, Vec<HandlerTag>>>, from: HandlerTag, to: HandlerTag) -> bool {
        map.read().get(&from).is_some_and(|tags| tags.contains(&to))
    }
}

impl InteractionController for InteractionManager {
    fn should_wait_for_handler_failure(&self, handler: &GestureHandler, other: &GestureHandler) -> bool {
        Self::relates(&self.wait_for, handler.tag(), other.tag())
    }

    fn should_require_handler_to_wait_for_failure(
        &self,
        handler: &GestureHandler,
        other: &GestureHandler,
    ) -> bool {
        Self::relates(&self.blocking, handler.tag(), other.tag())
    }

    fn should_recognize_simultaneously(&self, handler: &GestureHandler, other: &GestureHandler) -> bool {
        Self::relates(&self.simultaneous, handler.tag(), other.tag())
    }

    fn should_handler_be_cancelled_by(&self, _handler: &GestureHandler, other: &GestureHandler) -> bool {
        self.disallow_interruption.read().contains(&other.tag())
    }
}

static_assertions::assert_impl_all!(InteractionManager: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognizer::{Recognizer, RecognizerKind};
    use crate::config::GestureSettings;

    fn handler(tag: HandlerTag) -> GestureHandler {
        GestureHandler::new(tag, Recognizer::new(RecognizerKind::Tap, &GestureSettings::default()))
    }

    #[test]
    fn test_relations_are_directional() {
        let manager = InteractionManager::new();
        manager.configure_interactions(
            1,
            &InteractionConfig {
                wait_for: vec![2],
                blocks_handlers: vec![3],
                ..InteractionConfig::default()
            },
        );
        let (one, two, three) = (handler(1), handler(2), handler(3));

        assert!(manager.should_wait_for_handler_failure(&one, &two));
        assert!(!manager.should_wait_for_handler_failure(&two, &one));
        assert!(manager.should_require_handler_to_wait_for_failure(&one, &three));
        assert!(!manager.should_recognize_simultaneously(&one, &two));
    }

    #[test]
    fn test_disallow_interruption() {
        let manager = InteractionManager::new();
        manager.configure_interactions(
            2,
            &InteractionConfig {
                disallow_interruption: true,
                ..InteractionConfig::default()
            },
        );
        let (one, two) = (handler(1), handler(2));

        assert!(manager.should_handler_be_cancelled_by(&one, &two));
        assert!(!manager.should_handler_be_cancelled_by(&two, &one));
    }

    #[test]
    fn test_reconfigure_replaces_relations() {
        let manager = InteractionManager::new();
        manager.configure_interactions(
            1,
            &InteractionConfig {
                simultaneous_handlers: vec![2],
                ..InteractionConfig::default()
            },
        );
        manager.configure_interactions(1, &InteractionConfig::default());

        assert!(!manager.should_recognize_simultaneously(&handler(1), &handler(2)));
    }

    #[test]
    fn test_config_keys() {
        let config: InteractionConfig = serde_json::from_value(serde_json::json!({
            "waitFor": [4, 5],
            "simultaneousHandlers": [6],
            "disallowInterruption": true,
            "minDist": 20
        }))
        .unwrap();
        assert_eq!(config.wait_for, vec![4, 5]);
        assert_eq!(config.simultaneous_handlers, vec![6]);
        assert!(config.blocks_handlers.is_empty());
        assert!(config.disallow_interruption);
    }
}
