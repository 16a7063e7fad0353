//! Error types for Horizon Gesture.

use crate::{HandlerTag, ViewTag};

/// A specialized Result type for Horizon Gesture operations.
pub type Result<T> = std::result::Result<T, GestureError>;

/// The main error type for Horizon Gesture operations.
///
/// Invalid state transitions are not errors: they are silent no-ops so that
/// recognizers can poll transitions freely.
#[derive(Debug, thiserror::Error)]
pub enum GestureError {
    /// Hit slop combination that cannot be resolved.
    #[error("Invalid hit slop: {message}")]
    InvalidHitSlop { message: String },

    /// A configuration value was rejected.
    #[error("Invalid value for '{key}' on handler {handler}: {message}")]
    InvalidConfig {
        handler: HandlerTag,
        key: String,
        message: String,
    },

    /// The configuration object could not be decoded.
    #[error("Failed to decode configuration for handler {handler}: {source}")]
    Config {
        handler: HandlerTag,
        #[source]
        source: serde_json::Error,
    },

    /// A handler was prepared while still attached from a previous cycle.
    #[error("Handler {handler} is already prepared or hasn't been reset")]
    AlreadyPrepared { handler: HandlerTag },

    /// No factory exists for the requested handler name.
    #[error("Invalid handler name '{0}'")]
    UnknownHandlerName(String),

    /// No handler is registered under the tag.
    #[error("Handler with tag {0} does not exist")]
    HandlerNotFound(HandlerTag),

    /// A handler with the same tag is already registered.
    #[error("Handler with tag {0} is already registered")]
    DuplicateHandlerTag(HandlerTag),

    /// No orchestrator is registered for the root view.
    #[error("Root view {0} is not registered")]
    RootNotFound(ViewTag),

    /// An orchestrator already exists for the root view.
    #[error("Root view {0} is already registered")]
    RootAlreadyRegistered(ViewTag),
}

impl GestureError {
    /// Create a hit slop error.
    pub fn invalid_hit_slop(message: impl Into<String>) -> Self {
        Self::InvalidHitSlop {
            message: message.into(),
        }
    }

    /// Create a configuration value error.
    pub fn invalid_config(
        handler: HandlerTag,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidConfig {
            handler,
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a configuration decoding error.
    pub fn config(handler: HandlerTag, source: serde_json::Error) -> Self {
        Self::Config { handler, source }
    }

    /// Returns true for errors raised while applying configuration.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidHitSlop { .. } | Self::InvalidConfig { .. } | Self::Config { .. }
        )
    }
}

static_assertions::assert_impl_all!(GestureError: Send, Sync);
