//! Engine settings and handler configuration decoding.
//!
//! Handler configuration arrives as a flat JSON object. Every handler reads
//! the common keys in [`BaseConfig`] and the interaction keys; recognizers
//! read their own keys from the same object. Unknown keys are ignored so a
//! host can send one object for both.

use horizon_gesture_core::{GestureError, HandlerTag, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::hit_slop::HitSlopConfig;
use crate::touch::MAX_POINTERS_COUNT;

/// Engine-wide settings.
///
/// Recognizer defaults derive from these.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GestureSettings {
    /// Movement, in logical pixels, below which a pointer is considered
    /// stationary.
    pub touch_slop: f32,
    /// Views with alpha below this are skipped by hit testing.
    pub minimum_alpha_for_traversal: f32,
    /// Default movement tolerance for long press.
    pub long_press_max_dist: f32,
    /// Upper bound for pointer-count configuration.
    pub max_pointers: usize,
}

impl Default for GestureSettings {
    fn default() -> Self {
        Self {
            touch_slop: 8.0,
            minimum_alpha_for_traversal: 0.0,
            long_press_max_dist: 10.0,
            max_pointers: MAX_POINTERS_COUNT,
        }
    }
}

impl GestureSettings {
    /// The largest pointer count a handler may be configured with.
    pub fn pointer_limit(&self) -> usize {
        self.max_pointers.clamp(1, MAX_POINTERS_COUNT)
    }
}

/// Keys shared by every handler.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BaseConfig {
    pub enabled: Option<bool>,
    pub should_cancel_when_outside: Option<bool>,
    pub hit_slop: Option<HitSlopConfig>,
    pub manual_activation: Option<bool>,
    pub needs_pointer_data: Option<bool>,
}

/// Decode `config` into `T`. `null` decodes to `T::default()`.
pub(crate) fn decode<T>(handler: HandlerTag, config: &Value) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    match config {
        Value::Null => Ok(T::default()),
        Value::Object(_) => T::deserialize(config).map_err(|err| GestureError::config(handler, err)),
        _ => Err(GestureError::invalid_config(
            handler,
            "config",
            "expected an object",
        )),
    }
}

/// Fail with a configuration error unless `condition` holds.
pub(crate) fn ensure(
    condition: bool,
    handler: HandlerTag,
    key: &str,
    message: impl FnOnce() -> String,
) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(GestureError::invalid_config(handler, key, message()))
    }
}

/// Validate a `minPointers`/`maxPointers` pair.
pub(crate) fn ensure_pointer_bounds(
    handler: HandlerTag,
    min: usize,
    max: usize,
    settings: &GestureSettings,
) -> Result<()> {
    let limit = settings.pointer_limit();
    ensure(min >= 1, handler, "minPointers", || {
        "must be at least 1".to_owned()
    })?;
    ensure(max <= limit, handler, "maxPointers", || {
        format!("must not exceed {limit}")
    })?;
    ensure(min <= max, handler, "maxPointers", || {
        format!("must not be less than minPointers ({min})")
    })
}

/// Validate an optional non-negative distance.
pub(crate) fn ensure_distance(handler: HandlerTag, key: &str, value: Option<f32>) -> Result<()> {
    ensure(
        value.is_none_or(|value| value.is_finite() && value >= 0.0),
        handler,
        key,
        || "must be a non-negative number".to_owned(),
    )
}
