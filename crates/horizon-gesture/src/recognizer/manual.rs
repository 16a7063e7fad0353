//! Manual: begins on touch, every further decision belongs to the host.

use std::time::Duration;

use horizon_gesture_core::{HandlerTag, Result};
use serde_json::Value;

use super::{GestureData, Recognize, RecognizerInput};
use crate::config::{GestureSettings, decode};
use crate::state::{GestureState, Transition, Transitions};

#[derive(Debug, Clone, Copy, Default)]
pub struct ManualRecognizer;

impl Recognize for ManualRecognizer {
    fn configure(&mut self, handler: HandlerTag, config: &Value, _settings: &GestureSettings) -> Result<()> {
        let _: serde_json::Map<String, Value> = decode(handler, config)?;
        Ok(())
    }

    fn evaluate(&mut self, input: &RecognizerInput<'_>) -> Transitions {
        if input.state == GestureState::Undetermined {
            vec![Transition::Begin]
        } else {
            Transitions::new()
        }
    }

    fn data(&self, _now: Duration) -> GestureData {
        GestureData::Manual
    }
}
