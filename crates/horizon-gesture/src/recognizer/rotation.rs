//! Rotation: two pointers turning around their midpoint.

use std::f64::consts::PI;
use std::time::Duration;

use horizon_gesture_core::{HandlerTag, Point, Result};
use serde_json::Value;

use super::{GestureData, Recognize, RecognizerInput, normalize_angle};
use crate::config::{GestureSettings, decode};
use crate::event::PointerAction;
use crate::state::{GestureState, Transition, Transitions};

/// Accumulated rotation needed to activate.
const ROTATION_RECOGNITION_THRESHOLD: f64 = PI / 36.0;

#[derive(Debug, Clone, Default)]
pub struct RotationRecognizer {
    rotation: f64,
    velocity: f64,
    anchor: Point,
    previous_angle: Option<f64>,
    last_time: Duration,
}

impl RotationRecognizer {
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn anchor(&self) -> Point {
        self.anchor
    }
}

impl Recognize for RotationRecognizer {
    fn configure(&mut self, handler: HandlerTag, config: &Value, _settings: &GestureSettings) -> Result<()> {
        let _: serde_json::Map<String, Value> = decode(handler, config)?;
        Ok(())
    }

    fn evaluate(&mut self, input: &RecognizerInput<'_>) -> Transitions {
        let event = input.event;
        let mut state = input.state;
        let mut transitions = Transitions::new();

        if state == GestureState::Undetermined {
            self.reset_progress();
            self.previous_angle = None;
            self.last_time = input.now;
            transitions.push(Transition::Begin);
            state = GestureState::Began;
        }

        if matches!(event.action, PointerAction::PointerDown | PointerAction::PointerUp) {
            self.previous_angle = None;
        }

        let mut remaining = event.remaining_pointers();
        match (remaining.next(), remaining.next()) {
            (Some(first), Some(second)) => {
                self.anchor = first.position.midpoint(second.position);
                let angle = first.position.angle_to(second.position) as f64;
                if let Some(previous) = self.previous_angle {
                    let previous_rotation = self.rotation;
                    self.rotation += normalize_angle(angle - previous);
                    let elapsed = input.now.saturating_sub(self.last_time).as_secs_f64();
                    if elapsed > 0.0 {
                        self.velocity = (self.rotation - previous_rotation) / elapsed;
                    }
                    if state == GestureState::Began
                        && self.rotation.abs() >= ROTATION_RECOGNITION_THRESHOLD
                    {
                        transitions.push(Transition::ACTIVATE);
                        state = GestureState::Active;
                    }
                }
                self.previous_angle = Some(angle);
                self.last_time = input.now;
            }
            _ => self.previous_angle = None,
        }

        let remaining = event.remaining_pointers().count();
        if state == GestureState::Active && remaining < 2 {
            transitions.push(Transition::End);
        } else if event.action == PointerAction::Up {
            transitions.push(Transition::Fail);
        }
        transitions
    }

    fn reset_progress(&mut self) {
        self.rotation = 0.0;
        self.velocity = 0.0;
    }

    fn on_reset(&mut self) {
        self.previous_angle = None;
        self.anchor = Point::ZERO;
        self.reset_progress();
    }

    fn data(&self, _now: Duration) -> GestureData {
        GestureData::Rotation {
            rotation: self.rotation,
            anchor: self.anchor,
            velocity: self.velocity,
        }
    }
}
