//! Fling: a quick swipe in one of the configured directions.

use std::time::Duration;

use horizon_gesture_core::{Alarm, GestureError, HandlerTag, Point, Result};
use serde::Deserialize;
use serde_json::Value;

use super::{GestureData, Recognize, RecognizerInput};
use crate::config::{GestureSettings, decode, ensure};
use crate::event::PointerAction;
use crate::state::{Direction, GestureState, Transition, Transitions};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct FlingConfig {
    number_of_pointers: Option<usize>,
    direction: Option<u32>,
}

/// Resolved fling configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlingSettings {
    pub number_of_pointers_required: usize,
    pub direction: Direction,
    /// The swipe fails if the pointers are not lifted within this time.
    pub max_duration: Duration,
    /// Minimum displacement along an allowed direction, in screen pixels.
    pub min_acceptable_delta: f32,
}

impl Default for FlingSettings {
    fn default() -> Self {
        Self {
            number_of_pointers_required: 1,
            direction: Direction::RIGHT,
            max_duration: Duration::from_millis(800),
            min_acceptable_delta: 160.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FlingRecognizer {
    settings: FlingSettings,
    start: Point,
    max_pointers_seen: usize,
    fail_alarm: Alarm,
}

impl FlingRecognizer {
    pub fn settings(&self) -> &FlingSettings {
        &self.settings
    }

    fn swiped(&self, end: Point) -> bool {
        let delta = end - self.start;
        let min = self.settings.min_acceptable_delta;
        let direction = self.settings.direction;

        let moved = (direction.contains(Direction::RIGHT) && delta.x > min)
            || (direction.contains(Direction::LEFT) && delta.x < -min)
            || (direction.contains(Direction::UP) && delta.y < -min)
            || (direction.contains(Direction::DOWN) && delta.y > min);

        moved && self.max_pointers_seen == self.settings.number_of_pointers_required
    }
}

impl Recognize for FlingRecognizer {
    fn configure(&mut self, handler: HandlerTag, config: &Value, settings: &GestureSettings) -> Result<()> {
        let config: FlingConfig = decode(handler, config)?;
        let defaults = FlingSettings::default();

        let pointers = config
            .number_of_pointers
            .unwrap_or(defaults.number_of_pointers_required);
        let limit = settings.pointer_limit();
        ensure((1..=limit).contains(&pointers), handler, "numberOfPointers", || {
            format!("must be between 1 and {limit}")
        })?;

        let direction = match config.direction {
            Some(bits) => Direction::from_bits(bits).ok_or_else(|| {
                GestureError::invalid_config(
                    handler,
                    "direction",
                    format!("{bits} is not a non-empty combination of direction flags"),
                )
            })?,
            None => defaults.direction,
        };

        self.settings = FlingSettings {
            number_of_pointers_required: pointers,
            direction,
            ..defaults
        };
        Ok(())
    }

    fn evaluate(&mut self, input: &RecognizerInput<'_>) -> Transitions {
        let event = input.event;
        let mut transitions = Transitions::new();

        if input.state == GestureState::Undetermined {
            self.start = event.first_raw();
            self.max_pointers_seen = 0;
            self.fail_alarm.arm(input.now, self.settings.max_duration);
            transitions.push(Transition::Begin);
        }

        self.max_pointers_seen = self.max_pointers_seen.max(event.pointer_count());

        if event.action == PointerAction::Up {
            if self.swiped(event.first_raw()) {
                self.fail_alarm.disarm();
                transitions.push(Transition::ACTIVATE);
                transitions.push(Transition::End);
            } else {
                transitions.push(Transition::Fail);
            }
        }
        transitions
    }

    fn on_deadline(&mut self, now: Duration, state: GestureState) -> Transitions {
        if self.fail_alarm.take_if_due(now) && !state.is_finished() {
            vec![Transition::Fail]
        } else {
            Transitions::new()
        }
    }

    fn on_cancel(&mut self) {
        self.fail_alarm.disarm();
    }

    fn on_reset(&mut self) {
        self.fail_alarm.disarm();
        self.max_pointers_seen = 0;
    }

    fn on_state_change(&mut self, new: GestureState, _old: GestureState) {
        if new.is_finished() {
            self.fail_alarm.disarm();
        }
    }

    fn data(&self, _now: Duration) -> GestureData {
        GestureData::Fling
    }

    fn pending_deadline(&self) -> Option<Duration> {
        self.fail_alarm.deadline()
    }
}
