//! Long press: a press held in place for a minimum duration.

use std::time::Duration;

use horizon_gesture_core::{Alarm, HandlerTag, Point, Result};
use serde::Deserialize;
use serde_json::Value;

use super::{GestureData, Recognize, RecognizerInput};
use crate::config::{GestureSettings, decode, ensure_distance};
use crate::event::PointerAction;
use crate::state::{GestureState, Transition, Transitions};

const DEFAULT_MIN_DURATION: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct LongPressConfig {
    min_duration_ms: Option<u64>,
    max_dist: Option<f32>,
}

/// Resolved long press configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LongPressSettings {
    pub min_duration: Duration,
    pub max_dist_sq: f32,
}

impl LongPressSettings {
    fn defaults(settings: &GestureSettings) -> Self {
        Self {
            min_duration: DEFAULT_MIN_DURATION,
            max_dist_sq: settings.long_press_max_dist * settings.long_press_max_dist,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LongPressRecognizer {
    settings: LongPressSettings,
    start: Point,
    start_time: Duration,
    activation_alarm: Alarm,
}

impl LongPressRecognizer {
    pub fn new(settings: &GestureSettings) -> Self {
        Self {
            settings: LongPressSettings::defaults(settings),
            start: Point::ZERO,
            start_time: Duration::ZERO,
            activation_alarm: Alarm::new(),
        }
    }

    pub fn settings(&self) -> &LongPressSettings {
        &self.settings
    }
}

impl Recognize for LongPressRecognizer {
    fn configure(&mut self, handler: HandlerTag, config: &Value, settings: &GestureSettings) -> Result<()> {
        let config: LongPressConfig = decode(handler, config)?;
        ensure_distance(handler, "maxDist", config.max_dist)?;

        let defaults = LongPressSettings::defaults(settings);
        self.settings = LongPressSettings {
            min_duration: config
                .min_duration_ms
                .map_or(defaults.min_duration, Duration::from_millis),
            max_dist_sq: config
                .max_dist
                .map_or(defaults.max_dist_sq, |max| max * max),
        };
        Ok(())
    }

    fn evaluate(&mut self, input: &RecognizerInput<'_>) -> Transitions {
        let event = input.event;
        let state = input.state;
        let mut transitions = Transitions::new();

        if state == GestureState::Undetermined {
            self.start_time = input.now;
            self.start = event.last_pointer_position(true, false);
            transitions.push(Transition::Begin);
            if self.settings.min_duration.is_zero() {
                transitions.push(Transition::ACTIVATE);
            } else {
                self.activation_alarm.arm(input.now, self.settings.min_duration);
            }
        }

        if event.action == PointerAction::Up {
            self.activation_alarm.disarm();
            transitions.push(if state == GestureState::Active {
                Transition::End
            } else {
                Transition::Fail
            });
        } else {
            let distance_sq = event
                .last_pointer_position(true, false)
                .distance_squared(self.start);
            if distance_sq > self.settings.max_dist_sq {
                transitions.push(if state == GestureState::Active {
                    Transition::Cancel
                } else {
                    Transition::Fail
                });
            }
        }
        transitions
    }

    fn on_deadline(&mut self, now: Duration, state: GestureState) -> Transitions {
        if self.activation_alarm.take_if_due(now) && state == GestureState::Began {
            vec![Transition::ACTIVATE]
        } else {
            Transitions::new()
        }
    }

    fn on_cancel(&mut self) {
        self.activation_alarm.disarm();
    }

    fn on_reset(&mut self) {
        self.activation_alarm.disarm();
    }

    // The alarm only matters while waiting to activate.
    fn on_state_change(&mut self, new: GestureState, _old: GestureState) {
        if new != GestureState::Began {
            self.activation_alarm.disarm();
        }
    }

    fn data(&self, now: Duration) -> GestureData {
        GestureData::LongPress {
            duration: now.saturating_sub(self.start_time),
        }
    }

    fn pending_deadline(&self) -> Option<Duration> {
        self.activation_alarm.deadline()
    }
}
