//! Tap: one or more quick presses in place.

use std::time::Duration;

use horizon_gesture_core::{Alarm, HandlerTag, Point, Result};
use serde::Deserialize;
use serde_json::Value;

use super::{GestureData, Recognize, RecognizerInput};
use crate::config::{GestureSettings, decode, ensure, ensure_distance};
use crate::event::PointerAction;
use crate::state::{GestureState, Transition, Transitions};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct TapConfig {
    number_of_taps: Option<u32>,
    max_duration_ms: Option<u64>,
    max_delay_ms: Option<u64>,
    max_delta_x: Option<f32>,
    max_delta_y: Option<f32>,
    max_dist: Option<f32>,
    min_pointers: Option<usize>,
}

/// Resolved tap configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TapSettings {
    pub number_of_taps: u32,
    /// Longest a single press may last.
    pub max_duration: Duration,
    /// Longest gap between consecutive presses.
    pub max_delay: Duration,
    pub max_delta_x: Option<f32>,
    pub max_delta_y: Option<f32>,
    pub max_dist_sq: Option<f32>,
    pub min_pointers: usize,
}

impl Default for TapSettings {
    fn default() -> Self {
        Self {
            number_of_taps: 1,
            max_duration: Duration::from_millis(500),
            max_delay: Duration::from_millis(200),
            max_delta_x: None,
            max_delta_y: None,
            max_dist_sq: None,
            min_pointers: 1,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TapRecognizer {
    settings: TapSettings,
    start: Point,
    last: Point,
    offset: Point,
    taps_so_far: u32,
    max_pointers_seen: usize,
    fail_alarm: Alarm,
}

impl TapRecognizer {
    pub fn settings(&self) -> &TapSettings {
        &self.settings
    }

    pub fn taps_so_far(&self) -> u32 {
        self.taps_so_far
    }

    fn should_fail(&self) -> bool {
        let Point { x: dx, y: dy } = self.last - self.start + self.offset;
        let settings = &self.settings;

        settings.max_delta_x.is_some_and(|max| dx.abs() > max)
            || settings.max_delta_y.is_some_and(|max| dy.abs() > max)
            || settings.max_dist_sq.is_some_and(|max| dx * dx + dy * dy > max)
    }

    fn start_tap(&mut self, now: Duration) {
        self.fail_alarm.arm(now, self.settings.max_duration);
    }

    fn end_tap(&mut self, now: Duration, transitions: &mut Transitions) {
        self.fail_alarm.disarm();
        self.taps_so_far += 1;
        if self.taps_so_far == self.settings.number_of_taps
            && self.max_pointers_seen >= self.settings.min_pointers
        {
            transitions.push(Transition::ACTIVATE);
            transitions.push(Transition::End);
        } else {
            self.fail_alarm.arm(now, self.settings.max_delay);
        }
    }
}

impl Recognize for TapRecognizer {
    fn configure(&mut self, handler: HandlerTag, config: &Value, settings: &GestureSettings) -> Result<()> {
        let config: TapConfig = decode(handler, config)?;
        let defaults = TapSettings::default();

        let number_of_taps = config.number_of_taps.unwrap_or(defaults.number_of_taps);
        ensure(number_of_taps >= 1, handler, "numberOfTaps", || {
            "must be at least 1".to_owned()
        })?;
        let min_pointers = config.min_pointers.unwrap_or(defaults.min_pointers);
        let limit = settings.pointer_limit();
        ensure((1..=limit).contains(&min_pointers), handler, "minPointers", || {
            format!("must be between 1 and {limit}")
        })?;
        ensure_distance(handler, "maxDeltaX", config.max_delta_x)?;
        ensure_distance(handler, "maxDeltaY", config.max_delta_y)?;
        ensure_distance(handler, "maxDist", config.max_dist)?;

        self.settings = TapSettings {
            number_of_taps,
            max_duration: config
                .max_duration_ms
                .map_or(defaults.max_duration, Duration::from_millis),
            max_delay: config
                .max_delay_ms
                .map_or(defaults.max_delay, Duration::from_millis),
            max_delta_x: config.max_delta_x,
            max_delta_y: config.max_delta_y,
            max_dist_sq: config.max_dist.map(|max| max * max),
            min_pointers,
        };
        Ok(())
    }

    fn evaluate(&mut self, input: &RecognizerInput<'_>) -> Transitions {
        let event = input.event;
        let state = input.state;
        let mut transitions = Transitions::new();

        if state == GestureState::Undetermined {
            self.offset = Point::ZERO;
            self.start = event.last_pointer_position(true, false);
        }

        if matches!(event.action, PointerAction::PointerDown | PointerAction::PointerUp) {
            self.offset = self.offset + (self.last - self.start);
            self.last = event.last_pointer_position(true, false);
            self.start = self.last;
        } else {
            self.last = event.last_pointer_position(true, false);
        }

        self.max_pointers_seen = self.max_pointers_seen.max(event.pointer_count());

        if self.should_fail() {
            transitions.push(Transition::Fail);
        } else if state == GestureState::Undetermined {
            if event.action == PointerAction::Down {
                transitions.push(Transition::Begin);
            }
            self.start_tap(input.now);
        } else if state == GestureState::Began {
            match event.action {
                PointerAction::Up => self.end_tap(input.now, &mut transitions),
                PointerAction::Down => self.start_tap(input.now),
                _ => {}
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
        self.taps_so_far = 0;
        self.max_pointers_seen = 0;
        self.fail_alarm.disarm();
    }

    fn on_state_change(&mut self, new: GestureState, _old: GestureState) {
        if new.is_finished() {
            self.fail_alarm.disarm();
        }
    }

    fn data(&self, _now: Duration) -> GestureData {
        GestureData::Tap
    }

    fn pending_deadline(&self) -> Option<Duration> {
        self.fail_alarm.deadline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognizer::test_support::{Driver, multi, touch};
    use serde_json::json;

    fn tap(config: Value) -> TapRecognizer {
        let mut recognizer = TapRecognizer::default();
        recognizer
            .configure(1, &config, &GestureSettings::default())
            .unwrap();
        recognizer
    }

    #[test]
    fn test_single_tap() {
        let mut driver = Driver::new(tap(json!({})));

        assert_eq!(driver.send(touch(PointerAction::Down, 10.0, 10.0)), GestureState::Began);
        assert_eq!(driver.at(80).send(touch(PointerAction::Up, 11.0, 10.0)), GestureState::End);
        assert_eq!(
            driver.history,
            vec![GestureState::Began, GestureState::Active, GestureState::End]
        );
    }

    #[test]
    fn test_press_too_long_fails() {
        let mut driver = Driver::new(tap(json!({ "maxDurationMs": 300 })));

        driver.send(touch(PointerAction::Down, 0.0, 0.0));
        assert_eq!(driver.at(299).poll(), GestureState::Began);
        assert_eq!(driver.at(300).poll(), GestureState::Failed);
    }

    #[test]
    fn test_double_tap() {
        let mut driver = Driver::new(tap(json!({ "numberOfTaps": 2 })));

        driver.send(touch(PointerAction::Down, 0.0, 0.0));
        assert_eq!(driver.at(50).send(touch(PointerAction::Up, 0.0, 0.0)), GestureState::Began);
        assert_eq!(driver.recognizer.taps_so_far(), 1);
        assert_eq!(driver.recognizer.pending_deadline(), Some(Duration::from_millis(250)));

        driver.at(150).send(touch(PointerAction::Down, 2.0, 0.0));
        assert_eq!(driver.at(200).send(touch(PointerAction::Up, 2.0, 0.0)), GestureState::End);
    }

    #[test]
    fn test_gap_too_long_fails() {
        let mut driver = Driver::new(tap(json!({ "numberOfTaps": 2 })));

        driver.send(touch(PointerAction::Down, 0.0, 0.0));
        driver.at(50).send(touch(PointerAction::Up, 0.0, 0.0));
        assert_eq!(driver.at(251).poll(), GestureState::Failed);
    }

    #[test]
    fn test_moving_too_far_fails() {
        let mut driver = Driver::new(tap(json!({ "maxDist": 10 })));

        driver.send(touch(PointerAction::Down, 0.0, 0.0));
        assert_eq!(driver.send(touch(PointerAction::Move, 6.0, 6.0)), GestureState::Began);
        assert_eq!(driver.send(touch(PointerAction::Move, 8.0, 8.0)), GestureState::Failed);

        let mut driver = Driver::new(tap(json!({ "maxDeltaX": 5 })));
        driver.send(touch(PointerAction::Down, 0.0, 0.0));
        assert_eq!(driver.send(touch(PointerAction::Move, 0.0, 50.0)), GestureState::Began);
        assert_eq!(driver.send(touch(PointerAction::Move, -6.0, 50.0)), GestureState::Failed);
    }

    #[test]
    fn test_min_pointers() {
        let mut driver = Driver::new(tap(json!({ "minPointers": 2 })));

        driver.send(touch(PointerAction::Down, 0.0, 0.0));
        driver.send(multi(PointerAction::PointerDown, 1, &[(0.0, 0.0), (20.0, 0.0)]));
        driver.send(multi(PointerAction::PointerUp, 1, &[(0.0, 0.0), (20.0, 0.0)]));
        assert_eq!(driver.at(60).send(touch(PointerAction::Up, 0.0, 0.0)), GestureState::End);

        let mut driver = Driver::new(tap(json!({ "minPointers": 2 })));
        driver.send(touch(PointerAction::Down, 0.0, 0.0));
        assert_eq!(driver.at(60).send(touch(PointerAction::Up, 0.0, 0.0)), GestureState::Began);
    }

    #[test]
    fn test_reset_clears_taps_and_alarm() {
        let mut driver = Driver::new(tap(json!({ "numberOfTaps": 3 })));
        driver.send(touch(PointerAction::Down, 0.0, 0.0));
        driver.at(50).send(touch(PointerAction::Up, 0.0, 0.0));

        driver.recognizer.on_reset();
        assert_eq!(driver.recognizer.taps_so_far(), 0);
        assert_eq!(driver.recognizer.pending_deadline(), None);
    }

    #[test]
    fn test_zero_taps_rejected() {
        let mut recognizer = TapRecognizer::default();
        let result = recognizer.configure(1, &json!({ "numberOfTaps": 0 }), &GestureSettings::default());
        assert!(result.is_err());
    }
}
