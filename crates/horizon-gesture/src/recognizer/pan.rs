//! Pan: continuous dragging with one or more pointers.
//!
//! Translation is measured in view coordinates. Velocity is measured in
//! screen coordinates so a view that moves with the gesture doesn't feed back
//! into it.

use std::time::Duration;

use horizon_gesture_core::{Alarm, HandlerTag, Point, Result};
use serde::Deserialize;
use serde_json::Value;

use super::{GestureData, Recognize, RecognizerInput};
use crate::config::{GestureSettings, decode, ensure, ensure_distance, ensure_pointer_bounds};
use crate::event::PointerAction;
use crate::state::{GestureState, Transition, Transitions};
use crate::velocity::VelocityTracker;

const DEFAULT_MAX_POINTERS: usize = 10;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PanConfig {
    active_offset_x_start: Option<f32>,
    active_offset_x_end: Option<f32>,
    fail_offset_x_start: Option<f32>,
    fail_offset_x_end: Option<f32>,
    active_offset_y_start: Option<f32>,
    active_offset_y_end: Option<f32>,
    fail_offset_y_start: Option<f32>,
    fail_offset_y_end: Option<f32>,
    min_dist: Option<f32>,
    min_velocity: Option<f32>,
    min_velocity_x: Option<f32>,
    min_velocity_y: Option<f32>,
    min_pointers: Option<usize>,
    max_pointers: Option<usize>,
    avg_touches: Option<bool>,
    activate_after_long_press: Option<u64>,
}

impl PanConfig {
    fn has_custom_activation_criteria(&self) -> bool {
        [
            self.active_offset_x_start,
            self.active_offset_x_end,
            self.fail_offset_x_start,
            self.fail_offset_x_end,
            self.active_offset_y_start,
            self.active_offset_y_end,
            self.fail_offset_y_start,
            self.fail_offset_y_end,
            self.min_velocity,
            self.min_velocity_x,
            self.min_velocity_y,
        ]
        .iter()
        .any(Option::is_some)
    }
}

/// Resolved pan configuration. `None` disables a criterion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanSettings {
    /// Activate when translation goes below `start` or above `end`.
    pub active_offset_x: (Option<f32>, Option<f32>),
    pub active_offset_y: (Option<f32>, Option<f32>),
    /// Fail when translation goes below `start` or above `end`.
    pub fail_offset_x: (Option<f32>, Option<f32>),
    pub fail_offset_y: (Option<f32>, Option<f32>),
    pub min_dist_sq: Option<f32>,
    pub min_velocity_x: Option<f32>,
    pub min_velocity_y: Option<f32>,
    pub min_velocity_sq: Option<f32>,
    pub min_pointers: usize,
    pub max_pointers: usize,
    pub average_touches: bool,
    pub activate_after_long_press: Duration,
    default_min_dist_sq: f32,
}

impl PanSettings {
    fn defaults(settings: &GestureSettings) -> Self {
        let slop_sq = settings.touch_slop * settings.touch_slop;
        Self {
            active_offset_x: (None, None),
            active_offset_y: (None, None),
            fail_offset_x: (None, None),
            fail_offset_y: (None, None),
            min_dist_sq: Some(slop_sq),
            min_velocity_x: None,
            min_velocity_y: None,
            min_velocity_sq: None,
            min_pointers: 1,
            max_pointers: DEFAULT_MAX_POINTERS.min(settings.pointer_limit()),
            average_touches: false,
            activate_after_long_press: Duration::ZERO,
            default_min_dist_sq: slop_sq,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PanRecognizer {
    settings: PanSettings,
    start: Point,
    last: Point,
    offset: Point,
    velocity: Point,
    tracker: VelocityTracker,
    long_press_alarm: Alarm,
}

impl PanRecognizer {
    pub fn new(settings: &GestureSettings) -> Self {
        Self {
            settings: PanSettings::defaults(settings),
            start: Point::ZERO,
            last: Point::ZERO,
            offset: Point::ZERO,
            velocity: Point::ZERO,
            tracker: VelocityTracker::new(),
            long_press_alarm: Alarm::new(),
        }
    }

    pub fn settings(&self) -> &PanSettings {
        &self.settings
    }

    /// Translation since the gesture began (or activated).
    pub fn translation(&self) -> Point {
        self.last - self.start + self.offset
    }

    pub fn velocity(&self) -> Point {
        self.velocity
    }

    fn should_activate(&self) -> bool {
        let settings = &self.settings;
        let Point { x: dx, y: dy } = self.translation();

        if beyond(settings.active_offset_x, dx) || beyond(settings.active_offset_y, dy) {
            return true;
        }
        if settings.min_dist_sq.is_some_and(|min| dx * dx + dy * dy >= min) {
            return true;
        }

        let velocity = self.velocity;
        if settings
            .min_velocity_x
            .is_some_and(|min| reaches_velocity(min, velocity.x))
            || settings
                .min_velocity_y
                .is_some_and(|min| reaches_velocity(min, velocity.y))
        {
            return true;
        }
        settings
            .min_velocity_sq
            .is_some_and(|min| velocity.x * velocity.x + velocity.y * velocity.y >= min)
    }

    fn should_fail(&mut self) -> bool {
        let Point { x: dx, y: dy } = self.translation();

        if self.settings.activate_after_long_press > Duration::ZERO
            && dx * dx + dy * dy > self.settings.default_min_dist_sq
        {
            self.long_press_alarm.disarm();
            return true;
        }
        beyond(self.settings.fail_offset_x, dx) || beyond(self.settings.fail_offset_y, dy)
    }
}

fn beyond((start, end): (Option<f32>, Option<f32>), value: f32) -> bool {
    start.is_some_and(|start| value < start) || end.is_some_and(|end| value > end)
}

// A negative threshold requires motion in the negative direction.
fn reaches_velocity(min: f32, velocity: f32) -> bool {
    if min < 0.0 {
        velocity <= min
    } else {
        velocity >= min
    }
}

impl Recognize for PanRecognizer {
    fn configure(&mut self, handler: HandlerTag, config: &Value, settings: &GestureSettings) -> Result<()> {
        let config: PanConfig = decode(handler, config)?;
        let mut resolved = PanSettings::defaults(settings);

        for (key, value) in [
            ("activeOffsetXStart", config.active_offset_x_start),
            ("activeOffsetXEnd", config.active_offset_x_end),
            ("failOffsetXStart", config.fail_offset_x_start),
            ("failOffsetXEnd", config.fail_offset_x_end),
            ("activeOffsetYStart", config.active_offset_y_start),
            ("activeOffsetYEnd", config.active_offset_y_end),
            ("failOffsetYStart", config.fail_offset_y_start),
            ("failOffsetYEnd", config.fail_offset_y_end),
            ("minVelocityX", config.min_velocity_x),
            ("minVelocityY", config.min_velocity_y),
        ] {
            ensure(value.is_none_or(f32::is_finite), handler, key, || {
                "must be a finite number".to_owned()
            })?;
        }
        ensure_distance(handler, "minDist", config.min_dist)?;
        ensure_distance(handler, "minVelocity", config.min_velocity)?;

        resolved.active_offset_x = (config.active_offset_x_start, config.active_offset_x_end);
        resolved.active_offset_y = (config.active_offset_y_start, config.active_offset_y_end);
        resolved.fail_offset_x = (config.fail_offset_x_start, config.fail_offset_x_end);
        resolved.fail_offset_y = (config.fail_offset_y_start, config.fail_offset_y_end);
        resolved.min_velocity_x = config.min_velocity_x;
        resolved.min_velocity_y = config.min_velocity_y;
        resolved.min_velocity_sq = config.min_velocity.map(|min| min * min);

        // Explicit criteria replace the default slop-based activation.
        resolved.min_dist_sq = match config.min_dist {
            Some(min) => Some(min * min),
            None if config.has_custom_activation_criteria() => None,
            None => resolved.min_dist_sq,
        };

        resolved.min_pointers = config.min_pointers.unwrap_or(resolved.min_pointers);
        resolved.max_pointers = config.max_pointers.unwrap_or(resolved.max_pointers);
        ensure_pointer_bounds(handler, resolved.min_pointers, resolved.max_pointers, settings)?;

        resolved.average_touches = config.avg_touches.unwrap_or(false);
        resolved.activate_after_long_press =
            Duration::from_millis(config.activate_after_long_press.unwrap_or(0));

        self.settings = resolved;
        Ok(())
    }

    fn evaluate(&mut self, input: &RecognizerInput<'_>) -> Transitions {
        let event = input.event;
        let state = input.state;
        let average = self.settings.average_touches;
        let mut transitions = Transitions::new();

        // The "last pointer" may change identity when the pointer set does.
        if matches!(event.action, PointerAction::PointerDown | PointerAction::PointerUp) {
            self.offset = self.offset + (self.last - self.start);
            self.last = event.last_pointer_position(average, false);
            self.start = self.last;
        } else {
            self.last = event.last_pointer_position(average, false);
        }

        let count = event.pointer_count();
        let raw = event.last_pointer_position(average, true);

        if state == GestureState::Undetermined && count >= self.settings.min_pointers {
            self.reset_progress();
            self.offset = Point::ZERO;
            self.velocity = Point::ZERO;
            self.tracker.clear();
            self.tracker.add(input.now, raw);
            transitions.push(Transition::Begin);

            if self.settings.activate_after_long_press > Duration::ZERO {
                self.long_press_alarm
                    .arm(input.now, self.settings.activate_after_long_press);
            }
        } else {
            self.tracker.add(input.now, raw);
            self.velocity = self.tracker.velocity();
        }

        match event.action {
            PointerAction::Up => transitions.push(if state == GestureState::Active {
                Transition::End
            } else {
                Transition::Fail
            }),
            PointerAction::PointerDown if count > self.settings.max_pointers => {
                transitions.push(if state == GestureState::Active {
                    Transition::Cancel
                } else {
                    Transition::Fail
                });
            }
            PointerAction::PointerUp
                if state == GestureState::Active && count.saturating_sub(1) < self.settings.min_pointers =>
            {
                transitions.push(Transition::Fail);
            }
            _ if state == GestureState::Began => {
                if self.should_fail() {
                    transitions.push(Transition::Fail);
                } else if self.should_activate() {
                    transitions.push(Transition::ACTIVATE);
                }
            }
            _ => {}
        }
        transitions
    }

    fn on_deadline(&mut self, now: Duration, state: GestureState) -> Transitions {
        if self.long_press_alarm.take_if_due(now) && state == GestureState::Began {
            vec![Transition::ACTIVATE]
        } else {
            Transitions::new()
        }
    }

    fn reset_progress(&mut self) {
        self.start = self.last;
    }

    fn on_cancel(&mut self) {
        self.long_press_alarm.disarm();
    }

    fn on_reset(&mut self) {
        self.long_press_alarm.disarm();
        self.tracker.clear();
        self.velocity = Point::ZERO;
        self.offset = Point::ZERO;
    }

    fn on_state_change(&mut self, new: GestureState, _old: GestureState) {
        if new != GestureState::Began {
            self.long_press_alarm.disarm();
        }
    }

    fn data(&self, _now: Duration) -> GestureData {
        GestureData::Pan {
            translation: self.translation(),
            velocity: self.velocity,
        }
    }

    fn pending_deadline(&self) -> Option<Duration> {
        self.long_press_alarm.deadline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognizer::test_support::{Driver, multi, touch};
    use serde_json::json;

    fn pan(config: Value) -> PanRecognizer {
        let settings = GestureSettings::default();
        let mut recognizer = PanRecognizer::new(&settings);
        recognizer.configure(1, &config, &settings).unwrap();
        recognizer
    }

    #[test]
    fn test_stays_began_below_slop() {
        let mut driver = Driver::new(pan(json!({})));

        assert_eq!(driver.send(touch(PointerAction::Down, 0.0, 0.0)), GestureState::Began);
        assert_eq!(driver.at(10).send(touch(PointerAction::Move, 5.0, 6.0)), GestureState::Began);
        assert_eq!(driver.at(20).send(touch(PointerAction::Move, 0.0, 7.9)), GestureState::Began);
        assert_eq!(driver.at(30).send(touch(PointerAction::Move, 0.0, 8.0)), GestureState::Active);
    }

    #[test]
    fn test_translation_starts_at_activation() {
        let mut driver = Driver::new(pan(json!({})));

        driver.send(touch(PointerAction::Down, 0.0, 0.0));
        driver.at(10).send(touch(PointerAction::Move, 10.0, 0.0));
        assert_eq!(driver.recognizer.translation(), Point::ZERO);

        driver.at(20).send(touch(PointerAction::Move, 25.0, 0.0));
        assert_eq!(driver.recognizer.translation(), Point::new(15.0, 0.0));

        assert_eq!(driver.at(30).send(touch(PointerAction::Up, 25.0, 0.0)), GestureState::End);
    }

    #[test]
    fn test_fail_offset_wins_over_activation() {
        let mut driver = Driver::new(pan(json!({
            "activeOffsetXEnd": 10,
            "failOffsetYEnd": 5
        })));

        driver.send(touch(PointerAction::Down, 0.0, 0.0));
        assert_eq!(driver.at(10).send(touch(PointerAction::Move, 20.0, 6.0)), GestureState::Failed);
    }

    #[test]
    fn test_custom_criteria_disable_default_slop() {
        let mut driver = Driver::new(pan(json!({ "activeOffsetXEnd": 30 })));

        driver.send(touch(PointerAction::Down, 0.0, 0.0));
        assert_eq!(driver.at(10).send(touch(PointerAction::Move, 0.0, 25.0)), GestureState::Began);
        assert_eq!(driver.at(20).send(touch(PointerAction::Move, 31.0, 25.0)), GestureState::Active);
    }

    #[test]
    fn test_negative_offset_start() {
        let mut driver = Driver::new(pan(json!({ "activeOffsetXStart": -20 })));

        driver.send(touch(PointerAction::Down, 50.0, 0.0));
        assert_eq!(driver.at(10).send(touch(PointerAction::Move, 80.0, 0.0)), GestureState::Began);
        assert_eq!(driver.at(20).send(touch(PointerAction::Move, 29.0, 0.0)), GestureState::Active);
    }

    #[test]
    fn test_min_pointers_gates_begin() {
        let mut driver = Driver::new(pan(json!({ "minPointers": 2 })));

        assert_eq!(
            driver.send(touch(PointerAction::Down, 0.0, 0.0)),
            GestureState::Undetermined
        );
        assert_eq!(
            driver.send(multi(PointerAction::PointerDown, 1, &[(0.0, 0.0), (10.0, 0.0)])),
            GestureState::Began
        );
    }

    #[test]
    fn test_exceeding_max_pointers() {
        let mut driver = Driver::new(pan(json!({ "maxPointers": 1 })));
        driver.send(touch(PointerAction::Down, 0.0, 0.0));
        assert_eq!(
            driver.send(multi(PointerAction::PointerDown, 1, &[(0.0, 0.0), (10.0, 0.0)])),
            GestureState::Failed
        );

        let mut driver = Driver::new(pan(json!({ "maxPointers": 1 })));
        driver.send(touch(PointerAction::Down, 0.0, 0.0));
        driver.at(10).send(touch(PointerAction::Move, 20.0, 0.0));
        assert_eq!(
            driver.send(multi(PointerAction::PointerDown, 1, &[(20.0, 0.0), (10.0, 0.0)])),
            GestureState::Cancelled
        );
    }

    #[test]
    fn test_dropping_below_min_pointers_while_active_fails() {
        let mut driver = Driver::new(pan(json!({ "minPointers": 2 })));
        driver.send(touch(PointerAction::Down, 0.0, 0.0));
        driver.send(multi(PointerAction::PointerDown, 1, &[(0.0, 0.0), (10.0, 0.0)]));
        driver
            .at(10)
            .send(multi(PointerAction::Move, 0, &[(20.0, 0.0), (30.0, 0.0)]));
        assert_eq!(driver.state, GestureState::Active);

        assert_eq!(
            driver.send(multi(PointerAction::PointerUp, 1, &[(20.0, 0.0), (30.0, 0.0)])),
            GestureState::Failed
        );
    }

    #[test]
    fn test_pointer_change_keeps_translation_continuous() {
        let mut driver = Driver::new(pan(json!({ "minDist": 0 })));
        driver.send(touch(PointerAction::Down, 0.0, 0.0));
        driver.at(10).send(touch(PointerAction::Move, 10.0, 0.0));
        driver.at(20).send(touch(PointerAction::Move, 30.0, 0.0));
        let before = driver.recognizer.translation();

        // The second pointer becomes the "last" pointer far away.
        driver
            .at(30)
            .send(multi(PointerAction::PointerDown, 1, &[(30.0, 0.0), (200.0, 0.0)]));
        assert_eq!(driver.recognizer.translation(), before);

        driver
            .at(40)
            .send(multi(PointerAction::Move, 0, &[(30.0, 0.0), (210.0, 0.0)]));
        assert_eq!(driver.recognizer.translation(), before + Point::new(10.0, 0.0));
    }

    #[test]
    fn test_velocity_activation() {
        let mut driver = Driver::new(pan(json!({ "minVelocityX": 500 })));
        driver.send(touch(PointerAction::Down, 0.0, 0.0));
        assert_eq!(driver.at(100).send(touch(PointerAction::Move, 5.0, 0.0)), GestureState::Began);
        assert_eq!(driver.at(110).send(touch(PointerAction::Move, 15.0, 0.0)), GestureState::Active);
        assert!(driver.recognizer.velocity().x >= 500.0);
    }

    #[test]
    fn test_activate_after_long_press() {
        let mut driver = Driver::new(pan(json!({ "activateAfterLongPress": 300 })));
        driver.send(touch(PointerAction::Down, 0.0, 0.0));
        assert_eq!(driver.recognizer.pending_deadline(), Some(Duration::from_millis(300)));
        assert_eq!(driver.at(100).send(touch(PointerAction::Move, 2.0, 0.0)), GestureState::Began);
        assert_eq!(driver.at(300).poll(), GestureState::Active);

        let mut driver = Driver::new(pan(json!({ "activateAfterLongPress": 300 })));
        driver.send(touch(PointerAction::Down, 0.0, 0.0));
        assert_eq!(driver.at(100).send(touch(PointerAction::Move, 30.0, 0.0)), GestureState::Failed);
        assert_eq!(driver.recognizer.pending_deadline(), None);
    }

    #[test]
    fn test_invalid_pointer_bounds_rejected() {
        let settings = GestureSettings::default();
        let mut recognizer = PanRecognizer::new(&settings);
        assert!(
            recognizer
                .configure(1, &json!({ "minPointers": 3, "maxPointers": 2 }), &settings)
                .is_err()
        );
        assert!(recognizer.configure(1, &json!({ "minDist": -1 }), &settings).is_err());
        assert_eq!(recognizer.settings().max_pointers, 10);
    }
}
