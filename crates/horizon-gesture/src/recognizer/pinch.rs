//! Pinch: two or more pointers moving towards or away from each other.

use std::time::Duration;

use horizon_gesture_core::{HandlerTag, Point, Result};
use serde_json::Value;

use super::{GestureData, Recognize, RecognizerInput};
use crate::config::{GestureSettings, decode};
use crate::event::{PointerAction, PointerEvent};
use crate::state::{GestureState, Transition, Transitions};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Span {
    /// Span when the current pointer set started scaling.
    initial: f32,
    previous: f32,
}

#[derive(Debug, Clone)]
pub struct PinchRecognizer {
    span_slop: f32,
    span: Option<Span>,
    scale: f64,
    velocity: f64,
    focal: Point,
    last_time: Duration,
}

impl PinchRecognizer {
    pub fn new(settings: &GestureSettings) -> Self {
        Self {
            span_slop: settings.touch_slop,
            span: None,
            scale: 1.0,
            velocity: 0.0,
            focal: Point::ZERO,
            last_time: Duration::ZERO,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn focal(&self) -> Point {
        self.focal
    }

    /// Focal point and span of the pointers that stay down.
    fn measure(event: &PointerEvent) -> Option<(Point, f32)> {
        let pointers: Vec<Point> = event.remaining_pointers().map(|p| p.position).collect();
        if pointers.len() < 2 {
            return None;
        }
        let count = pointers.len() as f32;
        let sum = pointers.iter().fold(Point::ZERO, |sum, point| sum + *point);
        let focal = Point::new(sum.x / count, sum.y / count);

        let (dev_x, dev_y) = pointers.iter().fold((0.0, 0.0), |(x, y), point| {
            (x + (point.x - focal.x).abs(), y + (point.y - focal.y).abs())
        });
        let span_x = dev_x / count * 2.0;
        let span_y = dev_y / count * 2.0;
        Some((focal, span_x.hypot(span_y)))
    }
}

impl Recognize for PinchRecognizer {
    fn configure(&mut self, handler: HandlerTag, config: &Value, settings: &GestureSettings) -> Result<()> {
        // No pinch-specific keys; still reject malformed objects.
        let _: serde_json::Map<String, Value> = decode(handler, config)?;
        self.span_slop = settings.touch_slop;
        Ok(())
    }

    fn evaluate(&mut self, input: &RecognizerInput<'_>) -> Transitions {
        let event = input.event;
        let mut state = input.state;
        let mut transitions = Transitions::new();

        if state == GestureState::Undetermined {
            self.reset_progress();
            self.last_time = input.now;
            transitions.push(Transition::Begin);
            state = GestureState::Began;
        }

        // A changed pointer set restarts the span baseline.
        if matches!(event.action, PointerAction::PointerDown | PointerAction::PointerUp) {
            self.span = None;
        }

        match Self::measure(event) {
            Some((focal, current)) => {
                self.focal = focal;
                match self.span {
                    None => {
                        self.span = Some(Span {
                            initial: current,
                            previous: current,
                        });
                    }
                    Some(Span { initial, previous }) => {
                        let previous_scale = self.scale;
                        if previous > 0.0 {
                            self.scale *= (current / previous) as f64;
                        }
                        let elapsed = input.now.saturating_sub(self.last_time).as_secs_f64();
                        if elapsed > 0.0 {
                            self.velocity = (self.scale - previous_scale) / elapsed;
                        }
                        self.span = Some(Span {
                            initial,
                            previous: current,
                        });
                        if state == GestureState::Began && (current - initial).abs() >= self.span_slop {
                            transitions.push(Transition::ACTIVATE);
                            state = GestureState::Active;
                        }
                    }
                }
                self.last_time = input.now;
            }
            None => self.span = None,
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
        self.velocity = 0.0;
        self.scale = 1.0;
    }

    fn on_reset(&mut self) {
        self.span = None;
        self.focal = Point::ZERO;
        self.reset_progress();
    }

    fn data(&self, _now: Duration) -> GestureData {
        GestureData::Pinch {
            scale: self.scale,
            focal: self.focal,
            velocity: self.velocity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognizer::test_support::{Driver, multi, touch};

    fn pinch() -> PinchRecognizer {
        PinchRecognizer::new(&GestureSettings::default())
    }

    #[test]
    fn test_spread_activates_and_scales() {
        let mut driver = Driver::new(pinch());

        driver.send(touch(PointerAction::Down, 100.0, 100.0));
        driver.send(multi(PointerAction::PointerDown, 1, &[(100.0, 100.0), (200.0, 100.0)]));
        assert_eq!(
            driver
                .at(10)
                .send(multi(PointerAction::Move, 0, &[(97.0, 100.0), (203.0, 100.0)])),
            GestureState::Began
        );
        assert_eq!(
            driver
                .at(20)
                .send(multi(PointerAction::Move, 0, &[(50.0, 100.0), (250.0, 100.0)])),
            GestureState::Active
        );

        // Activation resets the scale; the next move measures from there.
        driver
            .at(30)
            .send(multi(PointerAction::Move, 0, &[(0.0, 100.0), (300.0, 100.0)]));
        assert!((driver.recognizer.scale() - 1.5).abs() < 1e-6);
        assert_eq!(driver.recognizer.focal(), Point::new(150.0, 100.0));
    }

    #[test]
    fn test_lifting_ends_active_pinch() {
        let mut driver = Driver::new(pinch());
        driver.send(touch(PointerAction::Down, 0.0, 0.0));
        driver.send(multi(PointerAction::PointerDown, 1, &[(0.0, 0.0), (100.0, 0.0)]));
        driver
            .at(10)
            .send(multi(PointerAction::Move, 0, &[(0.0, 0.0), (150.0, 0.0)]));
        assert_eq!(driver.state, GestureState::Active);

        assert_eq!(
            driver.send(multi(PointerAction::PointerUp, 1, &[(0.0, 0.0), (150.0, 0.0)])),
            GestureState::End
        );
    }

    #[test]
    fn test_single_pointer_fails_on_release() {
        let mut driver = Driver::new(pinch());
        assert_eq!(driver.send(touch(PointerAction::Down, 0.0, 0.0)), GestureState::Began);
        assert_eq!(driver.send(touch(PointerAction::Move, 50.0, 0.0)), GestureState::Began);
        assert_eq!(driver.send(touch(PointerAction::Up, 50.0, 0.0)), GestureState::Failed);
    }
}
