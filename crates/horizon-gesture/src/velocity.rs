//! Pointer velocity estimation.

use std::collections::VecDeque;
use std::time::Duration;

use horizon_gesture_core::Point;

/// Samples older than this, relative to the newest, are ignored.
const HORIZON: Duration = Duration::from_millis(100);

const MAX_SAMPLES: usize = 20;

/// Least-squares velocity estimate over a short sliding window.
///
/// Velocities are in pixels per second.
#[derive(Debug, Clone, Default)]
pub struct VelocityTracker {
    samples: VecDeque<(Duration, Point)>,
}

impl VelocityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a position at `time`. Samples must arrive in time order.
    pub fn add(&mut self, time: Duration, position: Point) {
        if let Some(&(last, _)) = self.samples.back()
            && time < last
        {
            self.samples.clear();
        }
        self.samples.push_back((time, position));
        while self.samples.len() > MAX_SAMPLES {
            self.samples.pop_front();
        }
        while let Some(&(first, _)) = self.samples.front()
            && time.saturating_sub(first) > HORIZON
        {
            self.samples.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Current velocity estimate. Zero until two samples span a nonzero time.
    pub fn velocity(&self) -> Point {
        let Some(&(newest, _)) = self.samples.back() else {
            return Point::ZERO;
        };
        if self.samples.len() < 2 {
            return Point::ZERO;
        }

        // Fit x(t) and y(t) with t relative to the newest sample.
        let n = self.samples.len() as f64;
        let (mut sum_t, mut sum_tt, mut sum_x, mut sum_y, mut sum_tx, mut sum_ty) =
            (0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        for &(time, position) in &self.samples {
            let t = time.as_secs_f64() - newest.as_secs_f64();
            let (x, y) = (position.x as f64, position.y as f64);
            sum_t += t;
            sum_tt += t * t;
            sum_x += x;
            sum_y += y;
            sum_tx += t * x;
            sum_ty += t * y;
        }

        let denominator = n * sum_tt - sum_t * sum_t;
        if denominator.abs() < f64::EPSILON {
            return Point::ZERO;
        }
        Point::new(
            ((n * sum_tx - sum_t * sum_x) / denominator) as f32,
            ((n * sum_ty - sum_t * sum_y) / denominator) as f32,
        )
    }
}
