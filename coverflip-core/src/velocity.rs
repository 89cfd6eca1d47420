use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

/// Only pointer samples this recent contribute to the release velocity.
pub const DEFAULT_VELOCITY_WINDOW: Duration = Duration::from_millis(250);

/// Estimates horizontal pointer velocity from the trailing window of samples.
#[derive(Debug, Clone)]
pub struct VelocityTracker {
    samples: VecDeque<(Instant, f32)>,
    window: Duration,
}
impl Default for VelocityTracker {
    fn default() -> Self {
        Self::new(DEFAULT_VELOCITY_WINDOW)
    }
}
impl VelocityTracker {
    pub fn new(window: Duration) -> Self {
        Self {
            samples: VecDeque::new(),
            window,
        }
    }

    pub fn add_sample(&mut self, time: Instant, x: f32) {
        self.samples.push_back((time, x));
        while let Some((oldest, _)) = self.samples.front().copied()
            && oldest + self.window < time
        {
            self.samples.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Pixels per second, positive when the pointer moves right. Least-squares slope over
    /// the retained samples; zero with fewer than two distinct timestamps.
    pub fn velocity(&self) -> f32 {
        let Some((origin, _)) = self.samples.front().copied() else {
            return 0.0;
        };

        let n = self.samples.len() as f32;
        let points = self
            .samples
            .iter()
            .map(|(time, x)| (time.duration_since(origin).as_secs_f32(), *x));

        let (sum_t, sum_x, sum_tt, sum_tx) = points.fold(
            (0.0, 0.0, 0.0, 0.0),
            |(sum_t, sum_x, sum_tt, sum_tx), (t, x)| {
                (sum_t + t, sum_x + x, sum_tt + t * t, sum_tx + t * x)
            },
        );

        let denominator = n * sum_tt - sum_t * sum_t;
        if denominator.abs() <= f32::EPSILON {
            return 0.0;
        }
        (n * sum_tx - sum_t * sum_x) / denominator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_motion() {
        let start = Instant::now();
        let mut tracker = VelocityTracker::default();
        for i in 0..5 {
            tracker.add_sample(start + Duration::from_millis(i * 10), i as f32 * 5.0);
        }
        // 5px every 10ms
        assert!((tracker.velocity() - 500.0).abs() < 1.0);
    }

    #[test]
    fn test_leftward_motion_is_negative() {
        let start = Instant::now();
        let mut tracker = VelocityTracker::default();
        tracker.add_sample(start, 100.0);
        tracker.add_sample(start + Duration::from_millis(50), 50.0);
        assert!((tracker.velocity() + 1000.0).abs() < 1.0);
    }

    #[test]
    fn test_samples_outside_window_are_dropped() {
        let start = Instant::now();
        let mut tracker = VelocityTracker::default();
        // A fast early swipe, then the pointer holds still.
        tracker.add_sample(start, 0.0);
        tracker.add_sample(start + Duration::from_millis(20), 300.0);
        tracker.add_sample(start + Duration::from_millis(400), 300.0);
        tracker.add_sample(start + Duration::from_millis(450), 300.0);
        assert_eq!(tracker.velocity(), 0.0);
    }

    #[test]
    fn test_single_sample_has_no_velocity() {
        let mut tracker = VelocityTracker::default();
        tracker.add_sample(Instant::now(), 10.0);
        assert_eq!(tracker.velocity(), 0.0);
        tracker.clear();
        assert_eq!(tracker.velocity(), 0.0);
    }
}
