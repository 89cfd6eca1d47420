use std::time::{Duration, Instant};

/// Settle duration per pixel of travel.
pub const DEFAULT_MS_PER_PIXEL: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSample {
    pub offset: f32,
    pub finished: bool,
}

/// Interpolates a scroll offset toward a target page. Sampled once per frame; the
/// duration grows linearly with the distance travelled.
#[derive(Debug, Clone)]
pub struct ScrollAnimator {
    from: f32,
    to: f32,
    start: Instant,
    duration: Duration,
}
impl ScrollAnimator {
    pub fn start(from: f32, to: f32, now: Instant, ms_per_pixel: f32) -> Self {
        let millis = (to - from).abs() * ms_per_pixel.max(0.0);
        Self {
            from,
            to,
            start: now,
            duration: Duration::from_micros((millis * 1000.0).round() as u64),
        }
    }

    pub fn from(&self) -> f32 {
        self.from
    }

    pub fn to(&self) -> f32 {
        self.to
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn sample(&self, now: Instant) -> AnimationSample {
        let elapsed = now.saturating_duration_since(self.start);
        if elapsed >= self.duration {
            return AnimationSample {
                offset: self.to,
                finished: true,
            };
        }

        let t = elapsed.as_secs_f32() / self.duration.as_secs_f32();
        AnimationSample {
            offset: self.from + (self.to - self.from) * decelerate(t),
            finished: false,
        }
    }
}

/// Quadratic ease-out: fast at first, slowing into the target.
pub fn decelerate(t: f32) -> f32 {
    let remaining = 1.0 - t.clamp(0.0, 1.0);
    1.0 - remaining * remaining
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_is_proportional_to_distance() {
        let now = Instant::now();
        let animator = ScrollAnimator::start(480.0, 0.0, now, DEFAULT_MS_PER_PIXEL);
        assert_eq!(animator.duration(), Duration::from_millis(960));

        let animator = ScrollAnimator::start(100.0, 150.0, now, DEFAULT_MS_PER_PIXEL);
        assert_eq!(animator.duration(), Duration::from_millis(100));
    }

    #[test]
    fn test_samples_decelerate_toward_target() {
        let start = Instant::now();
        let animator = ScrollAnimator::start(0.0, 400.0, start, DEFAULT_MS_PER_PIXEL);

        let quarter = animator.sample(start + Duration::from_millis(200));
        let half = animator.sample(start + Duration::from_millis(400));
        let three_quarters = animator.sample(start + Duration::from_millis(600));

        assert!(!half.finished);
        assert!(quarter.offset < half.offset && half.offset < three_quarters.offset);
        // More ground is covered in the first half than the second.
        assert!(half.offset > 200.0);
        assert!(half.offset - quarter.offset > three_quarters.offset - half.offset);
    }

    #[test]
    fn test_final_sample_lands_exactly_on_target() {
        let start = Instant::now();
        let animator = ScrollAnimator::start(320.0, 640.0, start, DEFAULT_MS_PER_PIXEL);
        let end = animator.sample(start + Duration::from_secs(5));
        assert_eq!(
            end,
            AnimationSample {
                offset: 640.0,
                finished: true
            }
        );
    }

    #[test]
    fn test_zero_distance_finishes_immediately() {
        let start = Instant::now();
        let animator = ScrollAnimator::start(320.0, 320.0, start, DEFAULT_MS_PER_PIXEL);
        assert!(animator.sample(start).finished);
    }

    #[test]
    fn test_decelerate_endpoints() {
        assert_eq!(decelerate(0.0), 0.0);
        assert_eq!(decelerate(1.0), 1.0);
        assert_eq!(decelerate(2.0), 1.0);
    }
}
