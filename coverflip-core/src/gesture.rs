//! Turns a raw single-pointer stream into drags, clicks and settles.
//!
//! The scroll offset is measured in pixels from the left edge of the previous slot, so a
//! centered view sits at one page width and the offset is always within `0..=2 pages`.
use std::time::{Duration, Instant};

use crate::{
    CENTER_SLOT, CoverViewConfig, Delta, STORE_SIZE,
    scroll_animator::ScrollAnimator,
    velocity::VelocityTracker,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchKind {
    Down,
    Move,
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchEvent {
    pub kind: TouchKind,
    pub x: f32,
    pub y: f32,
    pub time: Instant,
}
impl TouchEvent {
    pub fn down(x: f32, y: f32, time: Instant) -> Self {
        Self {
            kind: TouchKind::Down,
            x,
            y,
            time,
        }
    }

    pub fn moved(x: f32, y: f32, time: Instant) -> Self {
        Self {
            kind: TouchKind::Move,
            x,
            y,
            time,
        }
    }

    pub fn up(x: f32, y: f32, time: Instant) -> Self {
        Self {
            kind: TouchKind::Up,
            x,
            y,
            time,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Phase {
    Idle,
    Dragging {
        start_x: f32,
        start_y: f32,
        last_x: f32,
        tracker: VelocityTracker,
    },
    Settling {
        animator: ScrollAnimator,
        pending_commit: Option<Delta>,
    },
}

/// What a touch event did to the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    /// Nothing visible changed.
    None,
    /// The scroll offset moved.
    Redraw,
    /// Released without travelling far enough to be a drag.
    Click,
    /// Released into a settle toward `target_page`.
    Settle {
        target_page: usize,
        pending_commit: Option<Delta>,
    },
}

/// One frame of a settle animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettleFrame {
    pub offset: f32,
    pub finished: bool,
    /// Set on the final frame when the settle landed on a neighbouring page.
    pub commit: Option<Delta>,
}

pub struct GestureController {
    phase: Phase,
    scroll_offset: f32,
    page_width: f32,
    click_threshold: f32,
    min_fling_velocity: f32,
    velocity_window: Duration,
    settle_ms_per_pixel: f32,
    interrupted_commit: Option<Delta>,
}
impl GestureController {
    pub fn new(config: &CoverViewConfig) -> Self {
        Self {
            phase: Phase::Idle,
            scroll_offset: 0.0,
            page_width: 0.0,
            click_threshold: config.click_threshold,
            min_fling_velocity: config.min_fling_velocity,
            velocity_window: config.velocity_window(),
            settle_ms_per_pixel: config.settle_ms_per_pixel,
            interrupted_commit: None,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_settling(&self) -> bool {
        matches!(self.phase, Phase::Settling { .. })
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging { .. })
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    pub fn page_width(&self) -> f32 {
        self.page_width
    }

    /// Abandons any gesture or animation and centers on the current slot. Returns the move
    /// an interrupted settle was heading for, which the caller still has to apply.
    pub fn reset(&mut self, page_width: f32) -> Option<Delta> {
        let interrupted = self.interrupt();
        let earlier = self.interrupted_commit.take();
        self.page_width = page_width;
        self.phase = Phase::Idle;
        self.scroll_offset = page_width * CENTER_SLOT as f32;
        interrupted.or(earlier)
    }

    /// Stops a running settle by jumping to its target page. If that page is a neighbour
    /// the offset is recentred and the move is returned; the caller must shift its window
    /// by it before the next frame.
    pub fn interrupt(&mut self) -> Option<Delta> {
        let Phase::Settling {
            animator,
            pending_commit,
        } = &self.phase
        else {
            return None;
        };
        let (to, commit) = (animator.to(), *pending_commit);
        tracing::debug!(
            "Interrupted settle at offset {}, jumping to {to} (commit: {commit:?})",
            self.scroll_offset
        );

        self.phase = Phase::Idle;
        self.scroll_offset = match commit {
            Some(delta) => to - delta.as_i32() as f32 * self.page_width,
            None => to,
        };
        commit
    }

    /// The move of a settle that a touch or `scroll_to_neighbour` cut short, if the caller
    /// didn't `interrupt` it first.
    pub fn take_interrupted_commit(&mut self) -> Option<Delta> {
        self.interrupted_commit.take()
    }

    /// Feeds one pointer event. `at_start` is whether the window shows the first item of
    /// the sequence, which forbids scrolling onto the (empty) previous page.
    pub fn on_touch(&mut self, event: TouchEvent, at_start: bool) -> GestureOutcome {
        match event.kind {
            TouchKind::Down => {
                self.begin(event);
                GestureOutcome::None
            }
            TouchKind::Move => {
                if !self.is_dragging() {
                    self.begin(event);
                }
                self.drag(event, at_start)
            }
            TouchKind::Up => {
                if !self.is_dragging() {
                    self.begin(event);
                }
                self.release(event, at_start)
            }
        }
    }

    /// Starts a settle onto the page next to the current one, as if flung there.
    pub fn scroll_to_neighbour(
        &mut self,
        delta: Delta,
        at_start: bool,
        now: Instant,
    ) -> GestureOutcome {
        if self.is_dragging() {
            return GestureOutcome::None;
        }
        self.stash_interrupted();
        let (min, max) = page_bounds(at_start);
        let target = (CENTER_SLOT as i32 + delta.as_i32()).clamp(min, max);
        self.settle_to(target as usize, now)
    }

    /// Advances the settle animation, if one is running.
    pub fn tick(&mut self, now: Instant) -> Option<SettleFrame> {
        let Phase::Settling {
            animator,
            pending_commit,
        } = &self.phase
        else {
            return None;
        };

        let sample = animator.sample(now);
        self.scroll_offset = sample.offset;
        if !sample.finished {
            return Some(SettleFrame {
                offset: sample.offset,
                finished: false,
                commit: None,
            });
        }

        let commit = *pending_commit;
        self.phase = Phase::Idle;
        Some(SettleFrame {
            offset: sample.offset,
            finished: true,
            commit,
        })
    }

    fn stash_interrupted(&mut self) {
        if let Some(delta) = self.interrupt() {
            self.interrupted_commit = Some(delta);
        }
    }

    fn begin(&mut self, event: TouchEvent) {
        self.stash_interrupted();

        let mut tracker = VelocityTracker::new(self.velocity_window);
        tracker.add_sample(event.time, event.x);
        self.phase = Phase::Dragging {
            start_x: event.x,
            start_y: event.y,
            last_x: event.x,
            tracker,
        };
    }

    fn drag(&mut self, event: TouchEvent, at_start: bool) -> GestureOutcome {
        let Phase::Dragging {
            last_x, tracker, ..
        } = &mut self.phase
        else {
            return GestureOutcome::None;
        };

        tracker.add_sample(event.time, event.x);
        let delta_x = *last_x - event.x;
        *last_x = event.x;

        let applied = if delta_x < 0.0 {
            let floor = if at_start { self.page_width } else { 0.0 };
            let available = self.scroll_offset - floor;
            if available > 0.0 {
                delta_x.max(-available)
            } else {
                0.0
            }
        } else if delta_x > 0.0 {
            let available = self.max_offset() - self.scroll_offset;
            if available > 0.0 {
                delta_x.min(available)
            } else {
                0.0
            }
        } else {
            0.0
        };

        if applied == 0.0 {
            return GestureOutcome::None;
        }
        self.scroll_offset += applied;
        GestureOutcome::Redraw
    }

    fn release(&mut self, event: TouchEvent, at_start: bool) -> GestureOutcome {
        let Phase::Dragging {
            start_x,
            start_y,
            mut tracker,
            ..
        } = std::mem::replace(&mut self.phase, Phase::Idle)
        else {
            return GestureOutcome::None;
        };

        let travel = (start_x - event.x).abs() + (start_y - event.y).abs();
        if travel < self.click_threshold {
            return GestureOutcome::Click;
        }

        tracker.add_sample(event.time, event.x);
        let velocity = tracker.velocity();
        drop(tracker);

        let target = self.fling_target(velocity, at_start);
        tracing::debug!(
            "Released at offset {} with velocity {velocity:.0}px/s, settling on page {target}",
            self.scroll_offset
        );
        self.settle_to(target, event.time)
    }

    /// The nearest page, pushed one further in the direction of a fast enough fling.
    fn fling_target(&self, velocity: f32, at_start: bool) -> usize {
        let (min, max) = page_bounds(at_start);
        let nearest = if self.page_width > 0.0 {
            (self.scroll_offset / self.page_width).round() as i32
        } else {
            CENTER_SLOT as i32
        };

        let mut target = nearest.clamp(min, max);
        if velocity > self.min_fling_velocity && target != min {
            target -= 1;
        } else if velocity < -self.min_fling_velocity && target != max {
            target += 1;
        }
        target as usize
    }

    fn settle_to(&mut self, target_page: usize, now: Instant) -> GestureOutcome {
        let to = target_page as f32 * self.page_width;
        let pending_commit = Delta::from_page_offset(target_page as i32 - CENTER_SLOT as i32);

        if to == self.scroll_offset && pending_commit.is_none() {
            self.phase = Phase::Idle;
            return GestureOutcome::None;
        }

        self.phase = Phase::Settling {
            animator: ScrollAnimator::start(self.scroll_offset, to, now, self.settle_ms_per_pixel),
            pending_commit,
        };
        GestureOutcome::Settle {
            target_page,
            pending_commit,
        }
    }

    fn max_offset(&self) -> f32 {
        self.page_width * (STORE_SIZE - 1) as f32
    }
}

fn page_bounds(at_start: bool) -> (i32, i32) {
    let min = if at_start { CENTER_SLOT as i32 } else { 0 };
    (min, STORE_SIZE as i32 - 1)
}
