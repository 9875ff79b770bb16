//! Frame-driven counter animation.
//!
//! A [`NumberAnimation`] interpolates from 0 to a target integer over a fixed
//! duration with an ease-out-quadratic curve. It does not schedule itself:
//! whoever owns it calls [`NumberAnimation::frame`] once per display refresh
//! with the current time, which makes the whole thing testable with a
//! [`ManualClock`].

use std::cell::Cell;
use std::time::{Duration, Instant};

use crate::format::format_number;

/// Default animation length in milliseconds.
pub const DEFAULT_DURATION_MS: f64 = 1000.0;

// ---------------------------------------------------------------------------
// Clocks
// ---------------------------------------------------------------------------

/// Source of frame timestamps, in milliseconds.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Monotonic wall clock measured from its creation.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn set(&self, now_ms: f64) {
        self.now.set(now_ms);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by.as_secs_f64() * 1000.0);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

// ---------------------------------------------------------------------------
// Easing
// ---------------------------------------------------------------------------

/// Ease-out-quadratic: fast start, decelerating into `1.0`.
pub fn ease_out_quad(progress: f64) -> f64 {
    progress * (2.0 - progress)
}

// ---------------------------------------------------------------------------
// Animation state machine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    Running,
    Complete,
}

/// Output of one animation frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub value: i64,
    /// `value` with thousands separators, ready to write into the element.
    pub text: String,
    pub progress: f64,
}

/// Interpolates a displayed integer from 0 to `target`.
#[derive(Debug, Clone)]
pub struct NumberAnimation {
    target: i64,
    duration_ms: f64,
    start_ms: f64,
    state: AnimationState,
}

impl NumberAnimation {
    /// Start an animation at `start_ms`. Negative or NaN durations are
    /// treated as zero.
    pub fn new(target: i64, duration_ms: f64, start_ms: f64) -> Self {
        Self {
            target,
            duration_ms: if duration_ms.is_nan() { 0.0 } else { duration_ms.max(0.0) },
            start_ms,
            state: AnimationState::Running,
        }
    }

    /// Start an animation now, according to `clock`.
    pub fn start(target: i64, duration_ms: f64, clock: &dyn Clock) -> Self {
        Self::new(target, duration_ms, clock.now_ms())
    }

    pub fn target(&self) -> i64 {
        self.target
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state == AnimationState::Complete
    }

    /// Progress in `[0, 1]` at time `now_ms`.
    ///
    /// Time before the start (a clock that went backwards) counts as zero
    /// elapsed.
    pub fn progress_at(&self, now_ms: f64) -> f64 {
        if self.duration_ms == 0.0 {
            return 1.0;
        }
        let elapsed = (now_ms - self.start_ms).max(0.0);
        (elapsed / self.duration_ms).min(1.0)
    }

    /// Compute the frame for `now_ms` and move to `Complete` once progress
    /// reaches 1. Calling it again after completion keeps returning the
    /// final frame.
    pub fn frame(&mut self, now_ms: f64) -> Frame {
        let progress = match self.state {
            AnimationState::Complete => 1.0,
            AnimationState::Running => self.progress_at(now_ms),
        };

        let value = if progress >= 1.0 {
            self.target
        } else {
            (self.target as f64 * ease_out_quad(progress)).floor() as i64
        };

        if progress >= 1.0 {
            self.state = AnimationState::Complete;
        }

        Frame {
            value,
            text: format_number(value),
            progress,
        }
    }

    /// Stop without writing anything further.
    pub(crate) fn abandon(&mut self) {
        self.state = AnimationState::Complete;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
