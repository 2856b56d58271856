//! Button Press Classification
//!
//! Turns sampled input levels into press durations and press durations
//! into logical events.

use crate::{press, ButtonEvent, Level};
use std::time::{Duration, Instant};

/// Map a completed press duration to a logical event.
///
/// Presses below [`press::MIN_PRESS`] are bounce, presses between
/// [`press::SHORT_PRESS`] and [`press::LONG_PRESS`] (inclusive) are
/// ambiguous; both yield `None`.
pub fn classify_press(duration: Duration) -> Option<ButtonEvent> {
    if duration < press::MIN_PRESS {
        None
    } else if duration < press::SHORT_PRESS {
        Some(ButtonEvent::Start)
    } else if duration > press::LONG_PRESS {
        Some(ButtonEvent::Stop)
    } else {
        None
    }
}

/// Tracks level transitions of an active-high button
#[derive(Debug, Clone)]
pub struct EdgeTracker {
    down: bool,
    pressed_at: Instant,
}

impl EdgeTracker {
    /// Start tracking from the first observed level.
    ///
    /// A button already held at this point counts as pressed at `now`.
    pub fn new(initial: Level, now: Instant) -> Self {
        Self {
            down: initial.is_high(),
            pressed_at: now,
        }
    }

    /// Whether the button was down at the last sample
    pub fn is_down(&self) -> bool {
        self.down
    }

    /// Feed one sample; returns the press duration on release
    pub fn sample(&mut self, level: Level, now: Instant) -> Option<Duration> {
        let down = level.is_high();
        if down == self.down {
            return None;
        }
        self.down = down;

        if down {
            self.pressed_at = now;
            None
        } else {
            Some(now.saturating_duration_since(self.pressed_at))
        }
    }
}
