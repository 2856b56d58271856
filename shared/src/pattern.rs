//! LED Blink Patterns
//!
//! A pattern is an (on, off) pair of phase durations. A phase given as a
//! negative number of milliseconds is jittered: every time the phase is
//! entered a fresh length is drawn from `[0.5·|d|, 1.0·|d|]`.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::Level;

/// Length of one blink phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseDuration {
    /// Always exactly this long; zero holds the level
    Fixed(Duration),
    /// Randomized within half to full of this magnitude
    Jittered(Duration),
}

impl PhaseDuration {
    /// Signed milliseconds, negative meaning jittered
    pub const fn from_millis(millis: i64) -> Self {
        if millis < 0 {
            PhaseDuration::Jittered(Duration::from_millis(millis.unsigned_abs()))
        } else {
            PhaseDuration::Fixed(Duration::from_millis(millis as u64))
        }
    }

    /// Signed milliseconds, the inverse of [`PhaseDuration::from_millis`]
    pub fn as_millis(&self) -> i64 {
        match self {
            PhaseDuration::Fixed(d) => d.as_millis() as i64,
            PhaseDuration::Jittered(d) => -(d.as_millis() as i64),
        }
    }

    /// Resolve to a concrete length using the thread-local generator
    pub fn resolve(&self) -> Duration {
        self.scale(fastrand::f64)
    }

    /// Resolve to a concrete length; jittered phases draw a new value each call
    pub fn resolve_with(&self, rng: &mut fastrand::Rng) -> Duration {
        self.scale(|| rng.f64())
    }

    fn scale(&self, mut unit: impl FnMut() -> f64) -> Duration {
        match *self {
            PhaseDuration::Fixed(d) => d,
            PhaseDuration::Jittered(d) => d.mul_f64(0.5 + unit() / 2.0),
        }
    }
}

impl fmt::Display for PhaseDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhaseDuration::Fixed(d) => write!(f, "{}ms", d.as_millis()),
            PhaseDuration::Jittered(d) => write!(f, "~{}ms", d.as_millis()),
        }
    }
}

/// On/off timing shown by the indicator LED
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlinkPattern {
    pub on: PhaseDuration,
    pub off: PhaseDuration,
}

impl BlinkPattern {
    /// Short flash every couple of seconds: nothing running
    pub const IDLE: Self = Self::from_millis(100, 2000);

    /// Steady slow blink: command running
    pub const IN_PROGRESS: Self = Self::from_millis(750, 500);

    /// Irregular flicker: last command failed
    pub const ERROR: Self = Self::from_millis(-300, -300);

    pub const fn new(on: PhaseDuration, off: PhaseDuration) -> Self {
        Self { on, off }
    }

    pub const fn from_millis(on: i64, off: i64) -> Self {
        Self::new(PhaseDuration::from_millis(on), PhaseDuration::from_millis(off))
    }

    /// The phase entered while the output is at `level`
    pub fn phase(&self, level: Level) -> PhaseDuration {
        match level {
            Level::High => self.on,
            Level::Low => self.off,
        }
    }
}

impl fmt::Display for BlinkPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "on={} off={}", self.on, self.off)
    }
}

/// Errors parsing a `ON,OFF` pattern string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternParseError {
    #[error("expected ON,OFF in milliseconds, got {0:?}")]
    Shape(String),
    #[error("invalid millisecond value {0:?}")]
    Number(String),
}

impl FromStr for BlinkPattern {
    type Err = PatternParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (on, off) = s
            .split_once(',')
            .ok_or_else(|| PatternParseError::Shape(s.to_string()))?;
        let parse = |part: &str| {
            let part = part.trim();
            part.parse::<i64>()
                .map_err(|_| PatternParseError::Number(part.to_string()))
        };
        Ok(Self::from_millis(parse(on)?, parse(off)?))
    }
}
