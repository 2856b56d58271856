//! Push-button Shared Types
//!
//! This crate provides the hardware-independent pieces shared by the
//! push-button daemons: digital levels, logical button events, press
//! classification, blink patterns and the run/stop state machine.

pub mod classifier;
pub mod pattern;
pub mod state_machine;

use std::fmt;

pub use classifier::{classify_press, EdgeTracker};
pub use pattern::{BlinkPattern, PatternParseError, PhaseDuration};
pub use state_machine::{PatternSet, RunState, RunStateMachine, Transition, TransitionAction};

/// Press timing parameters for the button classifier
pub mod press {
    use std::time::Duration;

    /// Interval between two samples of the button input
    pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

    /// Shorter presses are treated as contact bounce
    pub const MIN_PRESS: Duration = Duration::from_millis(500);

    /// Presses shorter than this (and at least MIN_PRESS) start the command
    pub const SHORT_PRESS: Duration = Duration::from_secs(2);

    /// Presses longer than this stop the command
    pub const LONG_PRESS: Duration = Duration::from_secs(5);
}

/// A sampled digital signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Level {
    #[default]
    Low,
    High,
}

impl Level {
    /// The opposite level
    pub fn toggled(self) -> Self {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }

    pub fn is_high(self) -> bool {
        self == Level::High
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Logical events produced by the button (or injected remotely)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonEvent {
    /// Run the configured command
    Start,
    /// Kill the running command
    Stop,
}

impl fmt::Display for ButtonEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ButtonEvent::Start => write!(f, "START"),
            ButtonEvent::Stop => write!(f, "STOP"),
        }
    }
}

/// Terminal result of one command invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The command exited with status zero
    Success,
    /// The command could not be started or exited unsuccessfully
    Failure(String),
    /// The command was cancelled (before start or by kill)
    Cancelled,
}

impl fmt::Display for CommandOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandOutcome::Success => write!(f, "success"),
            CommandOutcome::Failure(cause) => write!(f, "failure: {}", cause),
            CommandOutcome::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Errors building a [`CommandSpec`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandSpecError {
    #[error("no command given")]
    Empty,
    #[error("command program is blank")]
    BlankProgram,
}

/// Executable path plus arguments of the command started by the button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
}

impl CommandSpec {
    /// Build a spec from a full argv (program first)
    pub fn from_argv<I, S>(argv: I) -> Result<Self, CommandSpecError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut argv = argv.into_iter().map(Into::into);
        let program = argv.next().ok_or(CommandSpecError::Empty)?;
        if program.trim().is_empty() {
            return Err(CommandSpecError::BlankProgram);
        }
        Ok(Self {
            program,
            args: argv.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}
