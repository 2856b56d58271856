//! Run/Stop State Machine
//!
//! Decides what the dispatcher does for each button event or command
//! outcome. Holds no handles itself; the caller performs the returned
//! action.

use crate::{BlinkPattern, ButtonEvent, CommandOutcome};

/// Whether a command invocation is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Running,
}

/// What the caller has to do after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionAction {
    /// Start a new invocation
    Launch,
    /// Cancel the active invocation; its outcome will follow
    Cancel,
    /// The active invocation is over; drop its handle
    Finish,
    /// Redundant input, nothing to do
    Ignore { reason: &'static str },
}

/// Result of feeding one input to the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub from: RunState,
    pub to: RunState,
    pub action: TransitionAction,
    /// Pattern to send to the LED, if it changes
    pub pattern: Option<BlinkPattern>,
}

/// The three patterns the state machine selects from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternSet {
    pub idle: BlinkPattern,
    pub in_progress: BlinkPattern,
    pub error: BlinkPattern,
}

impl Default for PatternSet {
    fn default() -> Self {
        Self {
            idle: BlinkPattern::IDLE,
            in_progress: BlinkPattern::IN_PROGRESS,
            error: BlinkPattern::ERROR,
        }
    }
}

impl PatternSet {
    /// Pattern shown after an invocation ends with `outcome`
    pub fn for_outcome(&self, outcome: &CommandOutcome) -> BlinkPattern {
        match outcome {
            CommandOutcome::Success | CommandOutcome::Cancelled => self.idle,
            CommandOutcome::Failure(_) => self.error,
        }
    }
}

/// Idle/Running state machine driven by button events and outcomes
#[derive(Debug)]
pub struct RunStateMachine {
    state: RunState,
    cancel_requested: bool,
    patterns: PatternSet,
}

impl Default for RunStateMachine {
    fn default() -> Self {
        Self::new(PatternSet::default())
    }
}

impl RunStateMachine {
    /// Create a new state machine in Idle state
    pub fn new(patterns: PatternSet) -> Self {
        Self {
            state: RunState::Idle,
            cancel_requested: false,
            patterns,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Process a button (or injected) event
    pub fn on_event(&mut self, event: ButtonEvent) -> Transition {
        use ButtonEvent::*;
        use RunState::*;

        match (self.state, event) {
            (Idle, Start) => {
                self.state = Running;
                self.cancel_requested = false;
                Transition {
                    from: Idle,
                    to: Running,
                    action: TransitionAction::Launch,
                    pattern: Some(self.patterns.in_progress),
                }
            }
            (Idle, Stop) => self.ignore("nothing is in progress"),
            (Running, Start) => self.ignore("already running"),
            (Running, Stop) if self.cancel_requested => self.ignore("already stopping"),
            (Running, Stop) => {
                self.cancel_requested = true;
                Transition {
                    from: Running,
                    to: Running,
                    action: TransitionAction::Cancel,
                    pattern: None,
                }
            }
        }
    }

    /// Process the outcome of the active invocation
    pub fn on_outcome(&mut self, outcome: &CommandOutcome) -> Transition {
        if self.state == RunState::Idle {
            return self.ignore("no invocation in flight");
        }

        self.state = RunState::Idle;
        self.cancel_requested = false;
        Transition {
            from: RunState::Running,
            to: RunState::Idle,
            action: TransitionAction::Finish,
            pattern: Some(self.patterns.for_outcome(outcome)),
        }
    }

    fn ignore(&self, reason: &'static str) -> Transition {
        Transition {
            from: self.state,
            to: self.state,
            action: TransitionAction::Ignore { reason },
            pattern: None,
        }
    }
}
