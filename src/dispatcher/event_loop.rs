//! Dispatcher event loop - drives the runner and the LED from button events

use crate::led::BlinkHandle;
use crate::runner::{cancel_pair, run_command, CancelHandle, ProcessLauncher};
use pushbutton_shared::{
    state_machine::PatternSet, BlinkPattern, ButtonEvent, CommandOutcome, CommandSpec, RunState,
    RunStateMachine, TransitionAction,
};
use std::future::{self, Future};
use tokio::sync::{mpsc, oneshot};
use tracing::{error, info, warn};

const EVENT_QUEUE: usize = 16;

/// The invocation owned by the Running state
struct ActiveInvocation {
    cancel: CancelHandle,
    outcome: oneshot::Receiver<CommandOutcome>,
}

/// Owns the run state and the only cancellation handle
pub struct Dispatcher<L: ProcessLauncher> {
    fsm: RunStateMachine,
    launcher: L,
    spec: CommandSpec,
    led: BlinkHandle,
    event_rx: mpsc::Receiver<ButtonEvent>,
    active: Option<ActiveInvocation>,
}

impl<L: ProcessLauncher> Dispatcher<L> {
    /// Create a dispatcher and the sender feeding its event intake.
    ///
    /// Button watcher and remote triggers clone the same sender.
    pub fn new(
        launcher: L,
        spec: CommandSpec,
        patterns: PatternSet,
        led: BlinkHandle,
    ) -> (Self, mpsc::Sender<ButtonEvent>) {
        let (event_tx, event_rx) = mpsc::channel(EVENT_QUEUE);

        let dispatcher = Self {
            fsm: RunStateMachine::new(patterns),
            launcher,
            spec,
            led,
            event_rx,
            active: None,
        };

        (dispatcher, event_tx)
    }

    pub fn state(&self) -> RunState {
        self.fsm.state()
    }

    /// Run until every event sender is dropped
    pub async fn run(self) {
        self.run_until(future::pending()).await
    }

    /// Run until `shutdown` resolves or the intake closes.
    ///
    /// A command still running at that point is killed and reaped before
    /// this returns. The LED handle is dropped with the dispatcher.
    pub async fn run_until<F: Future<Output = ()>>(mut self, shutdown: F) {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("[DISPATCH] shutting down while {:?}", self.state());
                    break;
                }

                event = self.event_rx.recv() => match event {
                    Some(event) => self.handle_event(event).await,
                    None => {
                        info!("[DISPATCH] event intake closed");
                        break;
                    }
                },

                outcome = next_outcome(&mut self.active) => {
                    self.finish(outcome).await;
                }
            }
        }

        if let Some(mut active) = self.active.take() {
            active.cancel.cancel();
            match active.outcome.await {
                Ok(outcome) => info!("[DISPATCH] command {} at shutdown", outcome),
                Err(_) => warn!("[DISPATCH] runner vanished during shutdown"),
            }
        }
    }

    async fn handle_event(&mut self, event: ButtonEvent) {
        let transition = self.fsm.on_event(event);

        match transition.action {
            TransitionAction::Launch => {
                info!("[DISPATCH] STARTing {}", self.spec);
                self.show(transition.pattern).await;
                self.launch().await;
            }
            TransitionAction::Cancel => {
                info!("[DISPATCH] STOPping {}", self.spec);
                if let Some(active) = self.active.as_mut() {
                    active.cancel.cancel();
                }
            }
            TransitionAction::Ignore { reason } => {
                info!("[DISPATCH] received {}, but {}", event, reason);
            }
            TransitionAction::Finish => {}
        }
    }

    async fn launch(&mut self) {
        let (cancel, signal) = cancel_pair();
        let mut outcome = run_command(&self.launcher, &self.spec, signal);

        // start failures are already in the channel
        match outcome.try_recv() {
            Ok(immediate) => self.finish(immediate).await,
            Err(oneshot::error::TryRecvError::Empty) => {
                self.active = Some(ActiveInvocation { cancel, outcome });
            }
            Err(oneshot::error::TryRecvError::Closed) => {
                self.finish(CommandOutcome::Failure("runner dropped the outcome".into()))
                    .await;
            }
        }
    }

    async fn finish(&mut self, outcome: CommandOutcome) {
        self.active = None;
        let transition = self.fsm.on_outcome(&outcome);
        if let TransitionAction::Ignore { reason } = transition.action {
            warn!("[DISPATCH] outcome {} dropped: {}", outcome, reason);
            return;
        }

        match &outcome {
            CommandOutcome::Success => info!("[DISPATCH] command successfully finished"),
            CommandOutcome::Cancelled => info!("[DISPATCH] command stopped"),
            CommandOutcome::Failure(cause) => {
                error!("[DISPATCH] ERROR running {}: {}", self.spec, cause)
            }
        }
        self.show(transition.pattern).await;
    }

    async fn show(&self, pattern: Option<BlinkPattern>) {
        if let Some(pattern) = pattern {
            if let Err(e) = self.led.set(pattern).await {
                warn!("[DISPATCH] cannot update LED: {}", e);
            }
        }
    }
}

/// Outcome of the active invocation; pending while idle
async fn next_outcome(active: &mut Option<ActiveInvocation>) -> CommandOutcome {
    match active {
        Some(active) => (&mut active.outcome)
            .await
            .unwrap_or_else(|_| CommandOutcome::Failure("runner dropped the outcome".into())),
        None => future::pending().await,
    }
}
