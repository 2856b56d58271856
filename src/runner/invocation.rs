//! One cancellable command invocation

use super::process::{ChildProcess, ProcessLauncher};
use pushbutton_shared::{CommandOutcome, CommandSpec};
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{debug, info, warn};

/// Owner side of a cancellation; dropping it cancels as well
#[derive(Debug)]
pub struct CancelHandle {
    tx: Option<oneshot::Sender<()>>,
}

impl CancelHandle {
    /// Request cancellation. Later calls are no-ops.
    pub fn cancel(&mut self) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Runner side of a cancellation
#[derive(Debug)]
pub struct CancelSignal {
    rx: oneshot::Receiver<()>,
    fired: bool,
}

impl CancelSignal {
    /// Whether cancellation has already been requested
    pub fn is_cancelled(&mut self) -> bool {
        if !self.fired {
            self.fired = !matches!(self.rx.try_recv(), Err(TryRecvError::Empty));
        }
        self.fired
    }

    /// Resolves once cancellation is requested
    pub async fn cancelled(&mut self) {
        if !self.fired {
            let _ = (&mut self.rx).await;
            self.fired = true;
        }
    }
}

/// Create a connected cancellation handle and signal
pub fn cancel_pair() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = oneshot::channel();
    (
        CancelHandle { tx: Some(tx) },
        CancelSignal { rx, fired: false },
    )
}

/// Run `spec` until it exits or `cancel` fires.
///
/// Cancellation checks and the start itself happen before this returns, so
/// a cancelled or failed start is already readable from the returned
/// receiver. Otherwise a wait task reports the outcome once the child has
/// terminated.
pub fn run_command<L: ProcessLauncher>(
    launcher: &L,
    spec: &CommandSpec,
    mut cancel: CancelSignal,
) -> oneshot::Receiver<CommandOutcome> {
    let (outcome_tx, outcome_rx) = oneshot::channel();

    if cancel.is_cancelled() {
        debug!("[RUNNER] cancelled before start: {}", spec);
        let _ = outcome_tx.send(CommandOutcome::Cancelled);
        return outcome_rx;
    }

    let mut child = match launcher.start(spec) {
        Ok(child) => child,
        Err(e) => {
            let _ = outcome_tx.send(CommandOutcome::Failure(format!(
                "failed to start {}: {}",
                spec.program(),
                e
            )));
            return outcome_rx;
        }
    };
    info!("[RUNNER] started {}", spec);

    tokio::spawn(async move {
        let outcome = tokio::select! {
            status = child.wait() => match status {
                Ok(status) if status.success() => CommandOutcome::Success,
                Ok(status) => CommandOutcome::Failure(status.to_string()),
                Err(e) => CommandOutcome::Failure(format!("wait failed: {}", e)),
            },
            _ = cancel.cancelled() => {
                if let Err(e) = child.kill().await {
                    warn!("[RUNNER] kill failed: {}", e);
                }
                CommandOutcome::Cancelled
            }
        };

        debug!("[RUNNER] finished: {}", outcome);
        let _ = outcome_tx.send(outcome);
    });

    outcome_rx
}
