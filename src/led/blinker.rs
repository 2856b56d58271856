//! Blink cycle task

use crate::gpio::DigitalOutput;
use anyhow::{anyhow, Result};
use pushbutton_shared::{BlinkPattern, Level};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

const PATTERN_QUEUE: usize = 8;

/// Sends new patterns to the blink task; dropping every handle stops it
#[derive(Debug, Clone)]
pub struct BlinkHandle {
    tx: mpsc::Sender<BlinkPattern>,
}

impl BlinkHandle {
    /// Create a handle and the receiver a [`BlinkController`] consumes
    pub fn channel() -> (Self, mpsc::Receiver<BlinkPattern>) {
        let (tx, rx) = mpsc::channel(PATTERN_QUEUE);
        (Self { tx }, rx)
    }

    /// Replace the displayed pattern
    pub async fn set(&self, pattern: BlinkPattern) -> Result<()> {
        self.tx
            .send(pattern)
            .await
            .map_err(|_| anyhow!("LED task stopped"))
    }
}

/// Toggles an output according to the latest pattern
pub struct BlinkController<O> {
    output: O,
    pattern: BlinkPattern,
    patterns: mpsc::Receiver<BlinkPattern>,
}

impl<O: DigitalOutput> BlinkController<O> {
    pub fn new(output: O, initial: BlinkPattern, patterns: mpsc::Receiver<BlinkPattern>) -> Self {
        Self {
            output,
            pattern: initial,
            patterns,
        }
    }

    fn phase_length(&self, level: Level) -> Duration {
        self.pattern.phase(level).resolve()
    }

    /// Run until every [`BlinkHandle`] is dropped, then leave the output low.
    ///
    /// A zero on-phase holds the output high until the next pattern. A new
    /// pattern recomputes the running phase from its start, so it shows at
    /// the next transition.
    pub async fn run(mut self) {
        let mut level = Level::Low;
        self.output.write(level);

        let mut phase_start = Instant::now();
        let mut phase_len = self.phase_length(level);

        loop {
            let hold = level.is_high() && phase_len.is_zero();

            tokio::select! {
                msg = self.patterns.recv() => match msg {
                    Some(pattern) => {
                        if pattern != self.pattern {
                            debug!("[LED] pattern {}", pattern);
                        }
                        self.pattern = pattern;
                        phase_len = self.phase_length(level);
                    }
                    None => break,
                },

                _ = sleep_until(phase_start + phase_len), if !hold => {
                    level = level.toggled();
                    self.output.write(level);
                    phase_start = Instant::now();
                    phase_len = self.phase_length(level);
                }
            }
        }

        self.output.write(Level::Low);
        info!("[LED] stopped, output low");
    }
}

/// Start the blink task showing `initial`
pub fn spawn_blinker<O: DigitalOutput>(output: O, initial: BlinkPattern) -> (BlinkHandle, JoinHandle<()>) {
    let (handle, patterns) = BlinkHandle::channel();
    let task = tokio::spawn(BlinkController::new(output, initial, patterns).run());
    (handle, task)
}
