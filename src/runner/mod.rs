//! Command runner
//!
//! This module handles:
//! - Starting the configured command with inherited stdio
//! - Waiting for it to exit or force-killing it on cancellation
//! - Reporting exactly one outcome per invocation

mod invocation;
mod process;

#[cfg(test)]
pub(crate) mod testing;

pub use invocation::{cancel_pair, run_command, CancelHandle, CancelSignal};
pub use process::{ChildProcess, ProcessLauncher, SystemLauncher};
