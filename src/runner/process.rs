//! Process execution trait abstraction

use async_trait::async_trait;
use pushbutton_shared::CommandSpec;
use std::io;
use std::process::{ExitStatus, Stdio};
use tokio::process::{Child, Command};

/// A started child process
#[async_trait]
pub trait ChildProcess: Send + 'static {
    /// Wait for the process to exit
    async fn wait(&mut self) -> io::Result<ExitStatus>;

    /// Forcibly terminate the process and reap it
    async fn kill(&mut self) -> io::Result<()>;
}

/// Factory for child processes
pub trait ProcessLauncher: Send + Sync + 'static {
    /// The child type this launcher produces
    type Child: ChildProcess;

    /// Start `spec`; errors mean nothing was started
    fn start(&self, spec: &CommandSpec) -> io::Result<Self::Child>;
}

/// Launches real OS processes sharing the daemon's stdout and stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl ProcessLauncher for SystemLauncher {
    type Child = Child;

    fn start(&self, spec: &CommandSpec) -> io::Result<Child> {
        Command::new(spec.program())
            .args(spec.args())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
    }
}

#[async_trait]
impl ChildProcess for Child {
    async fn wait(&mut self) -> io::Result<ExitStatus> {
        Child::wait(self).await
    }

    async fn kill(&mut self) -> io::Result<()> {
        Child::kill(self).await
    }
}
