//! Scripted launcher for tests

use super::process::{ChildProcess, ProcessLauncher};
use async_trait::async_trait;
use pushbutton_shared::CommandSpec;
use std::io;
use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

#[derive(Default)]
struct FakeState {
    started: usize,
    live: usize,
    max_live: usize,
    killed: usize,
    fail_start: bool,
    exits: Vec<oneshot::Sender<ExitStatus>>,
}

/// Launcher whose children run until the test makes them exit
#[derive(Clone, Default)]
pub struct FakeLauncher {
    state: Arc<Mutex<FakeState>>,
}

impl FakeLauncher {
    /// Make every following start fail with NotFound
    pub fn fail_starts(&self) {
        self.state.lock().unwrap().fail_start = true;
    }

    /// Let the most recently started child exit with `code`
    pub fn exit_last(&self, code: i32) {
        if let Some(tx) = self.state.lock().unwrap().exits.pop() {
            let _ = tx.send(ExitStatus::from_raw(code << 8));
        }
    }

    pub fn started(&self) -> usize {
        self.state.lock().unwrap().started
    }

    pub fn live(&self) -> usize {
        self.state.lock().unwrap().live
    }

    pub fn max_live(&self) -> usize {
        self.state.lock().unwrap().max_live
    }

    pub fn killed(&self) -> usize {
        self.state.lock().unwrap().killed
    }
}

impl ProcessLauncher for FakeLauncher {
    type Child = FakeChild;

    fn start(&self, _spec: &CommandSpec) -> io::Result<FakeChild> {
        let mut state = self.state.lock().unwrap();
        if state.fail_start {
            return Err(io::Error::new(io::ErrorKind::NotFound, "no such file"));
        }

        let (tx, rx) = oneshot::channel();
        state.exits.push(tx);
        state.started += 1;
        state.live += 1;
        state.max_live = state.max_live.max(state.live);

        Ok(FakeChild {
            exit: rx,
            state: self.state.clone(),
            done: false,
        })
    }
}

pub struct FakeChild {
    exit: oneshot::Receiver<ExitStatus>,
    state: Arc<Mutex<FakeState>>,
    done: bool,
}

impl FakeChild {
    fn reap(&mut self) {
        if !self.done {
            self.done = true;
            self.state.lock().unwrap().live -= 1;
        }
    }
}

#[async_trait]
impl ChildProcess for FakeChild {
    async fn wait(&mut self) -> io::Result<ExitStatus> {
        match (&mut self.exit).await {
            Ok(status) => {
                self.reap();
                Ok(status)
            }
            Err(_) => std::future::pending().await,
        }
    }

    async fn kill(&mut self) -> io::Result<()> {
        self.state.lock().unwrap().killed += 1;
        self.reap();
        Ok(())
    }
}
