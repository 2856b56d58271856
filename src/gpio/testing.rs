//! In-memory pins for tests

use super::traits::{DigitalInput, DigitalOutput};
use pushbutton_shared::Level;
use std::sync::{Arc, Mutex};
use tokio::time::Instant;

/// Input whose level is set from the test body
#[derive(Clone, Default)]
pub struct SharedInput {
    level: Arc<Mutex<Level>>,
}

impl SharedInput {
    pub fn new(level: Level) -> Self {
        Self {
            level: Arc::new(Mutex::new(level)),
        }
    }

    pub fn set(&self, level: Level) {
        *self.level.lock().unwrap() = level;
    }
}

impl DigitalInput for SharedInput {
    fn read(&mut self) -> Level {
        *self.level.lock().unwrap()
    }
}

/// Output that records every write with its timestamp
#[derive(Clone, Default)]
pub struct RecordingOutput {
    writes: Arc<Mutex<Vec<(Instant, Level)>>>,
}

impl RecordingOutput {
    pub fn writes(&self) -> Vec<(Instant, Level)> {
        self.writes.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<Level> {
        self.writes.lock().unwrap().last().map(|(_, level)| *level)
    }
}

impl DigitalOutput for RecordingOutput {
    fn write(&mut self, level: Level) {
        self.writes.lock().unwrap().push((Instant::now(), level));
    }
}
