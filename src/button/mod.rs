//! Button press watcher
//!
//! Polls the button input and turns completed presses into logical
//! Start/Stop events for the dispatcher.

mod watcher;

pub use watcher::{level_changes, press_durations, press_events, spawn_button_watcher};
