//! Polling streams over the button input
//!
//! Streams must be created from within a Tokio runtime; they own the
//! input pin and sample it on a fixed interval.

use crate::gpio::DigitalInput;
use futures::stream::{self, Stream, StreamExt};
use pushbutton_shared::{classify_press, press, ButtonEvent, EdgeTracker, Level};
use std::future;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info};

fn poll_ticker(poll: Duration) -> Interval {
    let mut ticker = interval(poll);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

/// Current level of the input, then every change of it
pub fn level_changes<I: DigitalInput>(mut input: I, poll: Duration) -> impl Stream<Item = Level> + Send {
    let first = input.read();
    let ticker = poll_ticker(poll);

    stream::once(future::ready(first)).chain(stream::unfold(
        (input, ticker, first),
        |(mut input, mut ticker, mut last)| async move {
            loop {
                ticker.tick().await;
                let level = input.read();
                if level != last {
                    last = level;
                    return Some((level, (input, ticker, last)));
                }
            }
        },
    ))
}

/// Hold duration of every completed press (High then Low)
pub fn press_durations<I: DigitalInput>(mut input: I, poll: Duration) -> impl Stream<Item = Duration> + Send {
    let tracker = EdgeTracker::new(input.read(), Instant::now().into_std());
    let ticker = poll_ticker(poll);

    stream::unfold(
        (input, ticker, tracker),
        |(mut input, mut ticker, mut tracker)| async move {
            loop {
                let now = ticker.tick().await;
                let level = input.read();
                let was_down = tracker.is_down();
                if let Some(held) = tracker.sample(level, now.into_std()) {
                    return Some((held, (input, ticker, tracker)));
                }
                if tracker.is_down() != was_down {
                    debug!("[BUTTON] pressed");
                }
            }
        },
    )
}

/// Classified Start/Stop events; noise and dead-zone presses are dropped
pub fn press_events<I: DigitalInput>(input: I, poll: Duration) -> impl Stream<Item = ButtonEvent> + Send {
    press_durations(input, poll).filter_map(|held| {
        let event = classify_press(held);
        match event {
            Some(event) => debug!("[BUTTON] released after {:?}: {}", held, event),
            None => debug!("[BUTTON] released after {:?}: ignored", held),
        }
        future::ready(event)
    })
}

/// Forward button events into the dispatcher intake until it closes
pub fn spawn_button_watcher<I: DigitalInput>(
    input: I,
    events_tx: mpsc::Sender<ButtonEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let events = press_events(input, press::POLL_INTERVAL);
        tokio::pin!(events);

        while let Some(event) = events.next().await {
            if events_tx.send(event).await.is_err() {
                break;
            }
        }

        info!("[BUTTON] watcher stopped");
    })
}
