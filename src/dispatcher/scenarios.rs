//! Button-to-LED scenarios with in-memory pins and a scripted launcher

use super::Dispatcher;
use crate::button::spawn_button_watcher;
use crate::control;
use crate::gpio::testing::{RecordingOutput, SharedInput};
use crate::led::spawn_blinker;
use crate::runner::testing::FakeLauncher;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use pushbutton_shared::{ButtonEvent, CommandSpec, Level, PatternSet};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};
use tower::ServiceExt;

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

struct Rig {
    input: SharedInput,
    output: RecordingOutput,
    launcher: FakeLauncher,
    events: mpsc::Sender<ButtonEvent>,
    shutdown: Option<oneshot::Sender<()>>,
    dispatcher: JoinHandle<()>,
    blinker: JoinHandle<()>,
}

impl Rig {
    fn new() -> Self {
        let input = SharedInput::new(Level::Low);
        let output = RecordingOutput::default();
        let launcher = FakeLauncher::default();
        let patterns = PatternSet::default();

        let (blink, blinker) = spawn_blinker(output.clone(), patterns.idle);
        let spec = CommandSpec::from_argv(["/usr/local/bin/job"]).unwrap();
        let (dispatcher, events) = Dispatcher::new(launcher.clone(), spec, patterns, blink);
        spawn_button_watcher(input.clone(), events.clone());

        let (shutdown, stop) = oneshot::channel::<()>();
        let dispatcher = tokio::spawn(dispatcher.run_until(async {
            let _ = stop.await;
        }));

        Self {
            input,
            output,
            launcher,
            events,
            shutdown: Some(shutdown),
            dispatcher,
            blinker,
        }
    }

    /// Hold the button for `held`, between two poll instants, and let the
    /// release be noticed
    async fn press(&self, held: Duration) {
        sleep(ms(50)).await;
        self.input.set(Level::High);
        sleep(held).await;
        self.input.set(Level::Low);
        sleep(ms(250)).await;
    }

    /// Hit an HTTP trigger wired to the same intake as the button
    async fn trigger(&self, path: &str) -> StatusCode {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        let response = control::router(self.events.clone())
            .oneshot(request)
            .await
            .unwrap();
        sleep(ms(10)).await;
        response.status()
    }

    /// Gaps between LED toggles written in `[from, to]`
    fn gaps_between(&self, from: Instant, to: Instant) -> Vec<Duration> {
        let times: Vec<Instant> = self
            .output
            .writes()
            .into_iter()
            .map(|(at, _)| at)
            .filter(|at| *at >= from && *at <= to)
            .collect();
        times.windows(2).map(|w| w[1] - w[0]).collect()
    }

    async fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        (&mut self.dispatcher).await.unwrap();
        (&mut self.blinker).await.unwrap();
    }
}

#[tokio::test(start_paused = true)]
async fn test_short_press_starts_command() {
    let rig = Rig::new();
    rig.press(ms(1000)).await;

    assert_eq!(rig.launcher.started(), 1);
    assert_eq!(rig.launcher.live(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_long_press_cancels_and_idles() {
    let rig = Rig::new();
    rig.press(ms(1000)).await;
    assert_eq!(rig.launcher.live(), 1);

    rig.press(ms(6000)).await;
    assert_eq!(rig.launcher.killed(), 1);
    assert_eq!(rig.launcher.live(), 0);

    let from = Instant::now();
    sleep(ms(6000)).await;
    let gaps = rig.gaps_between(from, Instant::now());
    assert!(gaps.contains(&ms(2000)), "not idle: {:?}", gaps);
    assert!(gaps.contains(&ms(100)), "not idle: {:?}", gaps);
}

#[tokio::test(start_paused = true)]
async fn test_second_start_is_ignored() {
    let rig = Rig::new();
    rig.press(ms(1500)).await;
    rig.press(ms(1500)).await;

    assert_eq!(rig.launcher.started(), 1);
    assert_eq!(rig.launcher.max_live(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_ambiguous_press_changes_nothing() {
    let rig = Rig::new();
    rig.press(ms(3000)).await;
    rig.press(ms(200)).await;

    assert_eq!(rig.launcher.started(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_failure_blinks_error_then_restarts() {
    let rig = Rig::new();
    rig.press(ms(1000)).await;
    assert_eq!(rig.launcher.started(), 1);

    rig.launcher.exit_last(1);
    let failed_at = Instant::now();
    sleep(ms(3000)).await;

    let gaps = rig.gaps_between(failed_at + ms(500), Instant::now());
    assert!(gaps.len() > 5);
    for gap in &gaps {
        assert!(*gap >= ms(150) && *gap <= ms(300), "not the error pattern: {:?}", gaps);
    }

    rig.press(ms(1000)).await;
    assert_eq!(rig.launcher.started(), 2);
    assert_eq!(rig.launcher.live(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_kills_command_and_darkens_led() {
    let mut rig = Rig::new();
    rig.press(ms(1000)).await;
    assert_eq!(rig.launcher.live(), 1);

    // somewhere inside the in-progress blink
    sleep(ms(333)).await;
    rig.shutdown().await;

    assert_eq!(rig.launcher.killed(), 1);
    assert_eq!(rig.launcher.live(), 0);
    assert_eq!(rig.output.last(), Some(Level::Low));
}

#[tokio::test(start_paused = true)]
async fn test_http_and_button_share_one_intake() {
    let rig = Rig::new();
    assert_eq!(rig.trigger("/start").await, StatusCode::ACCEPTED);
    assert_eq!(rig.launcher.started(), 1);

    // the button sees the run started over HTTP
    rig.press(ms(1000)).await;
    assert_eq!(rig.launcher.started(), 1);
    assert_eq!(rig.launcher.max_live(), 1);

    rig.press(ms(6000)).await;
    assert_eq!(rig.launcher.killed(), 1);
    assert_eq!(rig.trigger("/stop").await, StatusCode::ACCEPTED);
    assert_eq!(rig.launcher.killed(), 1);

    rig.press(ms(1000)).await;
    assert_eq!(rig.trigger("/start").await, StatusCode::ACCEPTED);
    assert_eq!(rig.launcher.started(), 2);
    assert_eq!(rig.launcher.live(), 1);
}
