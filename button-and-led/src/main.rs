//! Light (blink frequently) while the button is pressed.

use anyhow::Result;
use clap::Parser;
use exec_on_button::button::level_changes;
use exec_on_button::config::{DEFAULT_BUTTON_PIN, DEFAULT_LED_PIN};
use exec_on_button::gpio::open_pins;
use exec_on_button::led::spawn_blinker;
use exec_on_button::{init_tracing, shutdown_signal};
use futures::StreamExt;
use pushbutton_shared::{press, BlinkPattern, Level};
use tracing::{debug, error, info};

const RELEASED: BlinkPattern = BlinkPattern::from_millis(1000, 1000);
const PRESSED: BlinkPattern = BlinkPattern::from_millis(333, 333);
const SOLID: BlinkPattern = BlinkPattern::from_millis(0, 0);

#[derive(Parser, Debug)]
#[command(name = "button-and-led", version)]
struct Args {
    /// Button input pin (BCM numbering)
    #[arg(long, default_value_t = DEFAULT_BUTTON_PIN)]
    button: u8,

    /// LED output pin (BCM numbering)
    #[arg(long, default_value_t = DEFAULT_LED_PIN)]
    led: u8,

    /// Keep the LED lit instead of blinking while pressed
    #[arg(long)]
    solid: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn pattern_for(level: Level, solid: bool) -> BlinkPattern {
    match level {
        Level::High if solid => SOLID,
        Level::High => PRESSED,
        Level::Low => RELEASED,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let (button, led) = open_pins(args.button, args.led)?;
    let (blink, blinker_task) = spawn_blinker(led, RELEASED);

    let levels = level_changes(button, press::POLL_INTERVAL);
    tokio::pin!(levels);
    let follow = async {
        while let Some(level) = levels.next().await {
            debug!("[BUTTON] {:?}", level);
            if blink.set(pattern_for(level, args.solid)).await.is_err() {
                break;
            }
        }
    };

    info!("button-and-led running");
    tokio::select! {
        _ = follow => {}
        _ = shutdown_signal() => {}
    }

    drop(blink);
    if let Err(e) = blinker_task.await {
        error!("[LED] task failed: {}", e);
    }
    Ok(())
}
