use anyhow::Result;
use clap::Parser;
use exec_on_button::button::spawn_button_watcher;
use exec_on_button::config::Cli;
use exec_on_button::control;
use exec_on_button::dispatcher::Dispatcher;
use exec_on_button::gpio::open_pins;
use exec_on_button::led::spawn_blinker;
use exec_on_button::runner::SystemLauncher;
use exec_on_button::{init_tracing, shutdown_signal};

use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Cli::parse().into_config()?;
    init_tracing(config.verbose);

    info!("exec-on-button starting: {}", config.command);
    info!("  button: BCM {}, LED: BCM {}", config.button_pin, config.led_pin);

    // Without the pins there is nothing to do
    let (button, led) = open_pins(config.button_pin, config.led_pin)?;

    let (blink, blinker_task) = spawn_blinker(led, config.patterns.idle);
    let (dispatcher, events) = Dispatcher::new(
        SystemLauncher,
        config.command.clone(),
        config.patterns,
        blink,
    );

    let _button_task = spawn_button_watcher(button, events.clone());

    match config.http_addr.clone() {
        Some(addr) => {
            let events = events.clone();
            tokio::spawn(async move {
                if let Err(e) = control::serve(&addr, events).await {
                    error!("[HTTP] {:#}", e);
                }
            });
        }
        None => info!("Started."),
    }
    drop(events);

    // Main event loop; returns after the running command is reaped
    dispatcher.run_until(shutdown_signal()).await;

    // The dispatcher dropped the last LED handle; wait for the LED to go dark
    if let Err(e) = blinker_task.await {
        error!("[LED] task failed: {}", e);
    }

    info!("exec-on-button stopped");
    Ok(())
}
