//! Command-line configuration

use clap::Parser;
use pushbutton_shared::{BlinkPattern, CommandSpec, CommandSpecError, PatternSet};

/// Default BCM pin of the push-button
pub const DEFAULT_BUTTON_PIN: u8 = 25;

/// Default BCM pin of the indicator LED
pub const DEFAULT_LED_PIN: u8 = 24;

/// Default listen address of the HTTP triggers
pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:1234";

/// Execute the given program on button push.
///
/// A light push (0.5s to 2s) starts the program, a push longer than 5s
/// kills it. The LED flashes rarely when idle, blinks steadily while the
/// program runs and flickers irregularly after it failed.
#[derive(Parser, Debug)]
#[command(name = "exec-on-button", version)]
pub struct Cli {
    /// Button input pin (BCM numbering)
    #[arg(long, default_value_t = DEFAULT_BUTTON_PIN)]
    pub button: u8,

    /// LED output pin (BCM numbering)
    #[arg(long, default_value_t = DEFAULT_LED_PIN)]
    pub led: u8,

    /// HTTP listen address for /start and /stop; empty disables it
    #[arg(long, default_value = DEFAULT_HTTP_ADDR)]
    pub http: String,

    /// Idle pattern as ON,OFF milliseconds (negative = randomized)
    #[arg(long, value_name = "ON,OFF", allow_hyphen_values = true)]
    pub idle_pattern: Option<BlinkPattern>,

    /// Pattern while the command runs
    #[arg(long, value_name = "ON,OFF", allow_hyphen_values = true)]
    pub busy_pattern: Option<BlinkPattern>,

    /// Pattern after the command failed
    #[arg(long, value_name = "ON,OFF", allow_hyphen_values = true)]
    pub error_pattern: Option<BlinkPattern>,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Program to run and its arguments
    #[arg(
        value_name = "COMMAND",
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<String>,
}

/// Settings fixed for the lifetime of the daemon
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub button_pin: u8,
    pub led_pin: u8,
    /// `None` disables the HTTP triggers
    pub http_addr: Option<String>,
    pub patterns: PatternSet,
    pub command: CommandSpec,
    pub verbose: bool,
}

impl Cli {
    pub fn into_config(self) -> Result<DaemonConfig, CommandSpecError> {
        let defaults = PatternSet::default();
        let patterns = PatternSet {
            idle: self.idle_pattern.unwrap_or(defaults.idle),
            in_progress: self.busy_pattern.unwrap_or(defaults.in_progress),
            error: self.error_pattern.unwrap_or(defaults.error),
        };

        let http_addr = Some(self.http.trim().to_string()).filter(|addr| !addr.is_empty());

        Ok(DaemonConfig {
            button_pin: self.button,
            led_pin: self.led,
            http_addr,
            patterns,
            command: CommandSpec::from_argv(self.command)?,
            verbose: self.verbose,
        })
    }
}
