//! Drawer access controller simulator.
//!
//! Runs the real controller against mock inputs driven from stdin, with the
//! display, buzzer and lock printed to the terminal and audit records sent
//! to `tracing`.
//!
//! Usage:
//!   drawerlock [--config drawerlock.json] [--secret UUDDLR] [--no-rtc]
//!
//! Commands, one per line: `m` motion, `u`/`d`/`l`/`r` stick deflection,
//! `c` confirm, `s` status, `q` quit.

mod console;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use drawerlock_controller::{AccessController, ControllerConfig};
use drawerlock_core::constants::{AXIS_CENTER, AXIS_MAX};
use drawerlock_core::{Direction, SecretCode, SystemState};
use drawerlock_hardware::mock::{
    MockDirectionalInput, MockDirectionalInputHandle, MockMotionSensor, MockMotionSensorHandle,
};
use drawerlock_hardware::{Board, LocalCalendar, SystemClock};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::console::{ConsoleDisplay, ConsoleLock, ConsoleTone, TracingLogSink};

#[derive(Parser, Debug)]
#[command(
    name = "drawerlock",
    version,
    about = "Simulate the drawer access controller from the terminal"
)]
struct Args {
    /// JSON configuration file; missing fields take their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Secret gesture code (six of U, D, L, R), overrides the file
    #[arg(short, long)]
    secret: Option<String>,

    /// Simulate a board without a real-time clock
    #[arg(long)]
    no_rtc: bool,

    /// Tracing filter, e.g. `debug` or `drawerlock_controller=trace`
    #[arg(long)]
    log_level: Option<String>,

    /// Polling interval in milliseconds
    #[arg(long, default_value_t = 10)]
    tick_ms: u64,
}

/// A line typed on stdin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Motion,
    Gesture(Direction),
    Confirm,
    Status,
    Quit,
}

impl Command {
    fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "m" => Some(Command::Motion),
            "c" => Some(Command::Confirm),
            "s" => Some(Command::Status),
            "q" => Some(Command::Quit),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(symbol), None) => Direction::from_symbol(symbol).ok().map(Command::Gesture),
                    _ => None,
                }
            }
        }
    }
}

/// Handles for the simulated inputs.
struct Inputs {
    motion: MockMotionSensorHandle,
    stick: MockDirectionalInputHandle,
    motion_pending: bool,
}

impl Inputs {
    /// Apply a command. Returns `false` when the simulator should stop.
    fn apply(&mut self, command: Command, controller: &AccessController) -> Result<bool> {
        match command {
            Command::Motion => {
                self.motion.set_present(true);
                self.motion_pending = true;
            }
            Command::Gesture(direction) => {
                if controller.state() != SystemState::CollectingCode {
                    println!("stick ignored in state {}", controller.state());
                    return Ok(true);
                }
                let axes = match direction {
                    Direction::Up => (AXIS_CENTER, 0),
                    Direction::Down => (AXIS_CENTER, AXIS_MAX),
                    Direction::Left => (0, AXIS_CENTER),
                    Direction::Right => (AXIS_MAX, AXIS_CENTER),
                };
                self.stick.queue_axes([axes]);
            }
            Command::Confirm => {
                if controller.state() != SystemState::CollectingCode {
                    println!("confirm ignored in state {}", controller.state());
                    return Ok(true);
                }
                // Low for the edge read and the settle re-read, then released.
                self.stick.queue_confirm_levels([false, false, true]);
            }
            Command::Status => {
                let status = serde_json::json!({
                    "state": controller.state(),
                    "failed_attempts": controller.failed_attempts(),
                    "entered": controller.code_buffer().masked(),
                    "stats": controller.stats(),
                });
                println!("{}", serde_json::to_string_pretty(&status)?);
            }
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }

    /// Drop the motion pulse once the controller has sampled it.
    fn after_poll(&mut self) {
        if self.motion_pending {
            self.motion.set_present(false);
            self.motion_pending = false;
        }
    }
}

fn load_config(args: &Args) -> Result<ControllerConfig> {
    let mut config = match &args.config {
        Some(path) => ControllerConfig::from_json_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => ControllerConfig::default(),
    };

    if let Some(secret) = &args.secret {
        config.secret = SecretCode::parse(secret).context("invalid --secret")?;
    }
    config.validate()?;
    Ok(config)
}

fn init_tracing(log_level: Option<&str>) {
    let filter = match log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_level.as_deref());

    let config = load_config(&args)?;

    let (motion, motion_handle) = MockMotionSensor::new();
    let (stick, stick_handle) = MockDirectionalInput::new();
    let mut builder = Board::builder()
        .clock(SystemClock::new())
        .motion(motion)
        .input(stick)
        .tone(ConsoleTone)
        .lock(ConsoleLock)
        .display(ConsoleDisplay::default())
        .log(TracingLogSink);
    if !args.no_rtc {
        builder = builder.calendar(LocalCalendar);
    }
    let board = builder.build()?;

    let mut controller = AccessController::new(config, board);
    let mut inputs = Inputs {
        motion: motion_handle,
        stick: stick_handle,
        motion_pending: false,
    };

    info!(tick_ms = args.tick_ms, "simulator running, commands: m u d l r c s q");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(Duration::from_millis(args.tick_ms.max(1)));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Some(transition) = controller.poll() {
                    debug!(from = %transition.from, to = %transition.to, "transition");
                }
                inputs.after_poll();
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("stdin closed");
                    break;
                };
                match Command::parse(&line) {
                    Some(command) => {
                        if !inputs.apply(command, &controller)? {
                            break;
                        }
                    }
                    None if line.trim().is_empty() => {}
                    None => println!("unknown command: {}", line.trim()),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
        }
    }

    let stats = serde_json::to_string(controller.stats())?;
    info!(%stats, "simulator stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("m", Some(Command::Motion))]
    #[case(" C ", Some(Command::Confirm))]
    #[case("u", Some(Command::Gesture(Direction::Up)))]
    #[case("R", Some(Command::Gesture(Direction::Right)))]
    #[case("s", Some(Command::Status))]
    #[case("q", Some(Command::Quit))]
    #[case("x", None)]
    #[case("ud", None)]
    #[case("", None)]
    fn test_command_parse(#[case] line: &str, #[case] expected: Option<Command>) {
        assert_eq!(Command::parse(line), expected);
    }

    #[test]
    fn test_secret_flag_overrides_default() {
        let args = Args::parse_from(["drawerlock", "--secret", "lrlrud"]);
        let config = load_config(&args).unwrap();
        assert_eq!(config.secret, SecretCode::parse("LRLRUD").unwrap());
    }

    #[test]
    fn test_invalid_secret_flag_is_rejected() {
        let args = Args::parse_from(["drawerlock", "--secret", "UUDD"]);
        assert!(load_config(&args).is_err());
    }
}
