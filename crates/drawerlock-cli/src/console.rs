//! Terminal-backed output peripherals for the simulator.

use std::thread;
use std::time::Duration;

use drawerlock_core::TimeOfDay;
use drawerlock_hardware::{Display, LockActuator, LogSink, Result, ToneOutput};
use tracing::info;

/// Buzzer that prints each pulse and blocks for its duration.
#[derive(Debug, Default)]
pub struct ConsoleTone;

impl ToneOutput for ConsoleTone {
    fn emit(&mut self, duration_ms: u64) -> Result<()> {
        println!("[tone] {duration_ms} ms");
        thread::sleep(Duration::from_millis(duration_ms));
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct ConsoleLock;

impl LockActuator for ConsoleLock {
    fn set_position(&mut self, locked: bool) -> Result<()> {
        println!("[lock] {}", if locked { "LOCKED" } else { "RELEASED" });
        Ok(())
    }
}

/// Character display printed as a framed box whenever its text changes.
#[derive(Debug, Default)]
pub struct ConsoleDisplay {
    shown: Option<[String; 2]>,
}

impl Display for ConsoleDisplay {
    fn render(&mut self, lines: &[String; 2]) -> Result<()> {
        if self.shown.as_ref() == Some(lines) {
            return Ok(());
        }
        println!("{}", frame(lines));
        self.shown = Some(lines.clone());
        Ok(())
    }
}

/// Draw display lines inside an ASCII border.
pub fn frame(lines: &[String; 2]) -> String {
    let width = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0);
    let border = format!("+{}+", "-".repeat(width));
    format!("{border}\n|{}|\n|{}|\n{border}", lines[0], lines[1])
}

/// Audit sink forwarding every record to `tracing`.
#[derive(Debug, Default)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn record(&mut self, event: &str, timestamp: Option<TimeOfDay>) {
        match timestamp {
            Some(time) => info!(target: "drawerlock::audit", %time, "{event}"),
            None => info!(target: "drawerlock::audit", "{event}"),
        }
    }
}
