use std::time::Duration;

use k8056_serial::SerialLine;
use tracing::{debug, info, warn};

use crate::codec::Frame;
use crate::command::Command;
use crate::error::Result;
use crate::instruction::instruction_name;

/// Times each frame is written.
pub const DEFAULT_ATTEMPTS: usize = 6;

/// Pause after each write.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(5);

/// Redundant transmission settings.
#[derive(Debug, Clone)]
pub struct TransmitConfig {
    /// How many times each frame is written. Default: 6.
    pub attempts: usize,
    /// Pause after every write. Default: 5 ms.
    pub interval: Duration,
}

impl Default for TransmitConfig {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_ATTEMPTS,
            interval: DEFAULT_INTERVAL,
        }
    }
}

/// What happened while sending one frame.
///
/// The card never acknowledges, so this is informational only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransmitReport {
    /// The frame that was sent.
    pub frame: Frame,
    /// Writes attempted.
    pub attempts: usize,
    /// Writes the OS reported as failed or short.
    pub failed_writes: usize,
    /// Whether discarding stale output beforehand failed.
    pub discard_failed: bool,
}

impl TransmitReport {
    /// True if every write went through.
    pub fn is_clean(&self) -> bool {
        self.failed_writes == 0 && !self.discard_failed
    }
}

/// Writes frames onto a serial line, repeating each one.
///
/// Before a frame goes out, anything still queued in the driver is dropped
/// so a half-written earlier frame cannot run into the new one. The frame is
/// then written `attempts` times with `interval` after each write.
pub struct FrameWriter<L> {
    line: L,
    config: TransmitConfig,
}

impl<L: SerialLine> FrameWriter<L> {
    /// Create a writer with the default six writes, 5 ms apart.
    pub fn new(line: L) -> Self {
        Self::with_config(line, TransmitConfig::default())
    }

    /// Create a writer with explicit settings.
    pub fn with_config(line: L, config: TransmitConfig) -> Self {
        Self { line, config }
    }

    /// Send a frame. Never fails; write errors are counted in the report.
    pub fn send(&mut self, frame: &Frame) -> TransmitReport {
        info!(
            address = frame.address(),
            instruction = instruction_name(frame.instruction()),
            value = frame.value(),
            frame = %frame,
            "sending frame"
        );

        let discard_failed = match self.line.discard_output() {
            Ok(()) => false,
            Err(err) => {
                debug!(error = %err, "discarding queued output failed");
                true
            }
        };

        let mut failed_writes = 0usize;
        for _ in 0..self.config.attempts {
            if let Err(err) = self.write_once(frame) {
                debug!(error = %err, "frame write failed");
                failed_writes += 1;
            }
            if !self.config.interval.is_zero() {
                std::thread::sleep(self.config.interval);
            }
        }

        if failed_writes > 0 {
            warn!(
                frame = %frame,
                failed = failed_writes,
                attempts = self.config.attempts,
                "some redundant writes failed"
            );
        }

        TransmitReport {
            frame: *frame,
            attempts: self.config.attempts,
            failed_writes,
            discard_failed,
        }
    }

    /// Build the frame for `command` and send it.
    ///
    /// Returns an error without touching the line if the command carries an
    /// invalid relay index.
    pub fn execute(&mut self, command: &Command) -> Result<TransmitReport> {
        let frame = command.to_frame()?;
        Ok(self.send(&frame))
    }

    fn write_once(&mut self, frame: &Frame) -> std::io::Result<()> {
        self.line.write_all(frame.as_ref())?;
        self.line.flush()
    }

    /// Borrow the underlying line.
    pub fn get_ref(&self) -> &L {
        &self.line
    }

    /// Mutably borrow the underlying line.
    pub fn get_mut(&mut self) -> &mut L {
        &mut self.line
    }

    /// Consume the writer and return the line.
    pub fn into_inner(self) -> L {
        self.line
    }

    /// Current transmission settings.
    pub fn config(&self) -> &TransmitConfig {
        &self.config
    }
}
