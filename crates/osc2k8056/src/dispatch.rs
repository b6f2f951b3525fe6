//! Routing of inbound OSC messages onto relay operations.
//!
//! | Path                      | Args   | Operation                        |
//! |---------------------------|--------|----------------------------------|
//! | `/k8056/set`              | `ii`   | address, status byte             |
//! | `/k8056/set_relay`        | `ii`   | address, relay 1-8               |
//! | `/k8056/clear_relay`      | `ii`   | address, relay 1-8               |
//! | `/k8056/toggle_relay`     | `ii`   | address, relay 1-8               |
//! | `/k8056/emergency_stop`   |        |                                  |
//! | `/k8056/display_address`  |        |                                  |
//! | `/k8056/set_address`      | `i`    | new address, sent to address 0   |
//! | `/k8056/set_address`      | `ii`   | address, new address             |
//! | `/k8056/reset_address`    | `i`    | target address                   |
//!
//! Anything else, including a known path with the wrong argument types, is
//! unhandled and never reaches the serial line.

use k8056_frame::{Command, FrameError, FrameWriter, TransmitReport};
use k8056_osc::{OscArg, OscMessage};
use k8056_serial::SerialLine;
use tracing::{debug, warn};

/// Where an inbound message goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// A recognised relay operation.
    Command(Command),
    /// No operation matches this path and argument signature.
    Unhandled { path: String, types: String },
}

impl Route {
    /// Match a message against the operation table.
    pub fn from_message(message: &OscMessage) -> Self {
        use OscArg::Int;

        let command = match (message.path.as_str(), message.args.as_slice()) {
            ("/k8056/set", [Int(address), Int(value)]) => Some(Command::Set {
                address: byte(*address),
                value: byte(*value),
            }),
            ("/k8056/set_relay", [Int(address), Int(relay)]) => Some(Command::SetRelay {
                address: byte(*address),
                relay: *relay,
            }),
            ("/k8056/clear_relay", [Int(address), Int(relay)]) => Some(Command::ClearRelay {
                address: byte(*address),
                relay: *relay,
            }),
            ("/k8056/toggle_relay", [Int(address), Int(relay)]) => Some(Command::ToggleRelay {
                address: byte(*address),
                relay: *relay,
            }),
            ("/k8056/emergency_stop", []) => Some(Command::EmergencyStop),
            ("/k8056/display_address", []) => Some(Command::DisplayAddress),
            ("/k8056/set_address", [Int(new_address)]) => Some(Command::SetAddress {
                address: 0,
                new_address: byte(*new_address),
            }),
            ("/k8056/set_address", [Int(address), Int(new_address)]) => {
                Some(Command::SetAddress {
                    address: byte(*address),
                    new_address: byte(*new_address),
                })
            }
            ("/k8056/reset_address", [Int(target)]) => Some(Command::ResetAddress {
                target: byte(*target),
            }),
            _ => None,
        };

        match command {
            Some(command) => Route::Command(command),
            None => Route::Unhandled {
                path: message.path.clone(),
                types: message.type_tags(),
            },
        }
    }
}

/// Integers on the bus are truncated to their low byte.
fn byte(value: i32) -> u8 {
    value as u8
}

/// Result of dispatching one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A frame was written to the line.
    Sent(TransmitReport),
    /// The operation was recognised but its arguments were invalid.
    Rejected { command: Command, error: FrameError },
    /// No operation matched.
    Unhandled { path: String, types: String },
}

/// Routes messages and drives the frame writer.
///
/// Owns the only handle to the serial line, so every frame goes out through
/// this single writer in call order.
pub struct Dispatcher<L> {
    writer: FrameWriter<L>,
}

impl<L: SerialLine> Dispatcher<L> {
    pub fn new(writer: FrameWriter<L>) -> Self {
        Self { writer }
    }

    /// Route one message and transmit the resulting frame, if any.
    pub fn dispatch(&mut self, message: &OscMessage) -> Outcome {
        match Route::from_message(message) {
            Route::Command(command) => self.execute(command),
            Route::Unhandled { path, types } => {
                warn!(%path, %types, "unhandled OSC message");
                Outcome::Unhandled { path, types }
            }
        }
    }

    /// Transmit a command that is already routed.
    pub fn execute(&mut self, command: Command) -> Outcome {
        match self.writer.execute(&command) {
            Ok(report) => Outcome::Sent(report),
            Err(error) => {
                debug!(operation = command.name(), %error, "operation dropped");
                Outcome::Rejected { command, error }
            }
        }
    }

    /// Borrow the frame writer.
    pub fn writer(&self) -> &FrameWriter<L> {
        &self.writer
    }

    /// Consume the dispatcher and return the frame writer.
    pub fn into_writer(self) -> FrameWriter<L> {
        self.writer
    }
}
