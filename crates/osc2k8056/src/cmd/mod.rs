use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand, ValueEnum};
use k8056_frame::DEFAULT_ATTEMPTS;
use k8056_osc::{OscArg, OscMessage};
use k8056_serial::DEFAULT_BAUD_RATE;

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod doctor;
pub mod frame;
pub mod send;
pub mod serve;
pub mod sweep;
pub mod version;

pub const DEFAULT_DEVICE: &str = "/dev/k8056";
pub const DEFAULT_LISTEN: &str = "0.0.0.0:8056";
pub const DEFAULT_TARGET: &str = "127.0.0.1:8056";

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Bridge incoming OSC messages to the relay card.
    Serve(ServeArgs),
    /// Send one relay operation to a running bridge.
    Send(SendArgs),
    /// Encode one relay operation and print the frame.
    Frame(FrameArgs),
    /// Step the relay status byte through a range of values.
    Sweep(SweepArgs),
    /// Show version information.
    Version(VersionArgs),
    /// Run local environment health checks.
    Doctor(DoctorArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Serve(args) => serve::run(args),
        Command::Send(args) => send::run(args),
        Command::Frame(args) => frame::run(args, format),
        Command::Sweep(args) => sweep::run(args),
        Command::Version(args) => version::run(args),
        Command::Doctor(args) => doctor::run(args, format),
    }
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Serial device the card is attached to.
    #[arg(long, env = "K8056_DEVICE", default_value = DEFAULT_DEVICE)]
    pub device: PathBuf,
    /// UDP address to receive OSC on.
    #[arg(long, env = "K8056_LISTEN", default_value = DEFAULT_LISTEN)]
    pub listen: SocketAddr,
    /// Serial line speed.
    #[arg(long, default_value_t = DEFAULT_BAUD_RATE)]
    pub baud: u32,
    /// Times each frame is written.
    #[arg(long, default_value_t = DEFAULT_ATTEMPTS)]
    pub attempts: usize,
    /// Pause after each write (e.g. 5ms).
    #[arg(long, default_value = "5ms")]
    pub interval: String,
    /// Longest wait for a packet before checking for shutdown (e.g. 200ms).
    #[arg(long, default_value = "200ms")]
    pub poll_interval: String,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Bridge address.
    #[arg(long, env = "K8056_TARGET", default_value = DEFAULT_TARGET)]
    pub target: SocketAddr,
    /// Card address.
    #[arg(long, short = 'a', default_value_t = 1)]
    pub card: i32,
    #[command(subcommand)]
    pub op: RelayOp,
}

#[derive(Args, Debug)]
pub struct FrameArgs {
    /// Card address.
    #[arg(long, short = 'a', default_value_t = 1)]
    pub card: i32,
    #[command(subcommand)]
    pub op: RelayOp,
}

#[derive(Args, Debug)]
pub struct SweepArgs {
    /// Bridge address.
    #[arg(long, env = "K8056_TARGET", default_value = DEFAULT_TARGET)]
    pub target: SocketAddr,
    /// Card address.
    #[arg(long, short = 'a', default_value_t = 1)]
    pub card: i32,
    /// First status value.
    #[arg(long, default_value_t = 0)]
    pub from: u8,
    /// Last status value (inclusive).
    #[arg(long, default_value_t = 255)]
    pub to: u8,
    /// Pause between values (e.g. 300ms).
    #[arg(long, default_value = "300ms")]
    pub delay: String,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Serial device to check.
    #[arg(long, env = "K8056_DEVICE", default_value = DEFAULT_DEVICE)]
    pub device: PathBuf,
    /// UDP address to check.
    #[arg(long, env = "K8056_LISTEN", default_value = DEFAULT_LISTEN)]
    pub listen: SocketAddr,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum RelayState {
    On,
    Off,
}

/// A relay operation as typed on the command line.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum RelayOp {
    /// Write the full relay status byte.
    Set { value: i32 },
    /// Switch one relay (1-8) on.
    SetRelay { relay: i32 },
    /// Switch one relay (1-8) off.
    ClearRelay { relay: i32 },
    /// Toggle one relay (1-8).
    ToggleRelay { relay: i32 },
    /// Switch one relay (1-8) on or off.
    Relay { relay: i32, state: RelayState },
    /// Switch every relay on every card off.
    EmergencyStop,
    /// Make every card show its address.
    DisplayAddress,
    /// Give the card a new address.
    SetAddress { new_address: i32 },
    /// Broadcast an address reset to a target address.
    ResetAddress { target: i32 },
}

impl RelayOp {
    /// The OSC message a bridge expects for this operation.
    pub fn to_message(&self, card: i32) -> OscMessage {
        let (path, args): (&str, Vec<i32>) = match *self {
            RelayOp::Set { value } => ("/k8056/set", vec![card, value]),
            RelayOp::SetRelay { relay }
            | RelayOp::Relay {
                relay,
                state: RelayState::On,
            } => ("/k8056/set_relay", vec![card, relay]),
            RelayOp::ClearRelay { relay }
            | RelayOp::Relay {
                relay,
                state: RelayState::Off,
            } => ("/k8056/clear_relay", vec![card, relay]),
            RelayOp::ToggleRelay { relay } => ("/k8056/toggle_relay", vec![card, relay]),
            RelayOp::EmergencyStop => ("/k8056/emergency_stop", vec![]),
            RelayOp::DisplayAddress => ("/k8056/display_address", vec![]),
            RelayOp::SetAddress { new_address } => ("/k8056/set_address", vec![card, new_address]),
            RelayOp::ResetAddress { target } => ("/k8056/reset_address", vec![target]),
        };
        OscMessage::new(path, args.into_iter().map(OscArg::Int).collect())
    }
}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        _ => Err(CliError::new(
            USAGE,
            format!("unsupported duration unit: {unit}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use osc2k8056::Route;

    #[test]
    fn parse_duration_seconds_and_millis() {
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("5ms").unwrap(), Duration::from_millis(5));
        assert_eq!(parse_duration("3").unwrap(), Duration::from_secs(3));
    }

    #[test]
    fn parse_duration_rejects_invalid_values() {
        assert!(parse_duration("0ms").is_err());
        assert!(parse_duration("").is_err());
        assert!(parse_duration("fast").is_err());
    }

    #[test]
    fn relay_state_picks_set_or_clear() {
        let on = RelayOp::Relay {
            relay: 2,
            state: RelayState::On,
        };
        let off = RelayOp::Relay {
            relay: 2,
            state: RelayState::Off,
        };
        assert_eq!(on.to_message(1), RelayOp::SetRelay { relay: 2 }.to_message(1));
        assert_eq!(off.to_message(1), RelayOp::ClearRelay { relay: 2 }.to_message(1));
    }

    #[test]
    fn every_operation_routes_to_a_command() {
        let ops = [
            RelayOp::Set { value: 5 },
            RelayOp::SetRelay { relay: 1 },
            RelayOp::ClearRelay { relay: 1 },
            RelayOp::ToggleRelay { relay: 1 },
            RelayOp::EmergencyStop,
            RelayOp::DisplayAddress,
            RelayOp::SetAddress { new_address: 3 },
            RelayOp::ResetAddress { target: 3 },
        ];
        for op in ops {
            assert!(
                matches!(Route::from_message(&op.to_message(1)), Route::Command(_)),
                "{op:?} should route"
            );
        }
    }
}
