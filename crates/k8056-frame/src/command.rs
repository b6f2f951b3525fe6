use crate::codec::Frame;
use crate::error::Result;
use crate::instruction::Instruction;
use crate::relay::RelayCode;

/// One abstract relay operation.
///
/// Addresses are already truncated to a byte. Relay indices are kept as the
/// caller supplied them and validated when the frame is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Write `value` as the full relay status byte of card `address`.
    Set { address: u8, value: u8 },
    /// Switch relay `relay` on.
    SetRelay { address: u8, relay: i32 },
    /// Switch relay `relay` off.
    ClearRelay { address: u8, relay: i32 },
    /// Toggle relay `relay`.
    ToggleRelay { address: u8, relay: i32 },
    /// All relays off on every card.
    EmergencyStop,
    /// Every card shows its address.
    DisplayAddress,
    /// Give card `address` the new address `new_address`.
    SetAddress { address: u8, new_address: u8 },
    /// Broadcast an address change to `target`.
    ResetAddress { target: u8 },
}

impl Command {
    /// Operation name as used on the control bus.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Set { .. } => "set",
            Command::SetRelay { .. } => "set_relay",
            Command::ClearRelay { .. } => "clear_relay",
            Command::ToggleRelay { .. } => "toggle_relay",
            Command::EmergencyStop => "emergency_stop",
            Command::DisplayAddress => "display_address",
            Command::SetAddress { .. } => "set_address",
            Command::ResetAddress { .. } => "reset_address",
        }
    }

    /// Resolve to `(address, instruction, value)`.
    ///
    /// Fails only for relay operations with an index outside 1..=8.
    pub fn resolve(&self) -> Result<(u8, Instruction, u8)> {
        let resolved = match *self {
            Command::Set { address, value } => (address, Instruction::SetStatus, value),
            Command::SetRelay { address, relay } => {
                // The card receives the raw index here, not the ASCII code
                // that clear/toggle send. Validation still applies.
                let code = RelayCode::new(relay)?;
                (address, Instruction::SetRelay, code.index())
            }
            Command::ClearRelay { address, relay } => {
                (address, Instruction::ClearRelay, RelayCode::new(relay)?.byte())
            }
            Command::ToggleRelay { address, relay } => {
                (address, Instruction::ToggleRelay, RelayCode::new(relay)?.byte())
            }
            Command::EmergencyStop => (0, Instruction::EmergencyStop, 0),
            Command::DisplayAddress => (0, Instruction::DisplayAddress, 0),
            Command::SetAddress {
                address,
                new_address,
            } => (address, Instruction::ToggleRelay, new_address),
            Command::ResetAddress { target } => (0, Instruction::ChangeAddress, target),
        };
        Ok(resolved)
    }

    /// Build the frame for this command.
    pub fn to_frame(&self) -> Result<Frame> {
        let (address, instruction, value) = self.resolve()?;
        Ok(Frame::new(address, instruction, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{checksum, encode_frame};
    use crate::error::FrameError;

    fn bytes(command: Command) -> [u8; 5] {
        *command.to_frame().expect("command should encode").as_bytes()
    }

    #[test]
    fn set_sends_raw_value() {
        assert_eq!(
            bytes(Command::Set {
                address: 1,
                value: 5
            }),
            [13, 1, b'B', 5, 171]
        );
    }

    #[test]
    fn set_relay_sends_raw_index() {
        let frame = bytes(Command::SetRelay {
            address: 5,
            relay: 3,
        });
        assert_eq!(frame, [13, 5, b'S', 3, checksum([13, 5, 83, 3])]);
        assert_ne!(frame[3], b'3');
    }

    #[test]
    fn clear_and_toggle_send_relay_code() {
        assert_eq!(
            Command::ClearRelay {
                address: 2,
                relay: 4
            }
            .to_frame()
            .unwrap(),
            encode_frame(2, b'C', b'4')
        );
        assert_eq!(
            Command::ToggleRelay {
                address: 2,
                relay: 8
            }
            .to_frame()
            .unwrap(),
            encode_frame(2, b'T', b'8')
        );
    }

    #[test]
    fn broadcast_commands_target_address_zero() {
        assert_eq!(
            bytes(Command::EmergencyStop),
            [13, 0, b'E', 0, checksum([13, 0, b'E', 0])]
        );
        assert_eq!(
            bytes(Command::DisplayAddress),
            [13, 0, b'D', 0, checksum([13, 0, b'D', 0])]
        );
    }

    #[test]
    fn emergency_stop_is_stable() {
        assert_eq!(bytes(Command::EmergencyStop), bytes(Command::EmergencyStop));
    }

    #[test]
    fn address_commands() {
        assert_eq!(
            Command::SetAddress {
                address: 1,
                new_address: 7
            }
            .to_frame()
            .unwrap(),
            encode_frame(1, b'T', 7)
        );
        assert_eq!(
            Command::ResetAddress { target: 9 }.to_frame().unwrap(),
            encode_frame(0, b'A', 9)
        );
    }

    #[test]
    fn invalid_relay_builds_no_frame() {
        for relay in [0, -1, 9, 100] {
            for command in [
                Command::SetRelay { address: 1, relay },
                Command::ClearRelay { address: 1, relay },
                Command::ToggleRelay { address: 1, relay },
            ] {
                assert_eq!(command.to_frame(), Err(FrameError::InvalidRelay(relay)));
            }
        }
    }

    #[test]
    fn names_match_bus_paths() {
        assert_eq!(Command::EmergencyStop.name(), "emergency_stop");
        assert_eq!(Command::ResetAddress { target: 0 }.name(), "reset_address");
    }
}
