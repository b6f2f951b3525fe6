//! Instruction opcodes understood by the card.
//!
//! Each opcode is a printable ASCII letter carried in the third frame byte.

/// A K8056 instruction byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    /// `B`: write the value as the full relay status byte.
    SetStatus,
    /// `S`: switch one relay on.
    SetRelay,
    /// `C`: switch one relay off.
    ClearRelay,
    /// `T`: toggle one relay.
    ToggleRelay,
    /// `E`: emergency stop, all relays off on every card.
    EmergencyStop,
    /// `D`: every card shows its address on the relay LEDs.
    DisplayAddress,
    /// `A`: assign a new address.
    ChangeAddress,
}

impl Instruction {
    /// The opcode byte placed on the wire.
    pub const fn byte(self) -> u8 {
        match self {
            Instruction::SetStatus => b'B',
            Instruction::SetRelay => b'S',
            Instruction::ClearRelay => b'C',
            Instruction::ToggleRelay => b'T',
            Instruction::EmergencyStop => b'E',
            Instruction::DisplayAddress => b'D',
            Instruction::ChangeAddress => b'A',
        }
    }

    /// Look up the instruction for an opcode byte.
    pub fn from_byte(byte: u8) -> Option<Self> {
        let instruction = match byte {
            b'B' => Instruction::SetStatus,
            b'S' => Instruction::SetRelay,
            b'C' => Instruction::ClearRelay,
            b'T' => Instruction::ToggleRelay,
            b'E' => Instruction::EmergencyStop,
            b'D' => Instruction::DisplayAddress,
            b'A' => Instruction::ChangeAddress,
            _ => return None,
        };
        Some(instruction)
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Instruction::SetStatus => "SET_STATUS",
            Instruction::SetRelay => "SET_RELAY",
            Instruction::ClearRelay => "CLEAR_RELAY",
            Instruction::ToggleRelay => "TOGGLE_RELAY",
            Instruction::EmergencyStop => "EMERGENCY_STOP",
            Instruction::DisplayAddress => "DISPLAY_ADDRESS",
            Instruction::ChangeAddress => "CHANGE_ADDRESS",
        }
    }
}

/// Returns a name for any opcode byte, including ones outside the known set.
pub fn instruction_name(byte: u8) -> &'static str {
    Instruction::from_byte(byte).map_or("UNKNOWN", Instruction::name)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Instruction; 7] = [
        Instruction::SetStatus,
        Instruction::SetRelay,
        Instruction::ClearRelay,
        Instruction::ToggleRelay,
        Instruction::EmergencyStop,
        Instruction::DisplayAddress,
        Instruction::ChangeAddress,
    ];

    #[test]
    fn opcode_bytes_match_card_protocol() {
        let bytes: Vec<u8> = ALL.iter().map(|i| i.byte()).collect();
        assert_eq!(bytes, b"BSCTEDA");
    }

    #[test]
    fn from_byte_inverts_byte() {
        for instruction in ALL {
            assert_eq!(Instruction::from_byte(instruction.byte()), Some(instruction));
        }
        assert_eq!(Instruction::from_byte(b'Z'), None);
    }

    #[test]
    fn unknown_opcode_has_fallback_name() {
        assert_eq!(instruction_name(b'E'), "EMERGENCY_STOP");
        assert_eq!(instruction_name(0), "UNKNOWN");
    }
}
