use tracing::warn;

use crate::error::{FrameError, Result};

/// Number of relays on one card.
pub const RELAY_COUNT: i32 = 8;

/// The ASCII digit the card expects for a relay, `'1'` through `'8'`.
///
/// Only constructible from a valid 1-based relay index, so a code of zero
/// can never reach the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RelayCode(u8);

impl RelayCode {
    /// Validate a 1-based relay index and derive its code.
    ///
    /// Out-of-range indices are logged and returned as
    /// [`FrameError::InvalidRelay`].
    pub fn new(index: i32) -> Result<Self> {
        if !(1..=RELAY_COUNT).contains(&index) {
            warn!(relay = index, "invalid relay number");
            return Err(FrameError::InvalidRelay(index));
        }
        Ok(Self(b'0' + index as u8))
    }

    /// The code byte (`b'1'..=b'8'`).
    pub fn byte(self) -> u8 {
        self.0
    }

    /// The 1-based relay index this code was derived from.
    pub fn index(self) -> u8 {
        self.0 - b'0'
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_indices_map_to_ascii_digits() {
        for index in 1..=8 {
            let code = RelayCode::new(index).expect("index should be valid");
            assert_eq!(code.byte(), b'0' + index as u8);
            assert_eq!(code.index() as i32, index);
        }
        assert_eq!(RelayCode::new(1).unwrap().byte(), b'1');
        assert_eq!(RelayCode::new(8).unwrap().byte(), b'8');
    }

    #[test]
    fn out_of_range_indices_are_rejected() {
        for index in [0, -1, 9, 100, i32::MIN, i32::MAX] {
            assert_eq!(RelayCode::new(index), Err(FrameError::InvalidRelay(index)));
        }
    }
}
