use std::fmt;

use bytes::{Buf, BytesMut};

use crate::error::{FrameError, Result};
use crate::instruction::Instruction;

/// Every frame is exactly five bytes.
pub const FRAME_SIZE: usize = 5;

/// First byte of every frame.
pub const LENGTH_MARKER: u8 = 13;

/// A single K8056 command frame.
///
/// Wire format:
/// ```text
/// ┌────────┬─────────┬─────────────┬───────┬──────────┐
/// │ Marker │ Address │ Instruction │ Value │ Checksum │
/// │ 0x0d   │ (1B)    │ (1B ASCII)  │ (1B)  │ (1B)     │
/// └────────┴─────────┴─────────────┴───────┴──────────┘
/// ```
///
/// The checksum is the two's complement of the sum of the first four bytes,
/// so all five bytes add up to zero modulo 256.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Frame {
    bytes: [u8; FRAME_SIZE],
}

impl Frame {
    /// Build a frame for a known instruction.
    pub fn new(address: u8, instruction: Instruction, value: u8) -> Self {
        encode_frame(address, instruction.byte(), value)
    }

    /// Card address.
    pub fn address(&self) -> u8 {
        self.bytes[1]
    }

    /// Raw instruction byte.
    pub fn instruction(&self) -> u8 {
        self.bytes[2]
    }

    /// Value byte.
    pub fn value(&self) -> u8 {
        self.bytes[3]
    }

    /// Checksum byte.
    pub fn checksum(&self) -> u8 {
        self.bytes[4]
    }

    /// The five wire bytes.
    pub fn as_bytes(&self) -> &[u8; FRAME_SIZE] {
        &self.bytes
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [b0, b1, b2, b3, b4] = self.bytes;
        write!(f, "0x{b0:02x} 0x{b1:02x} 0x{b2:02x} 0x{b3:02x} 0x{b4:02x}")
    }
}

/// Checksum over the first four frame bytes.
///
/// Computed entirely in 8-bit wrapping arithmetic: `!(b0 + b1 + b2 + b3) + 1`.
pub fn checksum(prefix: [u8; 4]) -> u8 {
    let sum = prefix
        .iter()
        .fold(0u8, |acc, byte| acc.wrapping_add(*byte));
    (!sum).wrapping_add(1)
}

/// Encode a command frame.
///
/// Total over all inputs; callers holding wider integers truncate to `u8`
/// before calling, which matches the wrapping checksum arithmetic.
pub fn encode_frame(address: u8, instruction: u8, value: u8) -> Frame {
    let prefix = [LENGTH_MARKER, address, instruction, value];
    Frame {
        bytes: [
            LENGTH_MARKER,
            address,
            instruction,
            value,
            checksum(prefix),
        ],
    }
}

/// Decode a frame from a buffer.
///
/// Returns `Ok(None)` if fewer than five bytes are buffered. On success the
/// frame bytes are consumed; on error the buffer is left untouched.
pub fn decode_frame(src: &mut BytesMut) -> Result<Option<Frame>> {
    if src.len() < FRAME_SIZE {
        return Ok(None);
    }

    if src[0] != LENGTH_MARKER {
        return Err(FrameError::InvalidMarker(src[0]));
    }

    let expected = checksum([src[0], src[1], src[2], src[3]]);
    if src[4] != expected {
        return Err(FrameError::ChecksumMismatch {
            expected,
            found: src[4],
        });
    }

    let mut bytes = [0u8; FRAME_SIZE];
    src.copy_to_slice(&mut bytes);
    Ok(Some(Frame { bytes }))
}

#[cfg(test)]
mod tests {
    use bytes::BufMut;

    use super::*;

    #[test]
    fn checksum_of_reference_frame() {
        // 13 + 1 + 'B' + 5 = 85; !85 = 170; 170 + 1 = 171
        assert_eq!(checksum([13, 1, b'B', 5]), 171);
    }

    #[test]
    fn checksum_zeroes_the_sum() {
        for address in [0u8, 1, 7, 42, 99, 200, 255] {
            for instruction in *b"BSCTEDA" {
                for value in [0u8, 1, b'8', 128, 255] {
                    let frame = encode_frame(address, instruction, value);
                    let sum = frame
                        .as_bytes()
                        .iter()
                        .fold(0u8, |acc, b| acc.wrapping_add(*b));
                    assert_eq!(sum, 0, "frame {frame} does not sum to zero");
                }
            }
        }
    }

    #[test]
    fn checksum_of_zero_sum_is_zero() {
        // 13 + 243 wraps to 0, and !0 + 1 wraps back to 0
        assert_eq!(checksum([13, 243, 0, 0]), 0);
    }

    #[test]
    fn encode_reference_frame() {
        let frame = encode_frame(1, b'B', 5);
        assert_eq!(frame.as_bytes(), &[13, 1, 66, 5, 171]);
        assert_eq!(frame.address(), 1);
        assert_eq!(frame.instruction(), b'B');
        assert_eq!(frame.value(), 5);
        assert_eq!(frame.checksum(), 171);
    }

    #[test]
    fn encode_is_deterministic() {
        assert_eq!(encode_frame(5, b'S', 3), encode_frame(5, b'S', 3));
        assert_eq!(
            Frame::new(5, Instruction::SetRelay, 3),
            encode_frame(5, b'S', 3)
        );
    }

    #[test]
    fn display_is_hex_bytes() {
        let frame = encode_frame(1, b'B', 5);
        assert_eq!(frame.to_string(), "0x0d 0x01 0x42 0x05 0xab");
    }

    #[test]
    fn decode_incomplete_frame() {
        let mut buf = BytesMut::from(&[13u8, 1, b'B'][..]);
        assert_eq!(decode_frame(&mut buf).unwrap(), None);
        assert_eq!(buf.len(), 3);
    }

    #[test]
    fn decode_consumes_one_frame_at_a_time() {
        let frame = encode_frame(5, b'T', b'3');
        let mut buf = BytesMut::new();
        buf.put_slice(frame.as_ref());
        buf.put_slice(frame.as_ref());

        assert_eq!(decode_frame(&mut buf).unwrap(), Some(frame));
        assert_eq!(buf.len(), FRAME_SIZE);
        assert_eq!(decode_frame(&mut buf).unwrap(), Some(frame));
        assert!(buf.is_empty());
    }

    #[test]
    fn decode_rejects_bad_marker() {
        let mut buf = BytesMut::from(&[12u8, 1, b'B', 5, 171][..]);
        assert_eq!(decode_frame(&mut buf), Err(FrameError::InvalidMarker(12)));
        assert_eq!(buf.len(), FRAME_SIZE);
    }

    #[test]
    fn decode_rejects_bad_checksum() {
        let mut buf = BytesMut::from(&[13u8, 1, b'B', 5, 170][..]);
        assert_eq!(
            decode_frame(&mut buf),
            Err(FrameError::ChecksumMismatch {
                expected: 171,
                found: 170
            })
        );
    }
}
