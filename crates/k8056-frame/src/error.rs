/// Errors that can occur while building or decoding frames.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum FrameError {
    /// The relay index is outside 1..=8.
    #[error("invalid relay number: {0} (expected 1-8)")]
    InvalidRelay(i32),

    /// The first byte of a frame is not the length marker.
    #[error("invalid length marker 0x{0:02x} (expected 0x0d)")]
    InvalidMarker(u8),

    /// The trailing byte does not match the checksum of the first four.
    #[error("checksum mismatch (expected 0x{expected:02x}, found 0x{found:02x})")]
    ChecksumMismatch { expected: u8, found: u8 },
}

pub type Result<T> = std::result::Result<T, FrameError>;
