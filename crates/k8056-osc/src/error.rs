use std::net::SocketAddr;

/// Errors that can occur while encoding, decoding or moving OSC packets.
#[derive(Debug, thiserror::Error)]
pub enum OscError {
    /// Failed to bind the UDP socket.
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    /// Failed to connect the UDP socket to a target.
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: SocketAddr,
        source: std::io::Error,
    },

    /// An I/O error occurred on the socket.
    #[error("OSC I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The packet ended in the middle of a field.
    #[error("truncated packet")]
    Truncated,

    /// The packet is structurally invalid.
    #[error("malformed packet: {0}")]
    Malformed(String),

    /// The type-tag string contains a tag this codec does not handle.
    #[error("unsupported type tag '{0}'")]
    UnsupportedTag(char),

    /// An address pattern that does not start with '/'.
    #[error("invalid address pattern: {0:?}")]
    InvalidAddress(String),

    /// A datagram larger than the configured maximum.
    #[error("packet too large ({size} bytes, max {max})")]
    PacketTooLarge { size: usize, max: usize },

    /// A received datagram could not be decoded.
    #[error("invalid packet from {peer}: {reason}")]
    InvalidPacket { peer: SocketAddr, reason: String },
}

pub type Result<T> = std::result::Result<T, OscError>;
