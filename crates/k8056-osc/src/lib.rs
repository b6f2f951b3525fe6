//! Minimal Open Sound Control 1.0 over UDP.
//!
//! Enough of OSC to receive control messages for the relay bridge and to send
//! them from tooling:
//! - Messages with `i f s b h d T F N I` arguments
//! - Bundles, flattened into their messages in order
//! - A UDP server whose receive call waits at most one poll interval
//! - A UDP client

pub mod client;
pub mod codec;
pub mod error;
pub mod message;
pub mod server;

pub use client::OscClient;
pub use codec::{decode_packet, encode_message, encode_packet};
pub use error::{OscError, Result};
pub use message::{OscArg, OscBundle, OscMessage, OscPacket};
pub use server::{
    OscServer, Received, ServerConfig, DEFAULT_MAX_PACKET_SIZE, DEFAULT_POLL_INTERVAL,
};
