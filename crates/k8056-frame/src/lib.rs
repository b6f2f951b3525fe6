//! K8056 relay card command protocol.
//!
//! Every command is a fixed five-byte frame:
//! - A length marker (always 13)
//! - The card address (0-99 on a real bus)
//! - A single-byte ASCII instruction
//! - A value byte
//! - A checksum making the five bytes sum to zero modulo 256
//!
//! The card never answers. [`FrameWriter`] compensates by sending each frame
//! several times in a row.

pub mod codec;
pub mod command;
pub mod error;
pub mod instruction;
pub mod relay;
pub mod writer;

pub use codec::{checksum, decode_frame, encode_frame, Frame, FRAME_SIZE, LENGTH_MARKER};
pub use command::Command;
pub use error::{FrameError, Result};
pub use instruction::Instruction;
pub use relay::{RelayCode, RELAY_COUNT};
pub use writer::{FrameWriter, TransmitConfig, TransmitReport, DEFAULT_ATTEMPTS, DEFAULT_INTERVAL};
