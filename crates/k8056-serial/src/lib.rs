//! Serial line lifecycle for the Velleman K8056 relay card.
//!
//! The card listens on a write-only RS-232 line at 2400 baud, 8 data bits,
//! no parity. This crate opens the device node, switches it to raw mode,
//! remembers the settings it replaced and puts them back on close.
//!
//! Everything above this layer talks to the line through [`SerialLine`], so
//! protocol code can be exercised against in-memory mocks.

pub mod error;
pub mod traits;

#[cfg(unix)]
pub mod tty;

pub use error::{Result, SerialError};
pub use traits::SerialLine;

#[cfg(unix)]
pub use tty::{LineConfig, SerialPort};

/// Line speed the K8056 expects.
pub const DEFAULT_BAUD_RATE: u32 = 2400;
