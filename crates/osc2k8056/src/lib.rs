//! Bridge OSC control messages to a Velleman K8056 relay card.
//!
//! Remote clients send OSC messages such as `/k8056/set_relay ii 1 3` over
//! UDP. Each one is matched against a closed set of relay operations, encoded
//! as a five-byte serial frame and written to the card several times.
//!
//! # Crate Structure
//!
//! - [`serial`]: Serial line lifecycle (raw mode, 2400 baud, restore on close)
//! - [`frame`]: Frame encoding, relay codes and redundant transmission
//! - [`osc`]: OSC packet codec, UDP server and client
//! - [`dispatch`]: Inbound message to relay operation routing
//! - [`bridge`]: The receive/dispatch loop and its shutdown token

pub mod bridge;
pub mod dispatch;

/// Re-export serial types.
pub mod serial {
    pub use k8056_serial::*;
}

/// Re-export frame types.
pub mod frame {
    pub use k8056_frame::*;
}

/// Re-export OSC types.
pub mod osc {
    pub use k8056_osc::*;
}

pub use bridge::{BridgeStats, Shutdown};
pub use dispatch::{Dispatcher, Outcome, Route};
