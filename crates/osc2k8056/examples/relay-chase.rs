//! Walk one lit relay across a card through a running bridge.
//!
//! ```text
//! cargo run --example relay-chase -- 127.0.0.1:8056 1
//! ```

use std::net::SocketAddr;
use std::time::Duration;

use osc2k8056::frame::RELAY_COUNT;
use osc2k8056::osc::{OscArg, OscClient, OscMessage};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let target: SocketAddr = args
        .next()
        .unwrap_or_else(|| "127.0.0.1:8056".to_string())
        .parse()?;
    let card: i32 = args.next().map(|a| a.parse()).transpose()?.unwrap_or(1);

    let mut client = OscClient::connect(target)?;
    let relay_msg = |path: &str, relay: i32| {
        OscMessage::new(path, vec![OscArg::Int(card), OscArg::Int(relay)])
    };

    client.send(&OscMessage::new(
        "/k8056/set",
        vec![OscArg::Int(card), OscArg::Int(0)],
    ))?;

    for round in 0..3 {
        for relay in 1..=RELAY_COUNT {
            client.send(&relay_msg("/k8056/toggle_relay", relay))?;
            std::thread::sleep(Duration::from_millis(250));
            client.send(&relay_msg("/k8056/clear_relay", relay))?;
        }
        println!("round {} done", round + 1);
    }

    client.send(&OscMessage::new("/k8056/emergency_stop", vec![]))?;
    Ok(())
}
