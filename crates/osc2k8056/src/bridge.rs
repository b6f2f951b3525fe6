use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use k8056_osc::{OscError, OscServer};
use k8056_serial::SerialLine;
use tracing::{info, warn};

use crate::dispatch::{Dispatcher, Outcome};

/// Cooperative shutdown request shared between a signal handler and the loop.
///
/// The loop checks it once per iteration, so a frame already being written
/// is always finished.
#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    requested: Arc<AtomicBool>,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the loop to stop at its next iteration boundary.
    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}

/// Counters collected over one run of the bridge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BridgeStats {
    pub packets: u64,
    pub messages: u64,
    pub frames_sent: u64,
    pub rejected: u64,
    pub unhandled: u64,
    pub receive_errors: u64,
}

impl BridgeStats {
    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Sent(_) => self.frames_sent += 1,
            Outcome::Rejected { .. } => self.rejected += 1,
            Outcome::Unhandled { .. } => self.unhandled += 1,
        }
    }
}

/// Receive and dispatch until `shutdown` is requested.
///
/// Each receive waits at most the server's poll interval. Messages are
/// handled one at a time, transmission included, before the next receive.
/// Bad packets and socket errors are logged and skipped.
pub fn run<L: SerialLine>(
    server: &mut OscServer,
    dispatcher: &mut Dispatcher<L>,
    shutdown: &Shutdown,
) -> BridgeStats {
    let mut stats = BridgeStats::default();

    while !shutdown.is_requested() {
        let received = match server.recv() {
            Ok(Some(received)) => received,
            Ok(None) => continue,
            Err(err) => {
                stats.receive_errors += 1;
                warn!(error = %err, "OSC receive error");
                if matches!(err, OscError::Io(_)) {
                    // Keep a failing socket from spinning the loop.
                    std::thread::sleep(server.config().poll_interval);
                }
                continue;
            }
        };

        stats.packets += 1;
        for message in &received.messages {
            stats.messages += 1;
            let outcome = dispatcher.dispatch(message);
            stats.record(&outcome);
        }
    }

    info!(
        packets = stats.packets,
        messages = stats.messages,
        frames_sent = stats.frames_sent,
        rejected = stats.rejected,
        unhandled = stats.unhandled,
        receive_errors = stats.receive_errors,
        "bridge stopped"
    );
    stats
}

#[cfg(test)]
mod tests {
    use std::io::{self, Write};
    use std::time::{Duration, Instant};

    use k8056_frame::FrameWriter;
    use k8056_osc::ServerConfig;

    use super::*;

    struct NullLine;

    impl Write for NullLine {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SerialLine for NullLine {
        fn discard_output(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn shutdown_is_shared_between_clones() {
        let a = Shutdown::new();
        let b = a.clone();
        assert!(!b.is_requested());
        a.request();
        assert!(b.is_requested());
    }

    #[test]
    fn requested_shutdown_returns_without_receiving() {
        let config = ServerConfig {
            poll_interval: Duration::from_secs(5),
            ..ServerConfig::default()
        };
        let mut server =
            OscServer::bind_with_config("127.0.0.1:0".parse().unwrap(), config).unwrap();
        let mut dispatcher = Dispatcher::new(FrameWriter::new(NullLine));
        let shutdown = Shutdown::new();
        shutdown.request();

        let start = Instant::now();
        let stats = run(&mut server, &mut dispatcher, &shutdown);
        assert_eq!(stats, BridgeStats::default());
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn loop_notices_shutdown_within_a_poll_interval() {
        let config = ServerConfig {
            poll_interval: Duration::from_millis(20),
            ..ServerConfig::default()
        };
        let mut server =
            OscServer::bind_with_config("127.0.0.1:0".parse().unwrap(), config).unwrap();
        let shutdown = Shutdown::new();

        let handle = {
            let shutdown = shutdown.clone();
            std::thread::spawn(move || {
                let mut dispatcher = Dispatcher::new(FrameWriter::new(NullLine));
                run(&mut server, &mut dispatcher, &shutdown)
            })
        };

        std::thread::sleep(Duration::from_millis(50));
        let start = Instant::now();
        shutdown.request();
        let stats = handle.join().expect("bridge thread should finish");
        assert!(start.elapsed() < Duration::from_secs(1));
        assert_eq!(stats.packets, 0);
    }

    #[test]
    fn stats_count_each_outcome() {
        let mut stats = BridgeStats::default();
        stats.record(&Outcome::Unhandled {
            path: "/x".to_string(),
            types: String::new(),
        });
        stats.record(&Outcome::Rejected {
            command: k8056_frame::Command::SetRelay { address: 1, relay: 0 },
            error: k8056_frame::FrameError::InvalidRelay(0),
        });
        assert_eq!(stats.unhandled, 1);
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.frames_sent, 0);
    }
}
