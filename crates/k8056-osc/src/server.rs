use std::io::ErrorKind;
use std::net::{SocketAddr, UdpSocket};
use std::time::Duration;

use tracing::{debug, info};

use crate::codec::decode_packet;
use crate::error::{OscError, Result};
use crate::message::OscMessage;

/// How long one receive call waits for a datagram.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Largest datagram accepted.
pub const DEFAULT_MAX_PACKET_SIZE: usize = 64 * 1024;

/// Server settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Upper bound on a single [`OscServer::recv`] wait. Default: 200 ms.
    pub poll_interval: Duration,
    /// Maximum datagram size in bytes. Default: 64 KiB.
    pub max_packet_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_packet_size: DEFAULT_MAX_PACKET_SIZE,
        }
    }
}

/// Messages decoded from one datagram.
#[derive(Debug, Clone, PartialEq)]
pub struct Received {
    /// Sender address.
    pub source: SocketAddr,
    /// Messages in packet order, bundles flattened.
    pub messages: Vec<OscMessage>,
}

/// Receives OSC packets on a UDP socket.
pub struct OscServer {
    socket: UdpSocket,
    local_addr: SocketAddr,
    config: ServerConfig,
    buf: Vec<u8>,
}

impl OscServer {
    /// Bind with the default configuration.
    pub fn bind(addr: SocketAddr) -> Result<Self> {
        Self::bind_with_config(addr, ServerConfig::default())
    }

    /// Bind and apply the poll interval as the socket read timeout.
    pub fn bind_with_config(addr: SocketAddr, config: ServerConfig) -> Result<Self> {
        let socket = UdpSocket::bind(addr).map_err(|source| OscError::Bind { addr, source })?;
        // A zero timeout is rejected by the OS; treat it as "block".
        let timeout = (!config.poll_interval.is_zero()).then_some(config.poll_interval);
        socket.set_read_timeout(timeout)?;
        let local_addr = socket.local_addr()?;

        info!(%local_addr, "listening for OSC over UDP");

        Ok(Self {
            socket,
            local_addr,
            // One spare byte so oversized datagrams are detectable.
            buf: vec![0u8; config.max_packet_size + 1],
            config,
        })
    }

    /// Wait up to one poll interval for a datagram.
    ///
    /// Returns `Ok(None)` when the wait times out or is interrupted, so the
    /// caller gets control back at least once per interval.
    pub fn recv(&mut self) -> Result<Option<Received>> {
        let (len, source) = match self.socket.recv_from(&mut self.buf) {
            Ok(received) => received,
            Err(err)
                if matches!(
                    err.kind(),
                    ErrorKind::WouldBlock | ErrorKind::TimedOut | ErrorKind::Interrupted
                ) =>
            {
                return Ok(None)
            }
            Err(err) => return Err(OscError::Io(err)),
        };

        if len > self.config.max_packet_size {
            return Err(OscError::InvalidPacket {
                peer: source,
                reason: OscError::PacketTooLarge {
                    size: len,
                    max: self.config.max_packet_size,
                }
                .to_string(),
            });
        }

        let packet = decode_packet(&self.buf[..len]).map_err(|err| OscError::InvalidPacket {
            peer: source,
            reason: err.to_string(),
        })?;
        debug!(%source, size = len, "received OSC packet");

        Ok(Some(Received {
            source,
            messages: packet.into_messages(),
        }))
    }

    /// Address actually bound (useful after binding port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Current server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}
