use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};

use bytes::BytesMut;
use tracing::debug;

use crate::codec::{encode_message, encode_packet};
use crate::error::{OscError, Result};
use crate::message::{OscMessage, OscPacket};

/// Sends OSC packets to one UDP target.
pub struct OscClient {
    socket: UdpSocket,
    target: SocketAddr,
    buf: BytesMut,
}

impl OscClient {
    /// Bind an ephemeral local port and connect it to `target`.
    pub fn connect(target: SocketAddr) -> Result<Self> {
        let local: SocketAddr = match target {
            SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
            SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
        };
        let socket = UdpSocket::bind(local).map_err(|source| OscError::Bind {
            addr: local,
            source,
        })?;
        socket.connect(target).map_err(|source| OscError::Connect {
            addr: target,
            source,
        })?;
        debug!(%target, "OSC client ready");
        Ok(Self {
            socket,
            target,
            buf: BytesMut::with_capacity(256),
        })
    }

    /// Send a single message.
    pub fn send(&mut self, message: &OscMessage) -> Result<()> {
        self.buf.clear();
        encode_message(message, &mut self.buf)?;
        self.flush_buf()?;
        debug!(path = %message.path, types = %message.type_tags(), "sent OSC message");
        Ok(())
    }

    /// Send a message or bundle.
    pub fn send_packet(&mut self, packet: &OscPacket) -> Result<()> {
        self.buf.clear();
        encode_packet(packet, &mut self.buf)?;
        self.flush_buf()
    }

    /// The connected target.
    pub fn target(&self) -> SocketAddr {
        self.target
    }

    fn flush_buf(&self) -> Result<()> {
        let sent = self.socket.send(&self.buf)?;
        if sent != self.buf.len() {
            return Err(OscError::Io(std::io::Error::new(
                std::io::ErrorKind::WriteZero,
                format!("short datagram write ({sent} of {} bytes)", self.buf.len()),
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::codec::decode_packet;
    use crate::message::{OscArg, OscBundle};

    fn receiver() -> UdpSocket {
        let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
        socket
            .set_read_timeout(Some(Duration::from_secs(3)))
            .unwrap();
        socket
    }

    #[test]
    fn sends_encoded_message() {
        let rx = receiver();
        let mut client = OscClient::connect(rx.local_addr().unwrap()).unwrap();
        assert_eq!(client.target(), rx.local_addr().unwrap());

        let msg = OscMessage::new("/k8056/toggle_relay", vec![OscArg::Int(2), OscArg::Int(5)]);
        client.send(&msg).unwrap();

        let mut buf = [0u8; 128];
        let (len, _) = rx.recv_from(&mut buf).unwrap();
        assert_eq!(decode_packet(&buf[..len]).unwrap(), OscPacket::Message(msg));
    }

    #[test]
    fn sends_bundle() {
        let rx = receiver();
        let mut client = OscClient::connect(rx.local_addr().unwrap()).unwrap();
        let bundle = OscPacket::Bundle(OscBundle {
            timetag: 1,
            content: vec![OscMessage::new("/k8056/display_address", vec![]).into()],
        });
        client.send_packet(&bundle).unwrap();

        let mut buf = [0u8; 128];
        let (len, _) = rx.recv_from(&mut buf).unwrap();
        assert_eq!(decode_packet(&buf[..len]).unwrap(), bundle);
    }

    #[test]
    fn invalid_address_is_not_sent() {
        let rx = receiver();
        let mut client = OscClient::connect(rx.local_addr().unwrap()).unwrap();
        let result = client.send(&OscMessage::new("k8056/set", vec![]));
        assert!(matches!(result, Err(OscError::InvalidAddress(_))));
    }
}
